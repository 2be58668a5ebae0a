use std::collections::{BTreeMap, BTreeSet};

use vivarium_core::Dist;

pub fn dependency_sort<F>(dists: &[Dist], mut depends_of: F) -> Vec<Dist>
where
    F: FnMut(&Dist) -> Vec<String>,
{
    let by_name: BTreeMap<&str, &Dist> = dists.iter().map(|dist| (dist.name(), dist)).collect();

    let mut deps: BTreeMap<&Dist, BTreeSet<&Dist>> = BTreeMap::new();
    let mut reverse: BTreeMap<&Dist, BTreeSet<&Dist>> = BTreeMap::new();
    for dist in dists {
        deps.insert(dist, BTreeSet::new());
        reverse.insert(dist, BTreeSet::new());
    }

    for dist in dists {
        for dep_name in depends_of(dist) {
            let dep_name = dep_name
                .split_whitespace()
                .next()
                .unwrap_or(dep_name.as_str());
            let Some(dep_dist) = by_name.get(dep_name) else {
                continue;
            };
            if *dep_dist == dist {
                continue;
            }
            deps.entry(dist).or_default().insert(*dep_dist);
            reverse.entry(*dep_dist).or_default().insert(dist);
        }
    }

    let mut in_degree: BTreeMap<&Dist, usize> = deps
        .iter()
        .map(|(dist, dependency_set)| (*dist, dependency_set.len()))
        .collect();

    let mut ready: BTreeSet<&Dist> = in_degree
        .iter()
        .filter_map(|(dist, degree)| (*degree == 0).then_some(*dist))
        .collect();
    let mut ordered: Vec<Dist> = Vec::with_capacity(dists.len());

    while let Some(next) = ready.pop_first() {
        ordered.push(next.clone());
        if let Some(children) = reverse.get(next) {
            for child in children {
                if let Some(degree) = in_degree.get_mut(child) {
                    *degree = degree.saturating_sub(1);
                    if *degree == 0 {
                        ready.insert(*child);
                    }
                }
            }
        }
    }

    if ordered.len() != dists.len() {
        let placed: BTreeSet<&Dist> = ordered.iter().collect();
        let mut leftover: Vec<&Dist> = dists.iter().filter(|dist| !placed.contains(dist)).collect();
        leftover.sort();
        leftover.dedup();
        ordered.extend(leftover.into_iter().cloned());
    }

    ordered
}
