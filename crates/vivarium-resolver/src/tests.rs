use std::collections::BTreeMap;

use vivarium_core::Dist;

use crate::dependency_sort;

fn sort_with(dists: &[Dist], depends: &BTreeMap<&str, Vec<&str>>) -> Vec<String> {
    dependency_sort(dists, |dist| {
        depends
            .get(dist.name())
            .map(|deps| deps.iter().map(|d| d.to_string()).collect())
            .unwrap_or_default()
    })
    .into_iter()
    .map(|dist| dist.as_str().to_string())
    .collect()
}

#[test]
fn dependencies_come_before_dependents() {
    let dists = vec![
        Dist::new("app-1.0-0"),
        Dist::new("libc-2.0-0"),
        Dist::new("zlib-1.3-0"),
    ];
    let mut depends = BTreeMap::new();
    depends.insert("app", vec!["zlib", "libc"]);
    depends.insert("zlib", vec!["libc"]);

    let ordered = sort_with(&dists, &depends);
    assert_eq!(ordered, vec!["libc-2.0-0", "zlib-1.3-0", "app-1.0-0"]);
}

#[test]
fn independent_dists_come_out_in_stable_order() {
    let dists = vec![
        Dist::new("beta-1.0-0"),
        Dist::new("alpha-1.0-0"),
        Dist::new("gamma-1.0-0"),
    ];
    let ordered = sort_with(&dists, &BTreeMap::new());
    assert_eq!(ordered, vec!["alpha-1.0-0", "beta-1.0-0", "gamma-1.0-0"]);
}

#[test]
fn dependencies_outside_the_set_are_ignored() {
    let dists = vec![Dist::new("app-1.0-0")];
    let mut depends = BTreeMap::new();
    depends.insert("app", vec!["not-installed"]);

    let ordered = sort_with(&dists, &depends);
    assert_eq!(ordered, vec!["app-1.0-0"]);
}

#[test]
fn version_constraints_in_depends_entries_are_stripped() {
    let dists = vec![Dist::new("app-1.0-0"), Dist::new("zlib-1.3-0")];
    let mut depends = BTreeMap::new();
    depends.insert("app", vec!["zlib >=1.2"]);

    let ordered = sort_with(&dists, &depends);
    assert_eq!(ordered, vec!["zlib-1.3-0", "app-1.0-0"]);
}

#[test]
fn cycles_do_not_fail_the_sort() {
    let dists = vec![
        Dist::new("ouro-1.0-0"),
        Dist::new("boros-1.0-0"),
        Dist::new("solo-1.0-0"),
    ];
    let mut depends = BTreeMap::new();
    depends.insert("ouro", vec!["boros"]);
    depends.insert("boros", vec!["ouro"]);

    let ordered = sort_with(&dists, &depends);
    assert_eq!(ordered.len(), 3);
    assert_eq!(ordered[0], "solo-1.0-0");
    assert!(ordered.contains(&"ouro-1.0-0".to_string()));
    assert!(ordered.contains(&"boros-1.0-0".to_string()));
}

#[test]
fn self_dependency_is_ignored() {
    let dists = vec![Dist::new("selfish-1.0-0")];
    let mut depends = BTreeMap::new();
    depends.insert("selfish", vec!["selfish"]);

    let ordered = sort_with(&dists, &depends);
    assert_eq!(ordered, vec!["selfish-1.0-0"]);
}
