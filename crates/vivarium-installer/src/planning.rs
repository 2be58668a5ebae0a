use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use vivarium_core::{
    parse_spec_line, ActionPlan, ChannelIndex, Dist, PlanOp,
};
use vivarium_store::{
    file_url_from_path, find_cache_conflict, is_fetched, is_url, recorded_qualifier_for_url,
    split_location, verify_file_checksum, ChannelConfig, IndexCache, StoreLayout,
};

use crate::layout::PrefixLayout;
use crate::meta::linked;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedInstall {
    pub plan: ActionPlan,
    pub warnings: Vec<String>,
}

pub fn plan_explicit<F>(
    specs: &[String],
    prefix: &PrefixLayout,
    store: &StoreLayout,
    channels: &ChannelConfig,
    index_cache: &mut IndexCache,
    mut fetch_index: F,
) -> Result<PlannedInstall>
where
    F: FnMut(&str) -> Result<ChannelIndex>,
{
    let mut plan = ActionPlan::new(prefix.prefix());
    let mut warnings = Vec::new();

    let linked_by_name: BTreeMap<String, Dist> = linked(prefix)?
        .into_iter()
        .map(|dist| (dist.name().to_string(), dist))
        .collect();

    for line in specs {
        let Some(spec) = parse_spec_line(line)? else {
            continue;
        };

        let location = if is_url(&spec.location) {
            spec.location.clone()
        } else {
            let path = Path::new(&spec.location);
            if !path.is_file() {
                return Err(anyhow!("file not found: {}", spec.location));
            }
            file_url_from_path(path)?
        };

        let (collection_url, file_name) = split_location(&location)?;

        let qualifier = match cached_qualifier_for(store, &collection_url, &location)? {
            Some(qualifier) => qualifier,
            None => channels.qualifier_for_url(&collection_url),
        };
        let dist = Dist::from_archive_filename(&qualifier, &file_name)?;

        let mut archive = is_fetched(store, &dist)?;
        if let (Some(path), Some(checksum)) = (&archive, &spec.checksum) {
            if !verify_file_checksum(path, checksum)? {
                plan.push(PlanOp::RemoveFetched, dist.clone());
                archive = None;
            }
        }

        if archive.is_none() {
            let key = dist.qualified_filename();
            if index_cache.lookup(&key).is_none() {
                index_cache.ensure_channel(&collection_url, &qualifier, &mut fetch_index)?;
            }
            let entry = index_cache
                .lookup(&key)
                .ok_or_else(|| anyhow!("no package '{key}' in channel index"))?;

            if let Some(checksum) = &spec.checksum {
                match entry.checksum_of_kind(checksum) {
                    None => warnings.push(format!(
                        "cannot verify {} of {key}: channel index has no {} entry",
                        checksum.kind(),
                        checksum.kind()
                    )),
                    Some(indexed) if indexed != checksum.as_hex() => {
                        return Err(anyhow!(
                            "{} in explicit specification does not match channel index: {key}",
                            checksum.kind()
                        ));
                    }
                    Some(_) => {}
                }
            }

            if let Some(conflict) = find_cache_conflict(store, &dist)? {
                plan.push(PlanOp::RemoveFetched, conflict);
            }
            plan.push(PlanOp::Fetch, dist.clone());
        }

        plan.push(PlanOp::RemoveExtracted, dist.clone());
        plan.push(PlanOp::Extract, dist.clone());

        if let Some(previous) = linked_by_name.get(dist.name()) {
            plan.push(PlanOp::Unlink, previous.clone());
        }
        plan.push(PlanOp::Link, dist);
    }

    Ok(PlannedInstall { plan, warnings })
}

pub fn ensure_linked_plan(
    dists: &[Dist],
    prefix: &PrefixLayout,
    store: &StoreLayout,
) -> Result<ActionPlan> {
    let mut plan = ActionPlan::new(prefix.prefix());
    for dist in dists {
        if !store.extracted_dir(dist).is_dir() {
            if is_fetched(store, dist)?.is_none() {
                plan.push(PlanOp::Fetch, dist.clone());
            }
            plan.push(PlanOp::Extract, dist.clone());
        }
        plan.push(PlanOp::Link, dist.clone());
    }
    Ok(plan)
}

fn cached_qualifier_for(
    store: &StoreLayout,
    collection_url: &str,
    location: &str,
) -> Result<Option<String>> {
    if !collection_url.starts_with("file://") {
        return Ok(None);
    }
    recorded_qualifier_for_url(store, location)
}
