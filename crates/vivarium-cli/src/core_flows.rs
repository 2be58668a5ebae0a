use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use vivarium_core::{ActionPlan, Dist, CHANNEL_SEPARATOR};
use vivarium_installer::{
    copy_untracked_files, ensure_linked_plan, execute_plan, linked, plan_explicit, read_meta,
    untracked, PrefixLayout,
};
use vivarium_resolver::dependency_sort;
use vivarium_store::{record_fetched_url, ChannelConfig, IndexCache, StoreLayout};

use crate::fetch;

pub const MANAGER_PACKAGE_NAME: &str = "vivarium";

#[derive(Debug)]
pub struct ExplicitInstallOutcome {
    pub plan: ActionPlan,
    pub warnings: Vec<String>,
}

#[derive(Debug)]
pub struct CloneOutcome {
    pub plan: ActionPlan,
    pub untracked_files: BTreeSet<String>,
}

pub fn read_spec_file(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read specification file: {}", path.display()))?;
    Ok(raw.lines().map(str::to_string).collect())
}

pub fn explicit_install(
    specs: &[String],
    prefix: &PrefixLayout,
    store: &StoreLayout,
    channels: &ChannelConfig,
    index_cache: &mut IndexCache,
) -> Result<ExplicitInstallOutcome> {
    store.ensure_base_dirs()?;

    let planned = plan_explicit(
        specs,
        prefix,
        store,
        channels,
        index_cache,
        fetch::load_channel_index,
    )?;
    execute_plan(&planned.plan, store, index_cache, |dist, entry, dest| {
        let url = fetch::archive_url(dist, entry)?;
        fetch::download_archive(&url, dest)?;
        record_fetched_url(store, &url, &dist_qualifier(dist))?;
        Ok(())
    })?;

    Ok(ExplicitInstallOutcome {
        plan: planned.plan,
        warnings: planned.warnings,
    })
}

pub fn clone_env(
    src: &PrefixLayout,
    dst: &PrefixLayout,
    store: &StoreLayout,
    index_cache: &mut IndexCache,
) -> Result<CloneOutcome> {
    if !src.is_environment() {
        return Err(anyhow!(
            "not an environment: {}",
            src.prefix().display()
        ));
    }

    let untracked_files = untracked(src, false)?;
    let dists: Vec<Dist> = linked(src)?
        .into_iter()
        .filter(|dist| dist.name() != MANAGER_PACKAGE_NAME)
        .collect();

    copy_untracked_files(src.prefix(), dst.prefix(), &untracked_files)?;

    let mut depends: BTreeMap<Dist, Vec<String>> = BTreeMap::new();
    for dist in &dists {
        let names = match read_meta(src, dist)? {
            Some(meta) => meta.depends,
            None => index_cache
                .lookup(&dist.qualified_filename())
                .map(|entry| entry.depends.clone())
                .unwrap_or_default(),
        };
        depends.insert(dist.clone(), names);
    }
    let sorted = dependency_sort(&dists, |dist| {
        depends.get(dist).cloned().unwrap_or_default()
    });

    let plan = ensure_linked_plan(&sorted, dst, store)?;
    execute_plan(&plan, store, index_cache, |dist, entry, dest| {
        let url = fetch::archive_url(dist, entry)?;
        fetch::download_archive(&url, dest)?;
        record_fetched_url(store, &url, &dist_qualifier(dist))?;
        Ok(())
    })?;

    Ok(CloneOutcome {
        plan,
        untracked_files,
    })
}

fn dist_qualifier(dist: &Dist) -> String {
    match dist.channel() {
        Some(channel) => format!("{channel}{CHANNEL_SEPARATOR}"),
        None => String::new(),
    }
}
