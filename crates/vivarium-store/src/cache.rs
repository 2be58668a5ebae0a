use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use vivarium_core::{Dist, CHANNEL_SEPARATOR};

use crate::layout::StoreLayout;

pub fn is_fetched(store: &StoreLayout, dist: &Dist) -> Result<Option<PathBuf>> {
    let path = store.archive_path(dist);
    if !path.is_file() {
        return Ok(None);
    }
    if cached_qualifier(store, dist)? == dist_qualifier(dist) {
        Ok(Some(path))
    } else {
        Ok(None)
    }
}

pub fn find_cache_conflict(store: &StoreLayout, dist: &Dist) -> Result<Option<Dist>> {
    let path = store.archive_path(dist);
    if !path.is_file() {
        return Ok(None);
    }
    let owner = cached_qualifier(store, dist)?;
    if owner == dist_qualifier(dist) {
        return Ok(None);
    }
    Ok(Some(Dist::new(format!("{owner}{}", dist.unqualified()))))
}

pub fn record_fetched_url(store: &StoreLayout, url: &str, qualifier: &str) -> Result<()> {
    let records = read_url_records(store)?;
    if records.iter().any(|(recorded, _)| recorded == url) {
        return Ok(());
    }

    let path = store.urls_path();
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open url records: {}", path.display()))?;
    let line = if qualifier.is_empty() {
        format!("{url}\n")
    } else {
        format!("{url} {qualifier}\n")
    };
    file.write_all(line.as_bytes())
        .with_context(|| format!("failed to append url record: {}", path.display()))?;
    Ok(())
}

pub fn recorded_qualifier_for_url(store: &StoreLayout, url: &str) -> Result<Option<String>> {
    let records = read_url_records(store)?;
    Ok(records
        .into_iter()
        .find(|(recorded, _)| recorded == url)
        .map(|(_, qualifier)| qualifier))
}

fn cached_qualifier(store: &StoreLayout, dist: &Dist) -> Result<String> {
    let file_name = dist.archive_filename();
    let records = read_url_records(store)?;
    for (url, qualifier) in records {
        let recorded_name = url.rsplit('/').next().unwrap_or(&url);
        if recorded_name == file_name {
            return Ok(qualifier);
        }
    }
    Ok(String::new())
}

fn dist_qualifier(dist: &Dist) -> String {
    match dist.channel() {
        Some(channel) => format!("{channel}{CHANNEL_SEPARATOR}"),
        None => String::new(),
    }
}

fn read_url_records(store: &StoreLayout) -> Result<Vec<(String, String)>> {
    let path = store.urls_path();
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read url records: {}", path.display()));
        }
    };

    let mut records = Vec::new();
    for line in content.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match line.split_once(' ') {
            Some((url, qualifier)) => records.push((url.to_string(), qualifier.to_string())),
            None => records.push((line.to_string(), String::new())),
        }
    }
    Ok(records)
}
