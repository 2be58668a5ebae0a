use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vivarium_core::{Dist, CHANNEL_SEPARATOR};

use crate::layout::PrefixLayout;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedMeta {
    pub name: String,
    pub version: String,
    pub build: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl LinkedMeta {
    pub fn dist(&self) -> Dist {
        let base = format!("{}-{}-{}", self.name, self.version, self.build);
        match &self.channel {
            Some(channel) => Dist::new(format!("{channel}{CHANNEL_SEPARATOR}{base}")),
            None => Dist::new(base),
        }
    }
}

pub fn linked(prefix: &PrefixLayout) -> Result<Vec<Dist>> {
    let dir = prefix.meta_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut dists = Vec::new();
    for entry in fs::read_dir(&dir)
        .with_context(|| format!("failed to read metadata directory: {}", dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|v| v.to_str()) != Some("json") {
            continue;
        }

        let meta = parse_meta_file(&path)?;
        dists.push(meta.dist());
    }

    dists.sort();
    Ok(dists)
}

pub fn read_meta(prefix: &PrefixLayout, dist: &Dist) -> Result<Option<LinkedMeta>> {
    let path = prefix.meta_path(dist);
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(parse_meta_file(&path)?))
}

pub fn write_meta(prefix: &PrefixLayout, meta: &LinkedMeta) -> Result<PathBuf> {
    let path = prefix.meta_path(&meta.dist());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let payload = serde_json::to_string_pretty(meta).context("failed to encode package record")?;
    fs::write(&path, payload)
        .with_context(|| format!("failed to write package record: {}", path.display()))?;
    Ok(path)
}

pub fn remove_meta(prefix: &PrefixLayout, dist: &Dist) -> Result<()> {
    let path = prefix.meta_path(dist);
    if path.exists() {
        fs::remove_file(&path)
            .with_context(|| format!("failed to remove package record: {}", path.display()))?;
    }
    Ok(())
}

fn parse_meta_file(path: &std::path::Path) -> Result<LinkedMeta> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read package record: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse package record: {}", path.display()))
}
