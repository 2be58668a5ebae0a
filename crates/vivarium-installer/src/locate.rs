use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use vivarium_core::Dist;

use crate::layout::{PrefixLayout, META_DIR};
use crate::meta::{linked, read_meta};

pub fn find_prefix(path: &Path) -> Option<PathBuf> {
    let start = std::path::absolute(path).ok()?;
    for ancestor in start.ancestors() {
        if ancestor.join(META_DIR).is_dir() {
            return Some(ancestor.to_path_buf());
        }
    }
    None
}

pub fn owning_packages(path: &Path) -> Result<Vec<Dist>> {
    let queried = std::path::absolute(path)
        .map_err(|err| anyhow!("cannot resolve path {}: {err}", path.display()))?;
    let prefix = find_prefix(&queried).ok_or_else(|| {
        anyhow!(
            "could not determine environment prefix from: {}",
            path.display()
        )
    })?;
    let layout = PrefixLayout::new(&prefix);

    let mut owners = Vec::new();
    for dist in linked(&layout)? {
        let Some(meta) = read_meta(&layout, &dist)? else {
            continue;
        };
        if meta.files.iter().any(|f| prefix.join(f) == queried) {
            owners.push(dist);
        }
    }
    Ok(owners)
}
