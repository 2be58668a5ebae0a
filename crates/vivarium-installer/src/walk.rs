use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::layout::{PrefixLayout, META_DIR};
use crate::meta::{linked, read_meta};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkIgnore {
    pub root_entries: BTreeSet<String>,
    pub bin_entries: BTreeSet<String>,
}

impl WalkIgnore {
    pub fn platform_default() -> Self {
        let mut root_entries: BTreeSet<String> = [
            "pkgs",
            "envs",
            "viv-build",
            META_DIR,
            ".viv-lock",
            "users",
            "LICENSE.txt",
            "info",
            "viv-recipes",
            ".index",
            ".unionfs",
            ".nonadmin",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();
        if cfg!(target_os = "macos") {
            root_entries.insert("python.app".to_string());
            root_entries.insert("Launcher.app".to_string());
        }

        let bin_entries = ["vivarium", "viv", "activate", "deactivate"]
            .into_iter()
            .map(str::to_string)
            .collect();

        Self {
            root_entries,
            bin_entries,
        }
    }
}

pub fn walk_prefix(prefix: &Path, ignore: Option<&WalkIgnore>) -> Result<BTreeSet<String>> {
    let mut found = BTreeSet::new();
    if !prefix.is_dir() {
        return Ok(found);
    }

    let entries = fs::read_dir(prefix)
        .with_context(|| format!("failed to read prefix: {}", prefix.display()))?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(ignore) = ignore {
            if ignore.root_entries.contains(&name) {
                continue;
            }
        }

        let file_type = entry
            .file_type()
            .with_context(|| format!("failed to stat {}", entry.path().display()))?;
        if file_type.is_symlink() || file_type.is_file() {
            found.insert(name);
            continue;
        }

        let bin_skip = ignore
            .filter(|_| name == "bin")
            .map(|ignore| &ignore.bin_entries);
        walk_into(&entry.path(), &name, bin_skip, &mut found)?;
    }

    Ok(found)
}

fn walk_into(
    dir: &Path,
    rel: &str,
    bin_skip: Option<&BTreeSet<String>>,
    found: &mut BTreeSet<String>,
) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(skip) = bin_skip {
            if skip.contains(&name) {
                continue;
            }
        }

        let rel_path = format!("{rel}/{name}");
        let file_type = entry
            .file_type()
            .with_context(|| format!("failed to stat {}", entry.path().display()))?;
        if file_type.is_symlink() || file_type.is_file() {
            found.insert(rel_path);
        } else {
            walk_into(&entry.path(), &rel_path, None, found)?;
        }
    }
    Ok(())
}

pub fn installed_files(prefix: &PrefixLayout, exclude_self_build: bool) -> Result<BTreeSet<String>> {
    let mut tracked = BTreeSet::new();
    for dist in linked(prefix)? {
        let Some(meta) = read_meta(prefix, &dist)? else {
            continue;
        };
        if exclude_self_build && meta.file_hash.is_some() {
            continue;
        }
        tracked.extend(meta.files.iter().map(|f| f.replace('\\', "/")));
    }
    Ok(tracked)
}

pub fn untracked(prefix: &PrefixLayout, exclude_self_build: bool) -> Result<BTreeSet<String>> {
    let tracked = installed_files(prefix, exclude_self_build)?;
    let ignore = WalkIgnore::platform_default();
    let on_disk = walk_prefix(prefix.prefix(), Some(&ignore))?;

    let mut result = BTreeSet::new();
    for path in on_disk.difference(&tracked) {
        if path.ends_with('~') {
            continue;
        }
        if cfg!(target_os = "macos") && path.ends_with(".DS_Store") {
            continue;
        }
        if let Some(source) = path.strip_suffix('c') {
            if path.ends_with(".pyc") && tracked.contains(source) {
                continue;
            }
        }
        result.insert(path.clone());
    }
    Ok(result)
}
