use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use vivarium_core::{ActionPlan, Dist, IndexEntry, PlanOp};
use vivarium_store::{md5_hex_file, sha256_hex_file, IndexCache, StoreLayout};

use crate::fs_utils::{prune_empty_dirs, remove_dir_all_if_exists, remove_file_if_exists};
use crate::layout::PrefixLayout;
use crate::meta::{read_meta, remove_meta, write_meta, LinkedMeta};
use crate::walk::walk_prefix;

pub fn execute_plan<F>(
    plan: &ActionPlan,
    store: &StoreLayout,
    index_cache: &IndexCache,
    mut fetch_archive: F,
) -> Result<()>
where
    F: FnMut(&Dist, &IndexEntry, &Path) -> Result<()>,
{
    let layout = PrefixLayout::new(plan.prefix());
    for (op, dists) in plan.ops_in_order() {
        for dist in dists {
            match op {
                PlanOp::RemoveFetched => {
                    let path = store.archive_path(dist);
                    remove_file_if_exists(&path).with_context(|| {
                        format!("failed to remove cached archive: {}", path.display())
                    })?;
                }
                PlanOp::Fetch => fetch_one(store, index_cache, dist, &mut fetch_archive)?,
                PlanOp::RemoveExtracted => {
                    let dir = store.extracted_dir(dist);
                    remove_dir_all_if_exists(&dir).with_context(|| {
                        format!("failed to remove extracted package: {}", dir.display())
                    })?;
                }
                PlanOp::Extract => extract_package(store, dist)?,
                PlanOp::Unlink => unlink_package(&layout, dist)?,
                PlanOp::Link => link_package(&layout, store, dist)?,
            }
        }
    }
    Ok(())
}

fn fetch_one<F>(
    store: &StoreLayout,
    index_cache: &IndexCache,
    dist: &Dist,
    fetch_archive: &mut F,
) -> Result<()>
where
    F: FnMut(&Dist, &IndexEntry, &Path) -> Result<()>,
{
    let key = dist.qualified_filename();
    let entry = index_cache
        .lookup(&key)
        .ok_or_else(|| anyhow!("no package '{key}' in channel index"))?;

    let dest = store.archive_path(dist);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fetch_archive(dist, entry, &dest)?;

    if let Some(expected) = &entry.md5 {
        let actual = md5_hex_file(&dest)?;
        if actual != *expected {
            bail!("md5 mismatch for fetched archive {key}: expected {expected}, got {actual}");
        }
    } else if let Some(expected) = &entry.sha256 {
        let actual = sha256_hex_file(&dest)?;
        if actual != *expected {
            bail!("sha256 mismatch for fetched archive {key}: expected {expected}, got {actual}");
        }
    }
    Ok(())
}

fn extract_package(store: &StoreLayout, dist: &Dist) -> Result<()> {
    let archive = store.archive_path(dist);
    if !archive.is_file() {
        bail!("archive is not cached: {}", archive.display());
    }

    let dst = store.extracted_dir(dist);
    remove_dir_all_if_exists(&dst)
        .with_context(|| format!("failed to clear {}", dst.display()))?;
    fs::create_dir_all(&dst).with_context(|| format!("failed to create {}", dst.display()))?;

    run_command(
        Command::new("tar")
            .arg("-xf")
            .arg(&archive)
            .arg("-C")
            .arg(&dst),
        &format!("failed to extract archive: {}", archive.display()),
    )
}

pub fn link_package(layout: &PrefixLayout, store: &StoreLayout, dist: &Dist) -> Result<()> {
    let src_dir = store.extracted_dir(dist);
    if !src_dir.is_dir() {
        bail!("package is not extracted: {}", src_dir.display());
    }

    let files = payload_files(&src_dir)?;
    layout.ensure_base_dirs()?;

    for file in &files {
        let src = src_dir.join(file);
        let dst = layout.prefix().join(file);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        remove_file_if_exists(&dst)
            .with_context(|| format!("failed to clear {}", dst.display()))?;
        place_payload_entry(&src, &dst)?;
    }

    let info = read_package_info(&src_dir)?;
    let meta = match info {
        Some(info) => LinkedMeta {
            name: info.name,
            version: info.version,
            build: info.build,
            channel: dist.channel().map(str::to_string),
            files: files.clone(),
            file_hash: None,
            depends: info.depends,
            url: None,
        },
        None => LinkedMeta {
            name: dist.name().to_string(),
            version: dist.version().to_string(),
            build: dist.build().to_string(),
            channel: dist.channel().map(str::to_string),
            files: files.clone(),
            file_hash: None,
            depends: Vec::new(),
            url: None,
        },
    };
    write_meta(layout, &meta)?;
    Ok(())
}

pub fn unlink_package(layout: &PrefixLayout, dist: &Dist) -> Result<()> {
    let Some(meta) = read_meta(layout, dist)? else {
        return Ok(());
    };

    for file in &meta.files {
        let path = layout.prefix().join(file);
        remove_file_if_exists(&path)
            .with_context(|| format!("failed to unlink {}", path.display()))?;
        if let Some(parent) = path.parent() {
            prune_empty_dirs(parent, layout.prefix());
        }
    }

    remove_meta(layout, dist)
}

#[derive(Debug, Deserialize)]
struct PackageInfo {
    name: String,
    version: String,
    build: String,
    #[serde(default)]
    depends: Vec<String>,
}

const INFO_DIR: &str = "info";

fn read_package_info(src_dir: &Path) -> Result<Option<PackageInfo>> {
    let path = src_dir.join(INFO_DIR).join("index.json");
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read package info: {}", path.display()));
        }
    };
    let info = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse package info: {}", path.display()))?;
    Ok(Some(info))
}

fn payload_files(src_dir: &Path) -> Result<Vec<String>> {
    let declared = src_dir.join(INFO_DIR).join("files");
    if declared.is_file() {
        let raw = fs::read_to_string(&declared)
            .with_context(|| format!("failed to read file list: {}", declared.display()))?;
        return Ok(raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.replace('\\', "/"))
            .collect());
    }

    let walked = walk_prefix(src_dir, None)?;
    Ok(walked
        .into_iter()
        .filter(|path| path != INFO_DIR && !path.starts_with("info/"))
        .collect())
}

fn place_payload_entry(src: &Path, dst: &Path) -> Result<()> {
    let src_meta = fs::symlink_metadata(src)
        .with_context(|| format!("missing payload entry: {}", src.display()))?;
    if src_meta.file_type().is_symlink() {
        let target = fs::read_link(src)
            .with_context(|| format!("failed to read symlink: {}", src.display()))?;
        return place_symlink(&target, dst)
            .with_context(|| format!("failed to place symlink: {}", dst.display()));
    }
    fs::copy(src, dst)
        .with_context(|| format!("failed to place {}", dst.display()))?;
    Ok(())
}

#[cfg(unix)]
fn place_symlink(target: &Path, dst: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(not(unix))]
fn place_symlink(target: &Path, dst: &Path) -> std::io::Result<()> {
    match dst.parent().map(|dir| dir.join(target)) {
        Some(resolved) if resolved.is_file() => fs::copy(&resolved, dst).map(|_| ()),
        _ => Ok(()),
    }
}

fn run_command(command: &mut Command, context_msg: &str) -> Result<()> {
    let output = command
        .output()
        .with_context(|| context_msg.to_string())?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{context_msg}: {}", stderr.trim());
    }
    Ok(())
}
