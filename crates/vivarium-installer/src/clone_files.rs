use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub fn copy_untracked_files(
    src_prefix: &Path,
    dst_prefix: &Path,
    files: &BTreeSet<String>,
) -> Result<()> {
    let substitution = match (src_prefix.to_str(), dst_prefix.to_str()) {
        (Some(src), Some(dst)) => Some((src.to_string(), dst.to_string())),
        _ => None,
    };

    for file in files {
        let src = src_prefix.join(file);
        let dst = dst_prefix.join(file);

        if let Some(dst_dir) = dst.parent() {
            let blocking = fs::symlink_metadata(dst_dir)
                .map(|meta| !meta.is_dir())
                .unwrap_or(false);
            if blocking {
                fs::remove_file(dst_dir).with_context(|| {
                    format!("failed to clear blocking entry: {}", dst_dir.display())
                })?;
            }
            fs::create_dir_all(dst_dir)
                .with_context(|| format!("failed to create {}", dst_dir.display()))?;
        }

        let Ok(src_meta) = fs::symlink_metadata(&src) else {
            continue;
        };

        if src_meta.file_type().is_symlink() {
            let Ok(target) = fs::read_link(&src) else {
                continue;
            };
            recreate_symlink(&target, &dst)
                .with_context(|| format!("failed to recreate symlink: {}", dst.display()))?;
            continue;
        }

        let Ok(data) = fs::read(&src) else {
            continue;
        };
        let data = match (String::from_utf8(data), &substitution) {
            (Ok(text), Some((from, to))) => text.replace(from.as_str(), to.as_str()).into_bytes(),
            (Ok(text), None) => text.into_bytes(),
            (Err(binary), _) => binary.into_bytes(),
        };

        fs::write(&dst, &data)
            .with_context(|| format!("failed to write {}", dst.display()))?;
        copy_entry_metadata(&src_meta, &dst)?;
    }

    Ok(())
}

#[cfg(unix)]
fn recreate_symlink(target: &Path, dst: &Path) -> std::io::Result<()> {
    use crate::fs_utils::remove_file_if_exists;

    remove_file_if_exists(dst)?;
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(not(unix))]
fn recreate_symlink(target: &Path, dst: &Path) -> std::io::Result<()> {
    // Symlink creation needs elevation on Windows; fall back to copying the
    // resolved target when it exists.
    match dst.parent().map(|dir| dir.join(target)) {
        Some(resolved) if resolved.is_file() => fs::copy(&resolved, dst).map(|_| ()),
        _ => Ok(()),
    }
}

fn copy_entry_metadata(src_meta: &fs::Metadata, dst: &Path) -> Result<()> {
    fs::set_permissions(dst, src_meta.permissions())
        .with_context(|| format!("failed to copy permissions: {}", dst.display()))?;

    let mut times = fs::FileTimes::new();
    if let Ok(modified) = src_meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = src_meta.accessed() {
        times = times.set_accessed(accessed);
    }
    let file = fs::OpenOptions::new()
        .write(true)
        .open(dst)
        .with_context(|| format!("failed to reopen {}", dst.display()))?;
    file.set_times(times)
        .with_context(|| format!("failed to copy timestamps: {}", dst.display()))?;
    Ok(())
}
