use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vivarium_core::Dist;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pkgs_dir(&self) -> PathBuf {
        self.root.join("pkgs")
    }

    pub fn archive_path(&self, dist: &Dist) -> PathBuf {
        self.pkgs_dir().join(dist.archive_filename())
    }

    pub fn extracted_dir(&self, dist: &Dist) -> PathBuf {
        self.pkgs_dir().join(dist.unqualified())
    }

    pub fn urls_path(&self) -> PathBuf {
        self.pkgs_dir().join("urls.txt")
    }

    pub fn channels_path(&self) -> PathBuf {
        self.root.join("channels.toml")
    }

    pub fn ensure_base_dirs(&self) -> Result<()> {
        for dir in [self.root.clone(), self.pkgs_dir()] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }
}

pub fn default_store_root() -> Result<PathBuf> {
    if cfg!(windows) {
        let app_data = std::env::var("LOCALAPPDATA")
            .context("LOCALAPPDATA is not set; cannot resolve Windows store root")?;
        return Ok(PathBuf::from(app_data).join("Vivarium"));
    }

    let home = std::env::var("HOME").context("HOME is not set; cannot resolve store root")?;
    Ok(PathBuf::from(home).join(".vivarium"))
}
