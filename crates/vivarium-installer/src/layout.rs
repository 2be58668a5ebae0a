use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vivarium_core::Dist;

pub const META_DIR: &str = "viv-meta";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixLayout {
    prefix: PathBuf,
}

impl PrefixLayout {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn meta_dir(&self) -> PathBuf {
        self.prefix.join(META_DIR)
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.prefix.join("bin")
    }

    pub fn meta_path(&self, dist: &Dist) -> PathBuf {
        self.meta_dir().join(format!("{}.json", dist.unqualified()))
    }

    pub fn is_environment(&self) -> bool {
        self.meta_dir().is_dir()
    }

    pub fn ensure_base_dirs(&self) -> Result<()> {
        for dir in [self.prefix.clone(), self.meta_dir()] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }
}
