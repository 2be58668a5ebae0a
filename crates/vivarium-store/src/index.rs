use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use vivarium_core::{ChannelIndex, IndexEntry};

pub const INDEX_FILE_NAME: &str = "index.json";

#[derive(Debug, Clone, Default)]
pub struct IndexCache {
    entries: HashMap<String, IndexEntry>,
    fetched: HashSet<String>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, qualified_filename: &str) -> Option<&IndexEntry> {
        self.entries.get(qualified_filename)
    }

    pub fn entries(&self) -> &HashMap<String, IndexEntry> {
        &self.entries
    }

    pub fn has_fetched(&self, collection_url: &str) -> bool {
        self.fetched.contains(collection_url.trim_end_matches('/'))
    }

    pub fn insert(&mut self, qualified_filename: impl Into<String>, entry: IndexEntry) {
        self.entries.insert(qualified_filename.into(), entry);
    }

    pub fn ensure_channel<F>(
        &mut self,
        collection_url: &str,
        qualifier: &str,
        mut fetch: F,
    ) -> Result<()>
    where
        F: FnMut(&str) -> Result<ChannelIndex>,
    {
        let key = collection_url.trim_end_matches('/').to_string();
        if self.fetched.contains(&key) {
            return Ok(());
        }

        let index = fetch(&key)
            .with_context(|| format!("failed to fetch channel index: {collection_url}"))?;
        for (file_name, mut entry) in index.packages {
            entry.channel = Some(key.clone());
            self.entries.insert(format!("{qualifier}{file_name}"), entry);
        }
        self.fetched.insert(key);
        Ok(())
    }
}

pub fn read_local_channel_index(collection_dir: &Path) -> Result<ChannelIndex> {
    let path = collection_dir.join(INDEX_FILE_NAME);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ChannelIndex::default());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read channel index: {}", path.display()));
        }
    };
    serde_json::from_str(&content)
        .with_context(|| format!("failed parsing channel index: {}", path.display()))
}
