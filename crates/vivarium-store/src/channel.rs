use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use vivarium_core::{CHANNEL_SEPARATOR, DEFAULT_CHANNEL};

pub const LOCAL_CHANNEL: &str = "local";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelConfig {
    #[serde(default = "default_channel_name")]
    pub default: String,
    #[serde(default)]
    pub channels: BTreeMap<String, String>,
}

fn default_channel_name() -> String {
    DEFAULT_CHANNEL.to_string()
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            default: default_channel_name(),
            channels: BTreeMap::new(),
        }
    }
}

pub fn parse_channel_config(content: &str) -> Result<ChannelConfig> {
    toml::from_str(content).context("failed to parse channel configuration")
}

impl ChannelConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read channel configuration: {}", path.display())
                });
            }
        };
        parse_channel_config(&content)
            .with_context(|| format!("failed parsing channel configuration: {}", path.display()))
    }

    pub fn qualifier_for_url(&self, collection_url: &str) -> String {
        let trimmed = collection_url.trim_end_matches('/');
        for (label, url) in &self.channels {
            if url.trim_end_matches('/') == trimmed {
                return self.qualifier_for_label(label);
            }
        }

        if trimmed.starts_with("file://") {
            return self.qualifier_for_label(LOCAL_CHANNEL);
        }

        let label = trimmed
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(trimmed);
        self.qualifier_for_label(label)
    }

    pub fn qualifier_for_label(&self, label: &str) -> String {
        if label == self.default {
            String::new()
        } else {
            format!("{label}{CHANNEL_SEPARATOR}")
        }
    }
}
