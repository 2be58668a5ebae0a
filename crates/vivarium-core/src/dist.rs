use std::fmt;

use anyhow::{anyhow, Result};

pub const ARCHIVE_SUFFIX: &str = ".tar.bz2";
pub const CHANNEL_SEPARATOR: &str = "::";
pub const DEFAULT_CHANNEL: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dist(String);

impl Dist {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    pub fn from_archive_filename(qualifier: &str, file_name: &str) -> Result<Self> {
        let stem = file_name
            .strip_suffix(ARCHIVE_SUFFIX)
            .ok_or_else(|| anyhow!("archive name must end with {ARCHIVE_SUFFIX}: {file_name}"))?;
        if stem.is_empty() {
            return Err(anyhow!("archive name has an empty identifier: {file_name}"));
        }
        Ok(Self(format!("{qualifier}{stem}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn channel(&self) -> Option<&str> {
        self.0
            .split_once(CHANNEL_SEPARATOR)
            .map(|(channel, _)| channel)
    }

    pub fn unqualified(&self) -> &str {
        match self.0.split_once(CHANNEL_SEPARATOR) {
            Some((_, rest)) => rest,
            None => &self.0,
        }
    }

    pub fn name(&self) -> &str {
        let unqualified = self.unqualified();
        match unqualified.rsplitn(3, '-').nth(2) {
            Some(name) => name,
            None => unqualified,
        }
    }

    pub fn version(&self) -> &str {
        self.unqualified().rsplitn(3, '-').nth(1).unwrap_or("")
    }

    pub fn build(&self) -> &str {
        self.unqualified().rsplitn(3, '-').next().unwrap_or("")
    }

    pub fn archive_filename(&self) -> String {
        format!("{}{}", self.unqualified(), ARCHIVE_SUFFIX)
    }

    pub fn qualified_filename(&self) -> String {
        format!("{}{}", self.0, ARCHIVE_SUFFIX)
    }
}

impl fmt::Display for Dist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Dist {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
