use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use url::Url;

const URL_SCHEMES: [&str; 4] = ["http://", "https://", "ftp://", "file://"];

pub fn is_url(location: &str) -> bool {
    URL_SCHEMES
        .iter()
        .any(|scheme| location.starts_with(scheme))
}

pub fn file_url_from_path(path: &Path) -> Result<String> {
    let absolute = path
        .canonicalize()
        .with_context(|| format!("failed to canonicalize path: {}", path.display()))?;
    let url = Url::from_file_path(&absolute)
        .map_err(|_| anyhow!("path is not representable as a file URL: {}", path.display()))?;
    Ok(url.to_string())
}

pub fn path_from_file_url(location: &str) -> Result<PathBuf> {
    let url = Url::parse(location).with_context(|| format!("invalid URL: {location}"))?;
    url.to_file_path()
        .map_err(|_| anyhow!("not a local file URL: {location}"))
}

pub fn split_location(location: &str) -> Result<(String, String)> {
    let trimmed = location.trim_end_matches('/');
    let (parent, file_name) = trimmed
        .rsplit_once('/')
        .ok_or_else(|| anyhow!("location has no parent collection: {location}"))?;
    if file_name.is_empty() {
        return Err(anyhow!("location has no file name: {location}"));
    }
    Ok((parent.to_string(), file_name.to_string()))
}
