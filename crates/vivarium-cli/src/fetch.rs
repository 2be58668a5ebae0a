use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use vivarium_core::{ChannelIndex, Dist, IndexEntry};
use vivarium_store::{path_from_file_url, read_local_channel_index, INDEX_FILE_NAME};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn load_channel_index(collection_url: &str) -> Result<ChannelIndex> {
    if collection_url.starts_with("file://") {
        let dir = path_from_file_url(collection_url)?;
        return read_local_channel_index(&dir);
    }

    let url = format!(
        "{}/{}",
        collection_url.trim_end_matches('/'),
        INDEX_FILE_NAME
    );
    let client = http_client()?;
    let response = client
        .get(&url)
        .send()
        .with_context(|| format!("failed to request channel index: {url}"))?;
    if !response.status().is_success() {
        bail!(
            "channel index request returned HTTP {}: {url}",
            response.status()
        );
    }
    let body = response
        .text()
        .with_context(|| format!("failed to read channel index body: {url}"))?;
    serde_json::from_str(&body).with_context(|| format!("failed to parse channel index: {url}"))
}

pub fn archive_url(dist: &Dist, entry: &IndexEntry) -> Result<String> {
    let collection = entry
        .channel
        .as_deref()
        .ok_or_else(|| anyhow!("no channel recorded in index for {dist}"))?;
    Ok(format!(
        "{}/{}",
        collection.trim_end_matches('/'),
        dist.archive_filename()
    ))
}

pub fn download_archive(url: &str, dest: &Path) -> Result<()> {
    if url.starts_with("file://") {
        let src = path_from_file_url(url)?;
        fs::copy(&src, dest)
            .with_context(|| format!("failed to copy archive from {}", src.display()))?;
        return Ok(());
    }

    let client = http_client()?;
    let mut response = client
        .get(url)
        .send()
        .with_context(|| format!("failed to request archive: {url}"))?;
    if !response.status().is_success() {
        bail!("archive request returned HTTP {}: {url}", response.status());
    }

    let total = response.content_length().unwrap_or(0);
    let progress = ProgressBar::new(total.max(1));
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{bar:30.cyan/blue}] {bytes}/{total_bytes} {msg}",
    ) {
        progress.set_style(style.progress_chars("=>-"));
    }
    progress.set_message(url.rsplit('/').next().unwrap_or(url).to_string());

    let mut file =
        fs::File::create(dest).with_context(|| format!("failed to create {}", dest.display()))?;
    let mut buffer = [0u8; 8192];
    loop {
        let read = response
            .read(&mut buffer)
            .with_context(|| format!("failed to read archive body: {url}"))?;
        if read == 0 {
            break;
        }
        file.write_all(&buffer[..read])
            .with_context(|| format!("failed to write {}", dest.display()))?;
        progress.inc(read as u64);
    }
    progress.finish_and_clear();
    Ok(())
}

fn http_client() -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("failed to build HTTP client")
}
