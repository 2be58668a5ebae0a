use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use md5::{Digest, Md5};
use sha2::Sha256;
use vivarium_core::Checksum;

pub fn md5_hex_file(path: &Path) -> Result<String> {
    hex_digest::<Md5>(path)
}

pub fn sha256_hex_file(path: &Path) -> Result<String> {
    hex_digest::<Sha256>(path)
}

pub fn file_checksum_hex(path: &Path, supplied: &Checksum) -> Result<String> {
    match supplied {
        Checksum::Md5(_) => md5_hex_file(path),
        Checksum::Sha256(_) => sha256_hex_file(path),
    }
}

pub fn verify_file_checksum(path: &Path, expected: &Checksum) -> Result<bool> {
    Ok(file_checksum_hex(path, expected)? == expected.as_hex())
}

fn hex_digest<D: Digest + io::Write>(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .with_context(|| format!("failed to open file for checksum: {}", path.display()))?;
    let mut hasher = D::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("failed to read file for checksum: {}", path.display()))?;
    Ok(hex::encode(hasher.finalize()))
}
