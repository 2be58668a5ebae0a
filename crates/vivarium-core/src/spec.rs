use anyhow::{anyhow, Context, Result};

use crate::checksum::Checksum;
use crate::dist::ARCHIVE_SUFFIX;

pub const EXPLICIT_MARKER: &str = "@EXPLICIT";

pub const CHECKSUM_ANCHOR: &str = ":#";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitSpec {
    pub location: String,
    pub checksum: Option<Checksum>,
}

pub fn parse_spec_line(line: &str) -> Result<Option<ExplicitSpec>> {
    let line = line.trim();
    if line.is_empty() || line == EXPLICIT_MARKER || line.starts_with('#') {
        return Ok(None);
    }

    let (location, checksum) = match line.split_once(CHECKSUM_ANCHOR) {
        Some((location, checksum)) => (location, Some(checksum)),
        None => (line, None),
    };

    if !location.ends_with(ARCHIVE_SUFFIX) {
        return Err(anyhow!(
            "could not parse package specification (expected a {ARCHIVE_SUFFIX} location): {line}"
        ));
    }

    let checksum = match checksum {
        Some(raw) => Some(
            Checksum::parse(raw)
                .with_context(|| format!("invalid checksum in specification: {line}"))?,
        ),
        None => None,
    };

    Ok(Some(ExplicitSpec {
        location: location.to_string(),
        checksum,
    }))
}
