use anyhow::{anyhow, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checksum {
    Md5(String),
    Sha256(String),
}

impl Checksum {
    pub fn parse(input: &str) -> Result<Self> {
        let hex = input.trim().to_ascii_lowercase();
        if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(anyhow!("checksum must be hexadecimal: {input}"));
        }
        match hex.len() {
            32 => Ok(Self::Md5(hex)),
            64 => Ok(Self::Sha256(hex)),
            other => Err(anyhow!(
                "checksum must be 32 (md5) or 64 (sha256) hex characters, got {other}: {input}"
            )),
        }
    }

    pub fn as_hex(&self) -> &str {
        match self {
            Self::Md5(hex) | Self::Sha256(hex) => hex,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Md5(_) => "md5",
            Self::Sha256(_) => "sha256",
        }
    }
}
