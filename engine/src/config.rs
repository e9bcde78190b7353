use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use serde::Deserialize;

use crate::catalog::Catalog;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_SERVER: &str = "CARDBOUND_SERVER";
pub const ENV_TIMEOUT: &str = "CARDBOUND_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub catalog_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            catalog_path: None,
        }
    }
}

impl ClientConfig {
    /// Read a `.json`, `.yaml` or `.yml` config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_text_auto(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let cfg: ClientConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
                .with_context(|| format!("failed to parse config YAML: {}", path.display()))?,
            _ => serde_json::from_str(&text)
                .with_context(|| format!("failed to parse config JSON: {}", path.display()))?,
        };
        Ok(cfg)
    }

    /// Apply `CARDBOUND_SERVER` / `CARDBOUND_TIMEOUT_SECS` on top of `self`.
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|key| std::env::var(key).ok())
    }

    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(ENV_SERVER) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            self.timeout_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", ENV_TIMEOUT))?;
        }
        Ok(self)
    }

    pub fn catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => load_catalog(path),
            None => Ok(Catalog::standard()),
        }
    }
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let text = read_text_auto(path)
        .with_context(|| format!("failed to read catalog: {}", path.display()))?;
    let catalog = Catalog::from_json(&text)
        .with_context(|| format!("failed to parse catalog: {}", path.display()))?;
    Ok(catalog)
}

/// Read a text file, honouring a UTF-8/UTF-16 byte-order mark when present.
pub fn read_text_auto(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}
