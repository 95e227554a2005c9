use std::any::Any;
use std::env::vars;
use std::path::PathBuf;

use anyhow::{Context, bail};
use roster_states::{SnapshotClone, State, assign_impl};
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    /// Base URL every endpoint path is appended to, without a trailing slash.
    pub api_base_url: String,
    pub page_size: usize,
    /// Where the persisted bearer token lives. `None` uses the platform config dir.
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    roster_api_url: Option<String>,
    roster_page_size: Option<usize>,
    roster_token_file: Option<PathBuf>,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into().trim_end_matches('/').to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            token_file: None,
        }
    }

    /// Reads `ROSTER_*` variables, after loading `.env` when present.
    pub fn init() -> anyhow::Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::info!("Loaded environment from {}", path.display());
        }
        let raw: RawConfig =
            serde_env::from_iter(vars()).context("Failed to read ROSTER_* environment")?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> anyhow::Result<Self> {
        let RawConfig {
            roster_api_url,
            roster_page_size,
            roster_token_file,
        } = raw;

        let mut config = Self::new(roster_api_url.unwrap_or_else(|| DEFAULT_API_URL.to_owned()));
        if config.api_base_url.is_empty() {
            bail!("ROSTER_API_URL must not be empty");
        }
        match roster_page_size {
            Some(0) => bail!("ROSTER_PAGE_SIZE must be greater than zero"),
            Some(size) => config.page_size = size,
            None => {}
        }
        config.token_file = roster_token_file;

        log::info!(
            "Using API {} with page size {}",
            config.api_base_url,
            config.page_size
        );
        Ok(config)
    }

    pub fn api_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl SnapshotClone for BusinessConfig {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for BusinessConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}
