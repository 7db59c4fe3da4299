//! CLI command handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use bountyboard_auth::{SharedSessionProvider, TokenStore};
use bountyboard_client::BountyClient;
use bountyboard_config::{BountyboardConfig, LoadedConfig};
use bountyboard_storage::{FileStore, SharedStore};

pub mod auth;
pub mod bookmarks;
pub mod config;
pub mod winners;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Merged configuration and where it came from.
    pub loaded: LoadedConfig,
    /// Backend URL to talk to.
    pub backend_url: String,
    /// Directory backing the key-value store.
    pub data_dir: PathBuf,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Resolve the effective backend and data directory. CLI flags win over
    /// the environment, which wins over config files.
    pub fn new(
        loaded: LoadedConfig,
        backend: Option<String>,
        data_dir: Option<PathBuf>,
        json_output: bool,
        verbose: bool,
    ) -> Self {
        let backend_url = backend
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| loaded.config.backend_url());
        let data_dir = data_dir.unwrap_or_else(|| loaded.config.data_dir());
        Self {
            loaded,
            backend_url,
            data_dir,
            json_output,
            verbose,
        }
    }

    pub fn config(&self) -> &BountyboardConfig {
        &self.loaded.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Durable key-value store in the data directory.
    pub fn store(&self) -> SharedStore {
        Arc::new(FileStore::new(&self.data_dir))
    }

    /// Session store over [`store`](Self::store).
    pub fn session(&self) -> SharedSessionProvider {
        TokenStore::with_key(self.store(), self.config().session_key()).shared()
    }

    /// HTTP client wired to the stored session and the configured refresh policy.
    pub fn client(&self) -> Result<BountyClient> {
        let config = self.config();
        let mut builder = BountyClient::builder()
            .base_url(&self.backend_url)
            .session(self.session())
            .timeout(config.timeout())
            .no_refresh_paths(config.no_refresh_paths())
            .coalesce_refresh(config.coalesce_refresh());
        if let Some(agent) = config.user_agent() {
            builder = builder.user_agent(agent);
        }
        Ok(builder.build()?)
    }
}

/// Print a value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
