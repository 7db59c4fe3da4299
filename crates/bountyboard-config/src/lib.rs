//! Configuration for the bountyboard client core.
//!
//! TOML configuration with three optional sections:
//! - `[backend]` - backend URL, timeout, user agent
//! - `[storage]` - data directory and storage keys
//! - `[auth]` - refresh behavior
//!
//! Config files are layered (user config, then project-local
//! `bountyboard.toml`), and a few values can be overridden from the
//! environment. See [`discovery`] for the resolution order.

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    CONFIG_DIR_ENV, ConfigSource, Layer, LoadedConfig, config_dir, load_config, load_config_file,
    load_config_from, save_config, user_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
