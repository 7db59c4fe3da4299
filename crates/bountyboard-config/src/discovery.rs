//! Finding and layering config files.
//!
//! Two layers are read, user first, so project values win:
//! the user file `<config dir>/config.toml` and the project file
//! `bountyboard.toml` in the working directory. Environment variables and CLI
//! flags sit above both and are applied by the accessors and the binary.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{BountyboardConfig, ConfigError, Result};

const PROJECT_CONFIG_FILE: &str = "bountyboard.toml";
const USER_CONFIG_FILE: &str = "config.toml";
const APP_NAME: &str = "bountyboard";

/// Overrides the platform config directory.
pub const CONFIG_DIR_ENV: &str = "BOUNTYBOARD_CONFIG_DIR";

/// Which layer a config file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    User,
    Project,
}

impl Layer {
    pub fn label(self) -> &'static str {
        match self {
            Layer::User => "user",
            Layer::Project => "project",
        }
    }
}

/// One candidate file and whether it contributed to the result.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub layer: Layer,
    pub path: PathBuf,
    pub loaded: bool,
}

/// Merged config plus an account of how it was built.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: BountyboardConfig,
    /// Candidates in merge order.
    pub sources: Vec<ConfigSource>,
    /// One entry per file that exists but could not be used.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }
}

/// Load the user layer from [`config_dir`] and the project layer from
/// `project_dir` (the working directory when `None`).
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_config_from(project_dir, None)
}

/// Like [`load_config`], reading the user layer from `config_dir` when given.
pub fn load_config_from(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let user = match config_dir {
        Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
        None => user_config_path(),
    };
    let project = project_dir
        .unwrap_or_else(|| Path::new("."))
        .join(PROJECT_CONFIG_FILE);

    let candidates = user
        .map(|path| (Layer::User, path))
        .into_iter()
        .chain([(Layer::Project, project)]);

    let mut loaded = LoadedConfig {
        config: BountyboardConfig::new(),
        sources: Vec::new(),
        warnings: Vec::new(),
    };
    for (layer, path) in candidates {
        let contributed = match read_optional(&path) {
            Ok(Some(layer_config)) => {
                loaded.config.merge(layer_config);
                true
            }
            Ok(None) => false,
            Err(e) => {
                loaded.warnings.push(format!("{} config skipped: {}", layer.label(), e));
                false
            }
        };
        loaded.sources.push(ConfigSource {
            layer,
            path,
            loaded: contributed,
        });
    }
    Ok(loaded)
}

/// Read and parse one file. A missing file is an error here.
pub fn load_config_file(path: &Path) -> Result<BountyboardConfig> {
    read_optional(path)?.ok_or_else(|| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: ErrorKind::NotFound.into(),
    })
}

/// Write `config` to `path`, creating missing directories. The file is
/// replaced in one rename so readers never see a partial write.
pub fn save_config(config: &BountyboardConfig, path: &Path) -> Result<()> {
    let write_err = |source| ConfigError::WriteFile {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    let staged = path.with_extension("toml.tmp");
    std::fs::write(&staged, config.to_toml()?).map_err(write_err)?;
    std::fs::rename(&staged, path).map_err(write_err)
}

/// `<config dir>/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// `BOUNTYBOARD_CONFIG_DIR` if set and non-empty, else the platform config
/// directory plus `bountyboard`. Also hosts the log directory.
pub fn config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|d| d.join(APP_NAME)),
    }
}

/// `Ok(None)` when the file does not exist.
fn read_optional(path: &Path) -> Result<Option<BountyboardConfig>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::ReadFile {
                path: path.display().to_string(),
                source,
            });
        }
    };
    BountyboardConfig::from_toml(&contents)
        .map(Some)
        .map_err(|e| ConfigError::InvalidFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Dirs {
        user: TempDir,
        project: TempDir,
    }

    impl Dirs {
        fn new() -> Self {
            Self {
                user: TempDir::new().unwrap(),
                project: TempDir::new().unwrap(),
            }
        }

        fn write_user(&self, contents: &str) {
            fs::write(self.user.path().join(USER_CONFIG_FILE), contents).unwrap();
        }

        fn write_project(&self, contents: &str) {
            fs::write(self.project.path().join(PROJECT_CONFIG_FILE), contents).unwrap();
        }

        fn load(&self) -> LoadedConfig {
            load_config_from(Some(self.project.path()), Some(self.user.path())).unwrap()
        }
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_bad_toml_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is not valid toml {{{{").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFile { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_no_files_gives_defaults() {
        let dirs = Dirs::new();
        let loaded = dirs.load();

        assert_eq!(loaded.config, BountyboardConfig::default());
        assert!(loaded.loaded_from().is_empty());
        let layers: Vec<Layer> = loaded.sources.iter().map(|s| s.layer).collect();
        assert_eq!(layers, vec![Layer::User, Layer::Project]);
    }

    #[test]
    fn test_project_layer_overrides_user_layer() {
        let dirs = Dirs::new();
        dirs.write_user(
            "[backend]\nurl = \"https://api.example.com\"\n\n[auth]\ncoalesce_refresh = false\n",
        );
        dirs.write_project("[backend]\nurl = \"http://localhost:5000\"\n");

        let loaded = dirs.load();
        let backend = loaded.config.backend.as_ref().unwrap();
        assert_eq!(backend.url.as_deref(), Some("http://localhost:5000"));
        // Untouched by the project file.
        assert!(!loaded.config.coalesce_refresh());
        assert_eq!(loaded.loaded_from().len(), 2);
    }

    #[test]
    fn test_broken_layer_is_skipped_with_warning() {
        let dirs = Dirs::new();
        dirs.write_user("[storage]\nbookmarks_key = \"mine\"\n");
        dirs.write_project("[backend\nurl=");

        let loaded = dirs.load();
        assert_eq!(loaded.config.bookmarks_key(), "mine");
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains(PROJECT_CONFIG_FILE));
        assert_eq!(loaded.loaded_from(), vec![dirs.user.path().join(USER_CONFIG_FILE)]);
    }

    #[test]
    fn test_save_creates_dirs_and_leaves_no_staging_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");
        let config = BountyboardConfig::from_toml("[storage]\nbookmarks_key = \"saved\"").unwrap();

        save_config(&config, &path).unwrap();
        assert_eq!(load_config_file(&path).unwrap(), config);
        assert!(!path.with_extension("toml.tmp").exists());
    }
}
