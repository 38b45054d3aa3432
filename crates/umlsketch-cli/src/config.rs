//! Locating and loading the CLI configuration.
//!
//! A configuration comes from one of four places, first match wins: the
//! `--config` path, `umlsketch/config.toml` under the working directory,
//! `config.toml` in the platform configuration directory, or the built-in
//! defaults. [`ConfigSource`] records which one was used so the CLI can say
//! where its settings came from.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::debug;
use thiserror::Error;

use umlsketch::{UmlSketchError, config::AppConfig};

const LOCAL_CONFIG: &str = "umlsketch/config.toml";
const CONFIG_FILE: &str = "config.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse TOML configuration {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid setting in {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

impl From<ConfigError> for UmlSketchError {
    fn from(err: ConfigError) -> Self {
        UmlSketchError::Config(err.to_string())
    }
}

/// Where the active configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// `umlsketch/config.toml` in the working directory.
    Local(PathBuf),
    /// The platform configuration directory.
    System(PathBuf),
    /// No file found.
    Default,
}

impl ConfigSource {
    fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(path)
            | ConfigSource::Local(path)
            | ConfigSource::System(path) => Some(path.as_path()),
            ConfigSource::Default => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(path) => write!(f, "{} (--config)", path.display()),
            ConfigSource::Local(path) => write!(f, "{} (working directory)", path.display()),
            ConfigSource::System(path) => write!(f, "{} (user config)", path.display()),
            ConfigSource::Default => f.write_str("built-in defaults"),
        }
    }
}

/// Finds and loads the configuration, returning it with its origin.
///
/// # Errors
///
/// Returns [`UmlSketchError::Config`] when an explicit path does not exist,
/// or when the chosen file cannot be read, parsed or validated.
pub fn load_config(
    explicit_path: Option<impl AsRef<Path>>,
) -> Result<(AppConfig, ConfigSource), UmlSketchError> {
    let system_dir = ProjectDirs::from("com", "umlsketch", "umlsketch")
        .map(|dirs| dirs.config_dir().to_path_buf());
    if system_dir.is_none() {
        debug!("Could not determine platform-specific config directory");
    }

    let source = locate(explicit_path, Path::new("."), system_dir.as_deref());
    let config = match source.path() {
        Some(path) => read_config(path)?,
        None => AppConfig::default(),
    };
    Ok((config, source))
}

/// Picks the configuration file without reading it.
///
/// `work_dir` is searched for `umlsketch/config.toml` and `system_dir` for
/// `config.toml`.
fn locate(
    explicit_path: Option<impl AsRef<Path>>,
    work_dir: &Path,
    system_dir: Option<&Path>,
) -> ConfigSource {
    if let Some(path) = explicit_path {
        return ConfigSource::Explicit(path.as_ref().to_path_buf());
    }

    let local = work_dir.join(LOCAL_CONFIG);
    if local.is_file() {
        return ConfigSource::Local(local);
    }
    debug!(path:? = local; "No local configuration");

    if let Some(dir) = system_dir {
        let system = dir.join(CONFIG_FILE);
        if system.is_file() {
            return ConfigSource::System(system);
        }
        debug!(path:? = system; "No system configuration");
    }

    ConfigSource::Default
}

/// Reads, parses and validates one configuration file.
fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::MissingFile(path.to_path_buf())
        } else {
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let config: AppConfig = toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    config.validate().map_err(|message| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    })?;

    Ok(config)
}
