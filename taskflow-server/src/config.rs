//! Server settings: bind address and log filter.
//!
//! Each value comes from the first source that sets it: a CLI flag (or its
//! env var), then `[server]` in `~/.config/taskflow-server/config.toml`, then
//! the built-in default.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Why the server settings could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read, or `--config` names a
    /// missing file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// File that was tried.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The bind address is not `host:port` with a numeric host.
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBind {
        /// Value as given.
        value: String,
        /// Parse failure.
        source: std::net::AddrParseError,
    },
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct FileSettings {
    server: FileServerSection,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct FileServerSection {
    bind_addr: Option<String>,
    log_level: Option<String>,
}

/// Command line of `taskflow-server`.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "TaskFlow task API server")]
pub struct ServerCliArgs {
    /// Address to listen on, e.g. `0.0.0.0:8080`.
    #[arg(short, long, env = "TASKFLOW_ADDR")]
    pub bind: Option<String>,

    /// Config file to read instead of the default location.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// tracing filter, e.g. `debug` or `taskflow_server=trace`.
    #[arg(long, env = "TASKFLOW_LOG")]
    pub log_level: Option<String>,
}

/// Settings the server starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listening address.
    pub bind_addr: SocketAddr,
    /// tracing `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl ServerConfig {
    /// Reads the config file and layers the CLI over it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or the
    /// resolved bind address is malformed.
    pub fn load(cli: &ServerCliArgs) -> Result<Self, ConfigError> {
        let file = read_settings(cli.config.as_deref())?;
        Self::resolve(cli, file)
    }

    fn resolve(cli: &ServerCliArgs, file: FileSettings) -> Result<Self, ConfigError> {
        let bind = cli
            .bind
            .clone()
            .or(file.server.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .parse()
            .map_err(|source| ConfigError::InvalidBind { value: bind, source })?;

        Ok(Self {
            bind_addr,
            log_level: cli
                .log_level
                .clone()
                .or(file.server.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

/// An explicit path must exist; the default path may be absent.
fn read_settings(explicit: Option<&Path>) -> Result<FileSettings, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match dirs::config_dir() {
            Some(dir) => (dir.join("taskflow-server").join("config.toml"), false),
            None => return Ok(FileSettings::default()),
        },
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            Ok(FileSettings::default())
        }
        Err(source) => Err(ConfigError::ReadFile { path, source }),
    }
}
