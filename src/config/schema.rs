//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the supervisor.
//! All types derive Serde traits for deserialization from config files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default root under which all supervisor data directories live.
pub const DEFAULT_DATA_ROOT: &str = "/data";

/// Default location of the container runtime control socket.
pub const DEFAULT_RUNTIME_SOCKET: &str = "/var/run/docker.sock";

/// Environment variables that must be bound before startup may proceed.
pub const REQUIRED_ENV_VARS: [&str; 3] = [
    "SUPERVISOR_SHARE",
    "SUPERVISOR_NAME",
    "HOMEASSISTANT_REPOSITORY",
];

/// Root configuration for the supervisor.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Data directories managed by the supervisor.
    pub paths: PathsConfig,

    /// Preflight requirements on the host environment.
    pub environment: EnvironmentConfig,

    /// Log output settings.
    pub logging: LoggingConfig,

    /// Graceful shutdown settings.
    pub shutdown: ShutdownConfig,
}

/// Data directory layout.
///
/// Every path must be absolute. The paths are independent of each other;
/// nothing here assumes that one is nested below another.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Home Assistant configuration folder.
    pub config: PathBuf,

    /// Shared SSL certificates folder.
    pub ssl: PathBuf,

    /// Persistent add-on data.
    pub addons_data: PathBuf,

    /// Local add-on repository.
    pub addons_local: PathBuf,

    /// Cloned add-on git repositories.
    pub addons_git: PathBuf,

    /// Scratch space for add-on image builds.
    pub addons_build: PathBuf,

    /// Snapshot/backup archives.
    pub backup: PathBuf,
}

impl PathsConfig {
    /// Derive the standard layout below `root`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            config: root.join("homeassistant"),
            ssl: root.join("ssl"),
            addons_data: root.join("addons/data"),
            addons_local: root.join("addons/local"),
            addons_git: root.join("addons/git"),
            addons_build: root.join("addons/build"),
            backup: root.join("backup"),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self::under(DEFAULT_DATA_ROOT)
    }
}

/// Preflight requirements.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Variables checked in order; the first unbound one fails preflight.
    pub required_vars: Vec<String>,

    /// Unix socket exposing the container runtime API.
    pub runtime_socket: PathBuf,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            required_vars: REQUIRED_ENV_VARS.iter().map(|v| v.to_string()).collect(),
            runtime_socket: PathBuf::from(DEFAULT_RUNTIME_SOCKET),
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level (trace, debug, info, warn, error).
    pub level: String,

    /// Targets whose routine output is suppressed below warn.
    pub quiet_targets: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            // HTTP access logging is far too chatty at info.
            quiet_targets: vec!["tower_http".to_string()],
        }
    }
}

/// Graceful shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long `stop()` waits for subsystems to drain, in seconds.
    pub timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}
