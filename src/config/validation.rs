//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Every data directory must be an absolute path
//! - Preflight requirements must be well formed
//! - Validate value ranges (log level parses, timeout > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SupervisorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::path::PathBuf;

use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::config::schema::SupervisorConfig;
use crate::lifecycle::startup::DirectoryRole;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{role} folder must be an absolute path, got {path:?}")]
    RelativePath { role: DirectoryRole, path: PathBuf },

    #[error("runtime socket must be an absolute path, got {0:?}")]
    RelativeSocket(PathBuf),

    #[error("at least one required environment variable must be listed")]
    NoRequiredVars,

    #[error("required environment variable #{0} has an empty name")]
    EmptyVarName(usize),

    #[error("unknown log level {0:?}")]
    InvalidLogLevel(String),

    #[error("shutdown timeout must be greater than zero")]
    ZeroShutdownTimeout,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &SupervisorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for role in DirectoryRole::ALL {
        let path = role.path(&config.paths);
        if !path.is_absolute() {
            errors.push(ValidationError::RelativePath {
                role,
                path: path.to_path_buf(),
            });
        }
    }

    if !config.environment.runtime_socket.is_absolute() {
        errors.push(ValidationError::RelativeSocket(
            config.environment.runtime_socket.clone(),
        ));
    }

    if config.environment.required_vars.is_empty() {
        errors.push(ValidationError::NoRequiredVars);
    }
    for (i, name) in config.environment.required_vars.iter().enumerate() {
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyVarName(i));
        }
    }

    if config.logging.level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(config.logging.level.clone()));
    }

    if config.shutdown.timeout_secs == 0 {
        errors.push(ValidationError::ZeroShutdownTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
