//! Preflight environment checks.
//!
//! # Responsibilities
//! - Verify the required environment variables are bound
//! - Verify the container runtime control socket is present
//!
//! # Design Decisions
//! - Short-circuits on the first missing variable; the socket is only
//!   inspected once every variable is present
//! - The socket is checked by file type only, never connected to
//! - No side effects besides logging; the caller decides whether to abort

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::EnvironmentConfig;

/// Reason the host is not ready to run the supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreflightError {
    #[error("Can't find {0} in env!")]
    MissingVariable(String),

    #[error("Can't find docker socket at {}!", .0.display())]
    MissingSocket(PathBuf),
}

/// Preflight requirements bound to a concrete environment config.
#[derive(Debug, Clone)]
pub struct Preflight {
    required_vars: Vec<String>,
    socket: PathBuf,
}

impl Preflight {
    /// Create a checker from the environment section of the config.
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            required_vars: config.required_vars.clone(),
            socket: config.runtime_socket.clone(),
        }
    }

    /// Evaluate the requirements, resolving variables through `lookup`.
    pub fn evaluate<F>(&self, lookup: F) -> Result<(), PreflightError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing = self
            .required_vars
            .iter()
            .find(|key| lookup(key.as_str()).is_none());
        if let Some(key) = missing {
            return Err(PreflightError::MissingVariable(key.clone()));
        }

        if !is_socket(&self.socket) {
            return Err(PreflightError::MissingSocket(self.socket.clone()));
        }

        Ok(())
    }

    /// Evaluate the requirements and log the first failure.
    ///
    /// Returns the readiness signal: `true` only when every check passed.
    pub fn check_with<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        match self.evaluate(lookup) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(fatal = true, "{}", e);
                false
            }
        }
    }

    /// Check against the process environment.
    pub fn check(&self) -> bool {
        self.check_with(|key| env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
    }
}

/// Check the process environment against the default requirements.
pub fn check_environment() -> bool {
    Preflight::new(&EnvironmentConfig::default()).check()
}

#[cfg(unix)]
fn is_socket(path: &Path) -> bool {
    use std::os::unix::fs::FileTypeExt;

    std::fs::metadata(path)
        .map(|meta| meta.file_type().is_socket())
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_socket(_path: &Path) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn preflight(socket: PathBuf) -> Preflight {
        Preflight::new(&EnvironmentConfig {
            runtime_socket: socket,
            ..Default::default()
        })
    }

    const FULL_ENV: [(&str, &str); 3] = [
        ("SUPERVISOR_SHARE", "/share"),
        ("SUPERVISOR_NAME", "hassio_supervisor"),
        ("HOMEASSISTANT_REPOSITORY", "homeassistant/qemux86-64"),
    ];

    #[cfg(unix)]
    #[test]
    fn ready_with_variables_and_socket() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("docker.sock");
        let _listener = std::os::unix::net::UnixListener::bind(&socket).unwrap();
        let vars = env_of(&FULL_ENV);

        let check = preflight(socket);
        assert_eq!(check.evaluate(|k| vars.get(k).cloned()), Ok(()));
        assert!(check.check_with(|k| vars.get(k).cloned()));
    }

    #[test]
    fn first_missing_variable_is_reported() {
        let vars = env_of(&[("SUPERVISOR_SHARE", "/share")]);
        let consulted = RefCell::new(Vec::new());

        let result = preflight(PathBuf::from("/nonexistent/docker.sock")).evaluate(|k| {
            consulted.borrow_mut().push(k.to_string());
            vars.get(k).cloned()
        });

        assert_eq!(
            result,
            Err(PreflightError::MissingVariable("SUPERVISOR_NAME".into()))
        );
        // Later variables are never looked at.
        assert_eq!(
            consulted.into_inner(),
            vec!["SUPERVISOR_SHARE".to_string(), "SUPERVISOR_NAME".to_string()]
        );
    }

    #[test]
    fn missing_socket_fails() {
        let dir = tempfile::tempdir().unwrap();
        let vars = env_of(&FULL_ENV);

        let check = preflight(dir.path().join("docker.sock"));
        assert!(matches!(
            check.evaluate(|k| vars.get(k).cloned()),
            Err(PreflightError::MissingSocket(_))
        ));
        assert!(!check.check_with(|k| vars.get(k).cloned()));
    }

    #[test]
    fn regular_file_is_not_a_socket() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("docker.sock");
        std::fs::write(&fake, b"").unwrap();
        let vars = env_of(&FULL_ENV);

        assert!(!preflight(fake).check_with(|k| vars.get(k).cloned()));
    }

    #[test]
    fn default_check_uses_default_requirements() {
        let defaults = Preflight::new(&EnvironmentConfig::default());
        assert_eq!(defaults.required_vars, crate::config::schema::REQUIRED_ENV_VARS);
        assert_eq!(defaults.socket, PathBuf::from("/var/run/docker.sock"));
        assert_eq!(check_environment(), defaults.check());
    }

    #[test]
    fn error_messages_name_the_culprit() {
        let err = PreflightError::MissingVariable("SUPERVISOR_NAME".into());
        assert_eq!(err.to_string(), "Can't find SUPERVISOR_NAME in env!");
    }
}
