//! Startup: data directory layout.
//!
//! # Responsibilities
//! - Make sure every data directory the supervisor relies on exists
//! - Log each directory that had to be created
//!
//! # Design Decisions
//! - Runs once, after config is loaded and before anything touches the disk
//! - Idempotent: existing directories are left alone and not logged
//! - Fail fast: a creation error is returned to the caller, nothing is rolled back
//! - Only add-on directories are created with their parents; the config, ssl
//!   and backup folders expect their parent to already be mounted

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{PathsConfig, SupervisorConfig};

/// Semantic role of a managed data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectoryRole {
    Config,
    Ssl,
    AddonsData,
    AddonsLocal,
    AddonsGit,
    AddonsBuild,
    Backup,
}

impl DirectoryRole {
    /// All roles, in the order they are created.
    pub const ALL: [DirectoryRole; 7] = [
        DirectoryRole::Config,
        DirectoryRole::Ssl,
        DirectoryRole::AddonsData,
        DirectoryRole::AddonsLocal,
        DirectoryRole::AddonsGit,
        DirectoryRole::AddonsBuild,
        DirectoryRole::Backup,
    ];

    /// Human-readable label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            DirectoryRole::Config => "Home-Assistant config",
            DirectoryRole::Ssl => "Home-Assistant ssl",
            DirectoryRole::AddonsData => "addon data",
            DirectoryRole::AddonsLocal => "addon local repository",
            DirectoryRole::AddonsGit => "addon git repositories",
            DirectoryRole::AddonsBuild => "addon build",
            DirectoryRole::Backup => "backup",
        }
    }

    /// Whether missing parent directories are created as well.
    pub fn creates_parents(&self) -> bool {
        matches!(
            self,
            DirectoryRole::AddonsData
                | DirectoryRole::AddonsLocal
                | DirectoryRole::AddonsGit
                | DirectoryRole::AddonsBuild
        )
    }

    /// The configured path for this role.
    pub fn path<'a>(&self, paths: &'a PathsConfig) -> &'a Path {
        match self {
            DirectoryRole::Config => &paths.config,
            DirectoryRole::Ssl => &paths.ssl,
            DirectoryRole::AddonsData => &paths.addons_data,
            DirectoryRole::AddonsLocal => &paths.addons_local,
            DirectoryRole::AddonsGit => &paths.addons_git,
            DirectoryRole::AddonsBuild => &paths.addons_build,
            DirectoryRole::Backup => &paths.backup,
        }
    }
}

impl fmt::Display for DirectoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure to lay out the data directories.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to create {role} folder {}: {source}", path.display())]
    Create {
        role: DirectoryRole,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Create every missing data directory, returning the roles that were created.
pub fn ensure_directories(paths: &PathsConfig) -> Result<Vec<DirectoryRole>, LayoutError> {
    let mut created = Vec::new();

    for role in DirectoryRole::ALL {
        let path = role.path(paths);
        if path.is_dir() {
            continue;
        }

        tracing::info!(path = %path.display(), "Create {} folder", role);

        let result = if role.creates_parents() {
            fs::create_dir_all(path)
        } else {
            fs::create_dir(path)
        };
        result.map_err(|source| LayoutError::Create {
            role,
            path: path.to_path_buf(),
            source,
        })?;

        created.push(role);
    }

    Ok(created)
}

/// Ensure the data layout described by `config` exists on disk.
///
/// Hands the configuration back so startup can continue with it.
pub fn ensure_layout(config: SupervisorConfig) -> Result<SupervisorConfig, LayoutError> {
    ensure_directories(&config.paths)?;
    Ok(config)
}
