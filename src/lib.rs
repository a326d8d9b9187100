//! Host Supervisor Library
//!
//! Startup and shutdown plumbing for the host supervisor: data directory
//! layout, log formatting, preflight environment checks and routing of
//! termination signals to a graceful stop.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod supervisor;

pub use config::SupervisorConfig;
pub use lifecycle::Shutdown;
pub use supervisor::{CoreState, Supervisor};
