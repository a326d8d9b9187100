//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Preflight (preflight.rs):
//!     Required env vars → runtime socket → readiness bool
//!
//! Startup (startup.rs):
//!     Load config → Create missing data directories
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGHUP/SIGINT → spawn Application::stop()
//!
//! Shutdown (shutdown.rs):
//!     Broadcast → subsystems wind down → drain with timeout
//! ```
//!
//! # Design Decisions
//! - Ordered startup: logging, preflight, layout, then signals
//! - Preflight and layout failures are fatal; signal binding failures are not
//! - Shutdown has timeout: stop completes after the deadline even if a
//!   subsystem is stuck

pub mod preflight;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use preflight::{check_environment, Preflight, PreflightError};
pub use shutdown::Shutdown;
pub use signals::{register_shutdown, Application, EventLoop, TerminationSignal, TokioEventLoop};
pub use startup::{ensure_layout, DirectoryRole, LayoutError};
