//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing macros (structured log events)
//!     → logging.rs (filter + line formatter)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Human-readable single-line format, colored on terminals
//! - Installed once, before any other component logs

pub mod logging;

pub use logging::{configure_logging, LoggingError};
