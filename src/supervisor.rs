//! The long-lived supervisor object.
//!
//! Owns the validated configuration and the shutdown coordinator, and
//! publishes its lifecycle state so callers can wait on transitions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::config::SupervisorConfig;
use crate::lifecycle::signals::Application;
use crate::lifecycle::Shutdown;

/// Lifecycle state of the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreState {
    Initialize,
    Running,
    Stopping,
    Stopped,
}

/// Host supervisor application.
pub struct Supervisor {
    config: Arc<SupervisorConfig>,
    shutdown: Shutdown,
    state: watch::Sender<CoreState>,
}

impl Supervisor {
    /// Create a supervisor in the `Initialize` state.
    pub fn new(config: Arc<SupervisorConfig>) -> Self {
        let (state, _) = watch::channel(CoreState::Initialize);
        Self {
            config,
            shutdown: Shutdown::new(),
            state,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CoreState {
        *self.state.borrow()
    }

    /// Watch lifecycle transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<CoreState> {
        self.state.subscribe()
    }

    /// Shutdown coordinator that subsystems subscribe to.
    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    /// The configuration the supervisor was started with.
    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// Mark the supervisor running and wait until it has fully stopped.
    pub async fn run(&self) {
        self.state.send_if_modified(|state| {
            if *state == CoreState::Initialize {
                *state = CoreState::Running;
                true
            } else {
                false
            }
        });
        tracing::info!("Supervisor is up and running");

        let mut state = self.subscribe_state();
        // The sender lives in `self`, so this only ends once Stopped is seen.
        let _ = state.wait_for(|s| *s == CoreState::Stopped).await;
    }

    /// Stop the supervisor.
    ///
    /// Only the first call does any work; later or concurrent calls return
    /// immediately.
    pub async fn stop(&self) {
        let claimed = self.state.send_if_modified(|state| match *state {
            CoreState::Stopping | CoreState::Stopped => false,
            _ => {
                *state = CoreState::Stopping;
                true
            }
        });
        if !claimed {
            tracing::debug!("Stop already in progress");
            return;
        }

        tracing::info!("Stopping supervisor");
        self.shutdown.trigger();

        let timeout = Duration::from_secs(self.config.shutdown.timeout_secs);
        if !self.shutdown.drain(timeout).await {
            tracing::warn!(
                pending = self.shutdown.receiver_count(),
                timeout_secs = self.config.shutdown.timeout_secs,
                "Subsystems did not stop in time"
            );
        }

        self.state.send_replace(CoreState::Stopped);
        tracing::info!("Supervisor is down");
    }
}

impl Application for Supervisor {
    async fn stop(&self) {
        Supervisor::stop(self).await
    }
}
