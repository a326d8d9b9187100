//! Shared utilities for bootstrap integration tests.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

use host_supervisor::lifecycle::signals::{SignalError, SignalHandler, Task};
use host_supervisor::lifecycle::{EventLoop, TerminationSignal};

/// Environment with every required variable bound.
pub fn full_env() -> HashMap<String, String> {
    [
        ("SUPERVISOR_SHARE", "/share"),
        ("SUPERVISOR_NAME", "hassio_supervisor"),
        ("HOMEASSISTANT_REPOSITORY", "homeassistant/qemux86-64"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Bind a Unix socket standing in for the container runtime.
///
/// The listener must be kept alive for the socket file to stay meaningful.
pub fn fake_runtime_socket(path: &Path) -> std::os::unix::net::UnixListener {
    std::os::unix::net::UnixListener::bind(path).unwrap()
}

/// Event loop that refuses a chosen set of signals and lets tests deliver
/// the rest by hand. Tasks are spawned on the ambient Tokio runtime.
#[derive(Clone, Default)]
pub struct ScriptedLoop {
    refused: Arc<HashSet<TerminationSignal>>,
    handlers: Arc<Mutex<HashMap<TerminationSignal, SignalHandler>>>,
}

impl ScriptedLoop {
    pub fn refusing(signals: &[TerminationSignal]) -> Self {
        Self {
            refused: Arc::new(signals.iter().copied().collect()),
            handlers: Arc::default(),
        }
    }

    /// Simulate delivery of `signal`. Returns false if no handler is bound.
    pub fn deliver(&self, signal: TerminationSignal) -> bool {
        let handlers = self.handlers.lock().unwrap();
        match handlers.get(&signal) {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl EventLoop for ScriptedLoop {
    fn add_signal_handler(
        &self,
        signal: TerminationSignal,
        handler: SignalHandler,
    ) -> Result<(), SignalError> {
        if self.refused.contains(&signal) {
            return Err(SignalError::Unsupported(signal));
        }
        self.handlers.lock().unwrap().insert(signal, handler);
        Ok(())
    }

    fn create_task(&self, task: Task) {
        tokio::spawn(task);
    }
}
