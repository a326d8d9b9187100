//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for SIGTERM, SIGHUP and SIGINT
//! - Translate each delivery into a scheduled `stop()` task
//!
//! # Design Decisions
//! - The handler never runs the shutdown inline; it spawns a task on the
//!   event loop and returns
//! - Every signal is bound independently; a platform refusing one signal
//!   only costs that signal and is logged as a warning
//! - Repeated deliveries each schedule a stop; the application's `stop()`
//!   is expected to be idempotent

use std::fmt;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::Handle;

/// Termination signals routed to the application's shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationSignal {
    Terminate,
    Hangup,
    Interrupt,
}

impl TerminationSignal {
    /// All routed signals, in registration order.
    pub const ALL: [TerminationSignal; 3] = [
        TerminationSignal::Terminate,
        TerminationSignal::Hangup,
        TerminationSignal::Interrupt,
    ];

    /// Conventional signal name.
    pub fn name(&self) -> &'static str {
        match self {
            TerminationSignal::Terminate => "SIGTERM",
            TerminationSignal::Hangup => "SIGHUP",
            TerminationSignal::Interrupt => "SIGINT",
        }
    }

    #[cfg(unix)]
    fn kind(&self) -> tokio::signal::unix::SignalKind {
        use tokio::signal::unix::SignalKind;

        match self {
            TerminationSignal::Terminate => SignalKind::terminate(),
            TerminationSignal::Hangup => SignalKind::hangup(),
            TerminationSignal::Interrupt => SignalKind::interrupt(),
        }
    }
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure to bind a single signal.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("{0} is not supported on this platform")]
    Unsupported(TerminationSignal),

    #[error("failed to install {signal} handler: {source}")]
    Install {
        signal: TerminationSignal,
        #[source]
        source: io::Error,
    },
}

/// Callback run on each delivery of a bound signal.
pub type SignalHandler = Box<dyn Fn() + Send + Sync + 'static>;

/// A unit of work scheduled on the event loop.
pub type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// The scheduler that hosts signal handlers and the tasks they spawn.
pub trait EventLoop: Clone + Send + Sync + 'static {
    /// Run `handler` every time `signal` is delivered.
    fn add_signal_handler(
        &self,
        signal: TerminationSignal,
        handler: SignalHandler,
    ) -> Result<(), SignalError>;

    /// Schedule `task` to run on the loop. Must not block.
    fn create_task(&self, task: Task);
}

/// Long-lived object that signals can stop.
pub trait Application: Send + Sync + 'static {
    /// Gracefully shut the application down.
    fn stop(&self) -> impl Future<Output = ()> + Send;
}

/// Route every termination signal to `application.stop()`.
///
/// Returns the signals that were actually bound. Failures are logged and
/// never abort registration of the remaining signals.
pub fn register_shutdown<L, A>(event_loop: &L, application: &Arc<A>) -> Vec<TerminationSignal>
where
    L: EventLoop,
    A: Application,
{
    let mut bound = Vec::with_capacity(TerminationSignal::ALL.len());

    for signal in TerminationSignal::ALL {
        let scheduler = event_loop.clone();
        let app = Arc::clone(application);
        let handler: SignalHandler = Box::new(move || {
            tracing::info!(signal = %signal, "Signal received, scheduling shutdown");
            let app = Arc::clone(&app);
            scheduler.create_task(Box::pin(async move { app.stop().await }));
        });

        match event_loop.add_signal_handler(signal, handler) {
            Ok(()) => {
                tracing::debug!(signal = %signal, "Signal handler installed");
                bound.push(signal);
            }
            Err(e) => tracing::warn!(error = %e, "Could not bind to {}", signal),
        }
    }

    bound
}

/// Event loop backed by a Tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioEventLoop {
    handle: Handle,
}

impl TokioEventLoop {
    /// Wrap a runtime handle.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

impl EventLoop for TokioEventLoop {
    #[cfg(unix)]
    fn add_signal_handler(
        &self,
        signal: TerminationSignal,
        handler: SignalHandler,
    ) -> Result<(), SignalError> {
        let mut stream = {
            let _guard = self.handle.enter();
            tokio::signal::unix::signal(signal.kind())
                .map_err(|source| SignalError::Install { signal, source })?
        };

        self.handle.spawn(async move {
            while stream.recv().await.is_some() {
                handler();
            }
        });
        Ok(())
    }

    #[cfg(not(unix))]
    fn add_signal_handler(
        &self,
        signal: TerminationSignal,
        _handler: SignalHandler,
    ) -> Result<(), SignalError> {
        Err(SignalError::Unsupported(signal))
    }

    fn create_task(&self, task: Task) {
        self.handle.spawn(task);
    }
}
