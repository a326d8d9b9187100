//! Structured logging.
//!
//! # Responsibilities
//! - Install the process-wide `tracing` subscriber, exactly once
//! - Render `<timestamp> <level> (<thread>) [<target>] <message>` lines
//! - Color lines by level when stdout is a terminal
//! - Silence chatty third-party targets below warn
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level when present; quiet targets
//!   stay at warn regardless
//! - A second install attempt is an error, never a second formatter

use std::fmt;
use std::io::IsTerminal;

use thiserror::Error;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Timestamp layout, e.g. `24-03-09 14:02:11`.
pub const DATE_FORMAT: &str = "%y-%m-%d %H:%M:%S";

const RESET: &str = "\x1b[0m";

/// Failure to install logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("a global logger is already installed")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}

/// Terminal color assigned to a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelColor {
    Cyan,
    Green,
    Yellow,
    Red,
}

impl LevelColor {
    /// Color for `level`. Trace shares the debug color.
    pub fn for_level(level: &Level) -> Self {
        match *level {
            Level::TRACE | Level::DEBUG => LevelColor::Cyan,
            Level::INFO => LevelColor::Green,
            Level::WARN => LevelColor::Yellow,
            _ => LevelColor::Red,
        }
    }

    /// ANSI escape that switches to this color.
    pub fn ansi(&self) -> &'static str {
        match self {
            LevelColor::Cyan => "\x1b[36m",
            LevelColor::Green => "\x1b[32m",
            LevelColor::Yellow => "\x1b[33m",
            LevelColor::Red => "\x1b[31m",
        }
    }
}

fn level_label(level: &Level) -> &'static str {
    if *level == Level::WARN {
        "WARNING"
    } else {
        level.as_str()
    }
}

/// Event formatter producing the supervisor's line layout.
#[derive(Debug, Clone)]
pub struct SupervisorFormat {
    ansi: bool,
}

impl SupervisorFormat {
    /// Create a formatter; `ansi` enables level colors.
    pub fn new(ansi: bool) -> Self {
        Self { ansi }
    }
}

impl<S, N> FormatEvent<S, N> for SupervisorFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        if self.ansi {
            writer.write_str(LevelColor::for_level(meta.level()).ansi())?;
        }

        let thread = std::thread::current();
        write!(
            writer,
            "{} {} ({}) [{}] ",
            chrono::Local::now().format(DATE_FORMAT),
            level_label(meta.level()),
            thread.name().unwrap_or("unnamed"),
            meta.target(),
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;

        if self.ansi {
            writer.write_str(RESET)?;
        }
        writeln!(writer)
    }
}

/// Build the level filter: `RUST_LOG` if set, otherwise the config.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    build_filter_from(from_env.as_deref(), config)
}

/// Build the level filter from an explicit base directive string.
///
/// `base` replaces the configured level; quiet targets are raised to warn
/// either way.
pub fn build_filter_from(
    base: Option<&str>,
    config: &LoggingConfig,
) -> Result<EnvFilter, LoggingError> {
    let base = base
        .filter(|b| !b.trim().is_empty())
        .unwrap_or(config.level.as_str());

    let mut filter = EnvFilter::try_new(base)?;
    for target in &config.quiet_targets {
        filter = filter.add_directive(format!("{}=warn", target).parse::<Directive>()?);
    }
    Ok(filter)
}

/// Install the global subscriber writing to stdout.
///
/// Must run before anything else logs. Calling it twice fails with
/// [`LoggingError::AlreadyInstalled`].
pub fn configure_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;
    let ansi = std::io::stdout().is_terminal();

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(ansi)
                .with_writer(std::io::stdout)
                .event_format(SupervisorFormat::new(ansi)),
        )
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(ansi: bool, f: impl FnOnce()) -> String {
        let out = Captured::default();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_ansi(ansi)
                .with_writer(out.clone())
                .event_format(SupervisorFormat::new(ansi)),
        );
        tracing::subscriber::with_default(subscriber, f);
        out.contents()
    }

    #[test]
    fn line_layout() {
        let output = std::thread::Builder::new()
            .name("bootstrap".into())
            .spawn(|| {
                capture(false, || {
                    tracing::warn!(target: "supervisor::docker", "socket slow");
                })
            })
            .unwrap()
            .join()
            .unwrap();

        let line = output.trim_end();
        // "yy-mm-dd HH:MM:SS" is 17 characters.
        let (stamp, rest) = line.split_at(17);
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, DATE_FORMAT).is_ok());
        assert_eq!(rest, " WARNING (bootstrap) [supervisor::docker] socket slow");
    }

    #[test]
    fn colors_only_when_enabled() {
        let plain = capture(false, || tracing::info!("hello"));
        assert!(!plain.contains('\x1b'));

        let colored = capture(true, || tracing::info!("hello"));
        assert!(colored.starts_with(LevelColor::Green.ansi()));
        assert!(colored.trim_end().ends_with(RESET));
    }

    #[test]
    fn level_colors() {
        assert_eq!(LevelColor::for_level(&Level::DEBUG), LevelColor::Cyan);
        assert_eq!(LevelColor::for_level(&Level::INFO), LevelColor::Green);
        assert_eq!(LevelColor::for_level(&Level::WARN), LevelColor::Yellow);
        assert_eq!(LevelColor::for_level(&Level::ERROR), LevelColor::Red);
    }

    #[test]
    fn quiet_targets_are_raised_to_warn() {
        let config = LoggingConfig::default();
        let filter = build_filter_from(None, &config).unwrap().to_string();
        assert!(filter.contains("tower_http=warn"), "{filter}");
        assert!(filter.contains("info"), "{filter}");
    }

    #[test]
    fn env_base_keeps_quiet_targets() {
        let config = LoggingConfig::default();

        let filter = build_filter_from(Some("info"), &config).unwrap().to_string();
        assert!(filter.contains("tower_http=warn"), "{filter}");

        // Even an explicit request for chatty access logs is held at warn.
        let filter = build_filter_from(Some("debug,tower_http=debug"), &config)
            .unwrap()
            .to_string();
        assert!(filter.contains("tower_http=warn"), "{filter}");
        assert!(filter.contains("debug"), "{filter}");
    }

    #[test]
    fn empty_env_base_falls_back_to_config() {
        let config = LoggingConfig {
            level: "warn".into(),
            ..Default::default()
        };
        let filter = build_filter_from(Some("  "), &config).unwrap().to_string();
        assert!(filter.contains("warn"), "{filter}");
        assert!(!filter.contains("info"), "{filter}");
    }

    #[test]
    fn bad_level_is_rejected() {
        let config = LoggingConfig {
            level: "tower_http=loud".into(),
            ..Default::default()
        };
        assert!(matches!(
            build_filter_from(None, &config),
            Err(LoggingError::Filter(_))
        ));
    }
}
