//! Tracing for the batch binary: records go to stderr so the JSON report
//! owns stdout, and the level filter can be swapped once settings load.

use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use crate::error::{AppError, AppResult};

/// Filter used before settings are loaded.
pub const BOOTSTRAP_FILTER: &str = "info";

/// Swaps the active level filter of an installed subscriber.
#[derive(Debug, Clone)]
pub struct LogLevelHandle(reload::Handle<EnvFilter, Registry>);

impl LogLevelHandle {
    /// ## Summary
    /// Replaces the active filter with `level`, e.g. `debug` or
    /// `halaqa_calendar=trace,info`.
    ///
    /// ## Errors
    /// Returns `AppError::LogFilter` if `level` is not a valid filter or the
    /// subscriber it belonged to is gone. The previous filter stays active.
    pub fn apply(&self, level: &str) -> AppResult<()> {
        let filter = parse_filter(level)?;
        self.0
            .modify(|current| *current = filter)
            .map_err(|err| AppError::LogFilter {
                level: level.to_string(),
                reason: err.to_string(),
            })
    }

    /// Renders the active filter, if the subscriber is still alive.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.0.with_current(ToString::to_string).ok()
    }
}

/// ## Summary
/// Parses a configured level into a filter. Blank values are rejected
/// rather than silently disabling all output.
///
/// ## Errors
/// Returns `AppError::LogFilter` for blank or malformed directives.
pub fn parse_filter(level: &str) -> AppResult<EnvFilter> {
    let level = level.trim();
    if level.is_empty() {
        return Err(AppError::LogFilter {
            level: level.to_string(),
            reason: "empty filter".to_string(),
        });
    }

    EnvFilter::try_new(level).map_err(|err| AppError::LogFilter {
        level: level.to_string(),
        reason: err.to_string(),
    })
}

fn subscriber() -> (impl Subscriber + Send + Sync + 'static, LogLevelHandle) {
    let (filter_layer, handle) = reload::Layer::new(EnvFilter::new(BOOTSTRAP_FILTER));

    let subscriber = tracing_subscriber::registry().with(filter_layer).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    (subscriber, LogLevelHandle(handle))
}

/// ## Summary
/// Installs the global subscriber at [`BOOTSTRAP_FILTER`] and returns the
/// handle used to apply the configured level.
///
/// ## Side Effects
/// Sets the process-wide default subscriber; panics if one is already set.
#[must_use]
pub fn init() -> LogLevelHandle {
    let (subscriber, handle) = subscriber();
    subscriber.init();
    handle
}
