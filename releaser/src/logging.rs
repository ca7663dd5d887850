//! Log output for the command-line binary.
//!
//! The library logs through the [`log`] facade. The binary installs a
//! `tracing-subscriber` registry whose `fmt` layer renders every event, bridged
//! `log` records included, as a single `[npm-binary-releaser]: <message>` line
//! on stderr.

use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Prefix written before every log line.
pub const LOG_PREFIX: &str = "[npm-binary-releaser]: ";

/// Event formatter writing only the event's message after [`LOG_PREFIX`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixedLine;

impl<S, N> FormatEvent<S, N> for PrefixedLine
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut message = MessageVisitor::default();
        event.record(&mut message);
        writeln!(writer, "{LOG_PREFIX}{}", message.0)
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.0);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// Map the command-line verbosity flags to a level filter.
///
/// # Examples
///
/// ```
/// use npm_binary_releaser::logging::level_for;
/// use tracing_subscriber::filter::LevelFilter;
///
/// assert_eq!(level_for(0, false), LevelFilter::INFO);
/// assert_eq!(level_for(1, false), LevelFilter::DEBUG);
/// assert_eq!(level_for(0, true), LevelFilter::WARN);
/// ```
#[must_use]
pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::WARN;
    }
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Build the subscriber used by the binary, writing lines to `make_writer`.
#[must_use]
pub fn subscriber<W>(level: LevelFilter, make_writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry().with(level).with(
        tracing_subscriber::fmt::layer()
            .event_format(PrefixedLine)
            .with_writer(make_writer),
    )
}

/// Install the stderr subscriber globally at `level`, bridging `log` records
/// into it.
///
/// # Errors
///
/// Returns [`TryInitError`] if a subscriber or logger is already installed.
pub fn init(level: LevelFilter) -> Result<(), TryInitError> {
    subscriber(level, std::io::stderr).try_init()
}
