//! Global subscriber: tagged console output plus a plain-text run log.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use super::types::{DRY_RUN_TARGET, NOTICE_TARGET, STAGE_TARGET, SUCCESS_TARGET};
use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// Kind of line an event renders as, derived from its level and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Stage,
    Info,
    Success,
    DryRun,
    Notice,
    Debug,
    Warn,
    Error,
}

impl LineKind {
    fn of(event: &tracing::Event<'_>) -> Self {
        let metadata = event.metadata();
        match (*metadata.level(), metadata.target()) {
            (tracing::Level::ERROR, _) => Self::Error,
            (tracing::Level::WARN, _) => Self::Warn,
            (tracing::Level::INFO, STAGE_TARGET) => Self::Stage,
            (tracing::Level::INFO, SUCCESS_TARGET) => Self::Success,
            (tracing::Level::INFO, DRY_RUN_TARGET) => Self::DryRun,
            (tracing::Level::INFO, _) => Self::Info,
            (_, NOTICE_TARGET) => Self::Notice,
            _ => Self::Debug,
        }
    }
}

fn message_of(event: &tracing::Event<'_>) -> String {
    let mut extractor = MessageExtractor::default();
    event.record(&mut extractor);
    extractor.message
}

/// Layer writing every event at `DEBUG` and above to the run log, one
/// timestamped line each, whatever the console verbosity.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open the log file for `command` under the cache directory.
    ///
    /// `None` when no cache directory is available.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::create(&log_file_path(command)?)
    }

    /// Truncate `path`, write a run header, and return a layer appending to it.
    pub(super) fn create(path: &Path) -> Option<Self> {
        let version = crate::VERSION;
        let header = format!(
            "==========================================\n\
             libdist {version} {}\n\
             ==========================================\n",
            format_utc_datetime(),
        );
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let msg = strip_ansi(&message_of(event));
        let ts = format_utc_time();

        let line = match LineKind::of(event) {
            LineKind::Stage => format!("[{ts}] ==> {msg}"),
            LineKind::Info => format!("[{ts}]     [i] {msg}"),
            LineKind::Success => format!("[{ts}]     [>] {msg}"),
            LineKind::DryRun => format!("[{ts}]     [>] [dry run] {msg}"),
            LineKind::Notice | LineKind::Warn | LineKind::Error => {
                format!("[{ts}]     [!] {msg}")
            }
            LineKind::Debug => format!("[{ts}]     [debug] {msg}"),
        };

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that renders the `[i]`, `[>]`
/// and `[!]` console tags.
struct LibdistFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for LibdistFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let msg = message_of(event);

        match LineKind::of(event) {
            LineKind::Error => writeln!(writer, "\x1b[31m[!]\x1b[0m {msg}"),
            LineKind::Warn | LineKind::Notice => writeln!(writer, "\x1b[33m[!]\x1b[0m {msg}"),
            LineKind::Stage => writeln!(writer, "\x1b[1m[i] {msg}\x1b[0m"),
            LineKind::Success => writeln!(writer, "\x1b[32m[>]\x1b[0m {msg}"),
            LineKind::DryRun => writeln!(writer, "\x1b[33m[>] [dry run]\x1b[0m {msg}"),
            LineKind::Info => writeln!(writer, "[i] {msg}"),
            LineKind::Debug => writeln!(writer, "\x1b[2m[i] {msg}\x1b[0m"),
        }
    }
}

/// Console filter: `DEBUG` when verbose, `INFO` otherwise. Non-empty
/// `RUST_LOG`-style `directives` take over from the verbosity level.
fn console_filter(verbose: bool, directives: Option<&str>) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::filter::LevelFilter;

    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives.unwrap_or_default())
}

/// Tagged console layer writing through `make_writer`.
fn console_layer<W>(
    filter: tracing_subscriber::EnvFilter,
    make_writer: W,
) -> impl tracing_subscriber::Layer<tracing_subscriber::Registry>
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::Layer as _;

    tracing_subscriber::fmt::layer()
        .event_format(LibdistFormatter)
        .with_writer(make_writer)
        .with_filter(filter)
}

/// Initialise the global [`tracing`] subscriber.
///
/// Warnings and errors go to stderr, everything else the console filter lets
/// through goes to stdout. `RUST_LOG` overrides the console level. Every event
/// at `DEBUG` and above is also written to
/// `$XDG_CACHE_HOME/libdist/<command>.log`.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let directives = std::env::var("RUST_LOG").ok();
    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer(
            console_filter(verbose, directives.as_deref()),
            make_writer,
        ))
        .with(file_layer)
        .init();
}
