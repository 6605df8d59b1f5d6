use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{self as fmt_layer, FmtContext, FormatEvent};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

/// Line layout of the two log sinks.
#[derive(Debug, Clone, Copy)]
pub enum LineStyle {
    /// `<timestamp> [LEVEL] message`, for the log file.
    Plain,
    /// Coloured status symbol followed by the message, for the console.
    Symbols,
}

pub struct TadiscFormatter {
    style: LineStyle,
}

impl TadiscFormatter {
    pub fn new(style: LineStyle) -> Self {
        Self { style }
    }
}

impl<S, N> FormatEvent<S, N> for TadiscFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let level: Level = *event.metadata().level();

        match self.style {
            LineStyle::Plain => {
                SystemTime.format_time(&mut writer)?;
                write!(writer, " [{level}] ")?;
            }
            LineStyle::Symbols => {
                let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = match level {
                    Level::TRACE => ("[ ]", |s| s.dimmed()),
                    Level::DEBUG => ("[?]", |s| s.blue()),
                    Level::INFO => ("[+]", |s| s.green().bold()),
                    Level::WARN => ("[*]", |s| s.yellow().bold()),
                    Level::ERROR => ("[-]", |s| s.red().bold()),
                };
                write!(writer, "{} ", color_func(symbol.into()))?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Installs the global subscriber.
///
/// The log file is truncated and receives everything from DEBUG up. With
/// `verbose`, the same events go to stderr, filtered by `RUST_LOG`.
pub fn init_logging(log_file: &Path, verbose: bool) -> anyhow::Result<()> {
    let file: File = File::create(log_file)
        .with_context(|| format!("failed to create log file {}", log_file.display()))?;

    let file_layer = fmt_layer::layer()
        .event_format(TadiscFormatter::new(LineStyle::Plain))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_filter(LevelFilter::DEBUG);

    let console_layer = verbose.then(|| {
        let filter: EnvFilter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        fmt_layer::layer()
            .event_format(TadiscFormatter::new(LineStyle::Symbols))
            .with_writer(std::io::stderr)
            .with_filter(filter)
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("failed to install log subscriber")?;

    Ok(())
}
