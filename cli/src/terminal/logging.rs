use std::fmt;

use colored::*;
use oucount_common::log::{PRINT_TARGET, SUCCESS_TARGET};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

/// Installs the global subscriber.
///
/// Lines sent through [`crate::terminal::print`] go to stdout untouched;
/// every other event goes to stderr with a status symbol. Both writers are
/// routed through the progress-bar layer so bars never tear the output.
pub fn init_logging(verbose: u8, quiet: u8) {
    let indicatif_layer = IndicatifLayer::new();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, quiet)));

    let print_layer = tracing_subscriber::fmt::layer()
        .event_format(OucountFormatter)
        .with_writer(indicatif_layer.get_stdout_writer())
        .with_filter(filter_fn(|meta| meta.target() == PRINT_TARGET));

    let status_layer = tracing_subscriber::fmt::layer()
        .event_format(OucountFormatter)
        .with_writer(indicatif_layer.get_stderr_writer())
        .with_filter(filter_fn(|meta| meta.target() != PRINT_TARGET));

    tracing_subscriber::registry()
        .with(filter)
        .with(print_layer)
        .with(status_layer)
        .with(indicatif_layer)
        .init();
}

/// The print and success channels stay at `info` even when `-qq` mutes
/// status lines, so a run always confirms where its report went.
fn default_directives(verbose: u8, quiet: u8) -> String {
    let level = match (verbose, quiet) {
        (0, q) if q >= 2 => "warn",
        (0, _) => "info",
        (1, _) => "debug",
        _ => "trace",
    };
    format!("{level},{PRINT_TARGET}=info,{SUCCESS_TARGET}=info")
}

pub struct OucountFormatter;

impl<S, N> FormatEvent<S, N> for OucountFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        if meta.target() == PRINT_TARGET {
            let mut raw = RawMessage::default();
            event.record(&mut raw);
            return writeln!(writer, "{}", raw.0.unwrap_or_default());
        }

        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = match *meta.level() {
            Level::TRACE => ("[ ]", |s| s.dimmed()),
            Level::DEBUG => ("[?]", |s| s.blue()),
            Level::INFO if meta.target() == SUCCESS_TARGET => ("[+]", |s| s.green().bold()),
            Level::INFO => ("[~]", |s| s.cyan()),
            Level::WARN => ("[*]", |s| s.yellow().bold()),
            Level::ERROR => ("[-]", |s| s.red().bold()),
        };

        write!(writer, "{} ", color_func(symbol.into()))?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

#[derive(Default)]
struct RawMessage(Option<String>);

impl Visit for RawMessage {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "raw_msg" {
            self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "raw_msg" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}
