//! Tracing integration for the host binary.
//!
//! The binary owns the global subscriber; this module only provides a
//! library-scoped layer plus filter helpers so provider calls render with
//! timestamps, source location and span timings.

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::{Level, Metadata};
use tracing_subscriber::filter::{Directive, FilterFn};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Crate target prefix used to filter only library-originated logs.
pub const TARGET_PREFIX: &str = "ai_llm_service";

/// RFC3339 UTC timer, e.g. `2025-09-12T10:20:30Z`.
#[derive(Clone, Debug, Default)]
pub struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

/// Formatting layer that renders ONLY events emitted by this crate.
///
/// - RFC3339 UTC timestamps
/// - `file:line` and target
/// - span close events (latency of instrumented provider calls)
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(io::stdout().is_terminal())
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_this_crate())
}

/// Per-layer filter for events from this crate.
pub fn only_this_crate() -> FilterFn {
    FilterFn::new(library_event as fn(&Metadata<'_>) -> bool)
}

/// Per-layer filter for everything else, so the host's own fmt layer does
/// not print library events twice.
pub fn excluding_this_crate() -> FilterFn {
    FilterFn::new(foreign_event as fn(&Metadata<'_>) -> bool)
}

fn library_event(meta: &Metadata<'_>) -> bool {
    is_library_target(meta.target())
}

fn foreign_event(meta: &Metadata<'_>) -> bool {
    !is_library_target(meta.target())
}

fn is_library_target(target: &str) -> bool {
    target.starts_with(TARGET_PREFIX)
}

/// Level directive for **this** library only, e.g. `ai_llm_service=debug`.
pub fn level_directive(level: Level) -> Option<Directive> {
    let s = format!("{TARGET_PREFIX}={}", level.as_str().to_lowercase());
    Directive::from_str(&s).ok()
}

/// `EnvFilter` from `RUST_LOG` (or `default`), with a per-crate level for this library.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    match level_directive(level) {
        Some(d) => base.add_directive(d),
        None => base,
    }
}
