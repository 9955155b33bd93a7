/*!
 * Structured Tracing
 * Subscriber setup and scope spans using the tracing crate
 *
 * Features:
 * - Environment-driven filter and output format
 * - JSON-formatted logs for structured parsing
 * - Named spans around guarded scopes with duration reporting
 */

use std::time::Instant;
use tracing::{debug, info, span, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Environment variable selecting JSON output
pub const TRACE_JSON_ENV: &str = "SCOPE_EXIT_TRACE_JSON";

/// Tracing configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Filter directive used when RUST_LOG is unset
    pub default_filter: String,
    /// Emit JSON lines instead of compact text
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            json: false,
        }
    }
}

impl TracingConfig {
    /// Read configuration from the environment
    ///
    /// Environment variables:
    /// - RUST_LOG: Set log level (default: info)
    /// - SCOPE_EXIT_TRACE_JSON: Enable JSON output (default: false)
    pub fn from_env() -> Self {
        let json = std::env::var(TRACE_JSON_ENV)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Self {
            json,
            ..Self::default()
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Initialize structured tracing from the environment
pub fn init_tracing() {
    init_tracing_with(TracingConfig::from_env());
}

/// Initialize structured tracing with an explicit configuration
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing_with(config: TracingConfig) {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let installed = if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        info!(json = config.json, "Structured tracing initialized");
    }
}

/// Span covering a guarded scope
///
/// Reports the scope duration when dropped.
pub struct ScopeSpan {
    span: tracing::Span,
    start: Instant,
    name: &'static str,
}

impl ScopeSpan {
    pub fn new(name: &'static str) -> Self {
        let span = span!(
            Level::DEBUG,
            "scope",
            scope = name,
            duration_us = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            name,
        }
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for ScopeSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", duration.as_micros() as u64);
        let _entered = self.span.enter();
        debug!(
            scope = self.name,
            duration_us = duration.as_micros() as u64,
            "scope completed"
        );
    }
}

/// Create a span around a guarded scope
pub fn span_scope(name: &'static str) -> ScopeSpan {
    ScopeSpan::new(name)
}
