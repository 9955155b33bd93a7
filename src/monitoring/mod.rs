/*!
 * Monitoring
 * Tracing setup for binaries and tests
 */

mod tracer;

pub use tracer::{
    init_tracing, init_tracing_with, span_scope, ScopeSpan, TracingConfig, TRACE_JSON_ENV,
};
