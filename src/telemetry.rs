//! Tracing setup.
//!
//! - LOG_LEVEL sets the filter, either a bare level ("debug") or full directives such as
//!   "info,learn=debug,quiz=debug,bridge=debug,tower_http=info".
//! - LOG_FORMAT picks "pretty" (default) or "json".
//!
//! Targets are printed so `learn`, `quiz`, `lesson` and `bridge` events stay distinguishable
//! from the per-request spans added by the TraceLayer.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str =
    "info,superlearn_backend=debug,learn=debug,quiz=debug,lesson=debug,bridge=info,tower_http=info,axum=info";

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}
