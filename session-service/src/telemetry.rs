/// Tracing initialisation
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber, honouring `RUST_LOG` and
/// defaulting to `info`. Call once during startup.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}
