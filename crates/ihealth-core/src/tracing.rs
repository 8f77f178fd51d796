use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter applied when `RUST_LOG` is unset. sea-orm logs every statement at
/// info, which drowns out the service's own events.
const DEFAULT_FILTER: &str = "info,sea_orm=warn,sqlx=warn";

/// Initialize JSON tracing to stdout. Call once at service startup; repeated
/// calls are ignored so tests can share a process.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .try_init();
}
