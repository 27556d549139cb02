use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// Draft rooms log at info; the sql layers are noisy below warn.
const DEFAULT_FILTER: &str = "info,fml_backend=debug,actix_web=warn,sqlx=warn,sea_orm=warn";

/// JSON logs on stdout. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
