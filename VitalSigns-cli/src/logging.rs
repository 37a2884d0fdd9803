use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when neither `-v` nor `RUST_LOG` is given
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Filter directive for a `-v` count
///
/// Returns `None` without `-v`, so `RUST_LOG` decides.
pub fn verbosity_filter(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Install the global subscriber
///
/// Logs go to stderr so they never interleave with console output.
/// A second call is a no-op.
pub fn init_tracing(verbosity: u8) {
    let env_filter = match verbosity_filter(verbosity) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .try_init();
}
