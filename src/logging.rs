use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

/// Logs go to stderr; stdout is reserved for the listing. `RUST_LOG` wins over `-v`.
pub fn init(verbose: u8, ansi: bool) -> Result<(), String> {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for_verbosity(verbose).into())
        .from_env_lossy();

    let stderr_layer = fmt::layer()
        .with_ansi(ansi)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .try_init()
        .map_err(|e| format!("failed to initialize logging: {e}"))?;

    debug!(verbose, "logging initialized");
    Ok(())
}

#[cfg(test)]
pub fn init_for_tests() {
    use std::sync::Once;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::from_default_env().add_directive(LevelFilter::DEBUG.into());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
