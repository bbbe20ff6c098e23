use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize diagnostic logging for the uikit CLI
///
/// Logs go to stderr so they never mix with command output. The level can be
/// controlled via the RUST_LOG environment variable:
/// - RUST_LOG=debug uikit add button  (verbose logging)
/// - RUST_LOG=error uikit add button  (errors only)
///
/// Without RUST_LOG only warnings are shown, or debug output with `--verbose`.
pub fn init(verbose: bool) -> Result<()> {
    let default_filter = if verbose {
        "uikit=debug,uikit_core=debug"
    } else {
        "uikit=warn,uikit_core=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
