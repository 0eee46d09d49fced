//! @acp:module "Logging"
//! @acp:summary "Tracing subscriber setup for the CLI"
//! @acp:domain cli
//! @acp:layer utility

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "QPGEN_LOG";

/// Initialize the tracing subscriber.
///
/// Respects `QPGEN_LOG` when set. Otherwise logs at `warn`, or `debug`
/// with `--verbose`. Output goes to stderr so rendered papers on stdout
/// stay clean.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // try_init so repeated calls (tests, embedding) are harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "qpgen=debug"
    } else {
        "warn"
    }
}
