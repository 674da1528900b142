//! Structured logging bootstrap using `tracing`.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directive used when `RUST_LOG` is unset: our own spans at info, dependencies at warn.
pub const DEFAULT_DIRECTIVE: &str = "warn,consult_lens=info";

/// Install a global tracing subscriber. Logs go to stderr; stdout carries command output.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVE))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_level(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(fmt_layer).try_init()?;

    tracing::debug!(directive = DEFAULT_DIRECTIVE, "tracing initialised");
    Ok(())
}
