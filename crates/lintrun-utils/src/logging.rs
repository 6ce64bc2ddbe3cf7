//! Tracing setup for the lintrun binary
//!
//! Library crates only emit events through `tracing` macros; installing a
//! subscriber is left to the binary (or a test) via [`init_tracing`].

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "lintrun=debug,info"
    } else {
        "lintrun=info,warn"
    }
}

/// Colour only when stderr is a terminal and `NO_COLOR` is unset.
fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `verbose`. Output is compact and goes to
/// stderr so command output on stdout stays clean. Fails if a subscriber is
/// already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(use_color())
                .with_target(verbose)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_line_number(false)
                .with_file(false)
                .compact(),
        )
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_parse() {
        assert!(EnvFilter::try_new(default_filter(false)).is_ok());
        assert!(EnvFilter::try_new(default_filter(true)).is_ok());
        assert!(default_filter(true).contains("debug"));
    }

    #[test]
    fn test_second_init_fails() {
        // Whichever call comes first may win; the second must not panic.
        let _ = init_tracing(false);
        assert!(init_tracing(true).is_err());
    }
}
