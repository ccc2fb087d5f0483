use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Maps the number of `-v` flags to the level applied to this crate.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// `RUST_LOG` wins when set. Otherwise only this crate logs, at the
/// level picked by `verbosity`.
fn build_filter(verbosity: u8, directives: Option<&str>) -> Result<EnvFilter> {
    let builder = EnvFilter::builder().with_default_directive(LevelFilter::OFF.into());
    match directives.map(str::trim) {
        Some(directives) if !directives.is_empty() => builder
            .parse(directives)
            .with_context(|| format!("Invalid {} value: {}", EnvFilter::DEFAULT_ENV, directives)),
        _ => builder
            .parse(format!("fxdash={}", level_for(verbosity)))
            .context("Invalid log level"),
    }
}

/// Installs the global subscriber, writing to stderr so rendered output
/// on stdout stays clean.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(verbosity, env.as_deref())?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .without_time()
                .with_target(verbosity > 1)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("Failed to install log subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0), LevelFilter::ERROR);
        assert_eq!(level_for(1), LevelFilter::INFO);
        assert_eq!(level_for(2), LevelFilter::DEBUG);
        assert_eq!(level_for(7), LevelFilter::TRACE);
    }

    #[test]
    fn test_filter_scopes_crate_level() {
        let filter = build_filter(2, None).unwrap().to_string().to_lowercase();
        assert!(filter.contains("fxdash=debug"), "{filter}");

        let filter = build_filter(0, Some("  ")).unwrap().to_string().to_lowercase();
        assert!(filter.contains("fxdash=error"), "{filter}");
    }

    #[test]
    fn test_env_directives_override_verbosity() {
        let filter = build_filter(3, Some("reqwest=info")).unwrap().to_string();
        assert!(filter.contains("reqwest=info"), "{filter}");
        assert!(!filter.contains("fxdash"), "{filter}");

        let err = build_filter(0, Some("fxdash=loud")).unwrap_err();
        assert!(err.to_string().starts_with("Invalid RUST_LOG value"));
    }
}
