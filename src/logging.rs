use tracing_subscriber::EnvFilter;

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "CHROMASPLIT_LOG";

/// `--debug` turns on this crate's spans and events only; dependencies stay at warn.
fn debug_filter() -> EnvFilter {
    EnvFilter::new(format!("warn,{}=debug", env!("CARGO_CRATE_NAME")))
}

fn build_filter(enable_debug: bool) -> EnvFilter {
    if enable_debug {
        return debug_filter();
    }
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the stderr subscriber for the CLI. Stdout carries only the written paths.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(enable_debug: bool) {
    // image_loader reports through `log`
    let _ = tracing_log::LogTracer::init();

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(enable_debug))
        .with_target(enable_debug)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_filter_targets_this_crate() {
        let filter = build_filter(true).to_string();
        assert!(filter.contains("chromasplit=debug"), "{filter}");
        assert!(filter.contains("warn"), "{filter}");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing(false);
        init_tracing(true);
        tracing::debug!("still alive");
    }
}
