use tracing_subscriber::EnvFilter;

/// Initialise logging for hosts that don't install their own subscriber.
///
/// With `debug` the render loop's per-frame diagnostics (skipped frames,
/// resize and layout failures, all logged under this crate's target) are
/// enabled and `RUST_LOG` may override the directives; otherwise the filter
/// is pinned to `info` so a stray environment variable cannot make the
/// render thread chatty. Safe to call more than once; later calls lose to
/// whichever subscriber registered first.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,d2d_overlay=debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init(true);
        init(false);
        init(true);
    }
}
