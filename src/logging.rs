//! Logger setup for the browser build and for native binaries/tests.

/// Installs the logger. Safe to call more than once; later calls are ignored.
///
/// On `wasm32` logs go to the browser console (and panics too, with the
/// `console_error_panic_hook` feature). Elsewhere `env_logger` is used with an `info`
/// default that `RUST_LOG` overrides.
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Debug).is_err() {
            log::debug!("Logger already initialized");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        if env_logger::builder()
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .try_init()
            .is_err()
        {
            log::debug!("Logger already initialized");
        }
    }
}
