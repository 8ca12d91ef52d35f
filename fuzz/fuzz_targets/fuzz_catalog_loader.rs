#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    if let Ok(cfg) = overload_config::load_toml(data) {
        if cfg.validate().is_ok() {
            // a validated catalog always converts
            let catalog = overload_core::Catalog::try_from(&cfg);
            assert!(catalog.is_ok(), "validated catalog failed to convert: {catalog:?}");
        }
    }
});
