//! Logging setup
//!
//! Browser builds log to the devtools console through `tracing-wasm`.
//! Native builds (unit tests) use the `tracing-subscriber` fmt layer.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install the global subscriber once; later calls are ignored
pub fn init(max_level: tracing::Level) {
    INIT.call_once(|| install(max_level));
}

#[cfg(target_arch = "wasm32")]
fn install(max_level: tracing::Level) {
    let config = tracing_wasm::WASMLayerConfigBuilder::new()
        .set_max_level(max_level)
        .build();
    tracing_wasm::set_as_global_default_with_config(config);
}

#[cfg(not(target_arch = "wasm32"))]
fn install(max_level: tracing::Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_test_writer()
        .try_init();
}
