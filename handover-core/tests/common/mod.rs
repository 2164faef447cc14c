use handover_core::common_tests::StressConfig;
use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test writer, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[allow(dead_code)]
pub fn stress_config() -> StressConfig {
    StressConfig::from_env().expect("invalid HANDOVER_STRESS_* override")
}
