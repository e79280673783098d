//! Shared setup of the integration tests
#![allow(dead_code)]

use cfn_assert::template::Template;
use std::path::PathBuf;

pub const REGION: &str = "eu-central-1";

/// Installs a subscriber filtered by `CFN_ASSERT_LOG`, once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("CFN_ASSERT_LOG"))
        .with_test_writer()
        .try_init();
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Loads `tests/fixtures/<name>` as synthesized for [REGION]
pub fn fixture(name: &str) -> anyhow::Result<Template> {
    init_tracing();
    Ok(Template::load_file(&fixture_path(name))?.with_region(REGION))
}
