#![allow(dead_code)]

//! Common test utilities shared across integration tests

use std::sync::Once;

use probescope_ast::{AttachPoint, Location};

static INIT: Once = Once::new();

/// Initialize logging for tests (call once per test)
pub fn init() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
            )
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn loc(line: u32, column: u32) -> Location {
    Location::on_line(line, column, 1)
}

/// Attach point as the attach-point parser would produce it for
/// `provider:func`.
pub fn attach_point(provider: &str, func: &str) -> AttachPoint {
    let mut ap = AttachPoint::new(format!("{}:{}", provider, func), loc(1, 1));
    ap.provider = provider.to_string();
    ap.func = func.to_string();
    ap.need_expansion = func.contains('*') || func.contains('?');
    ap
}
