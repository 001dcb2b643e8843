#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared setup for the integration tests: tracing and a client wired to the
//! deterministic fakes from `talentfilter-test-utils`.

use std::sync::Once;
use std::time::Duration;
use talentfilter::{FilterClient, FilterClientBuilder};
use talentfilter_test_utils::{MockAiProvider, MockDirectoryProvider};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber once per test binary.
pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// The model's answer for "Find all applicants in hired stage".
pub const HIRED_STAGE_RESPONSE: &str = r#"{"filterParameters":[{"logicalOperator":"AND","name":"stage","operator":"equals","filterVariable":"Hired"}],"query":"","isFavoriteApplicant":false,"jobListingId":null}"#;

/// Builds a client over the given fakes with a one-hour directory TTL.
pub fn build_client(ai: &MockAiProvider, directory: &MockDirectoryProvider) -> FilterClient {
    FilterClientBuilder::new()
        .ai_provider(Box::new(ai.clone()))
        .directory_provider(Box::new(directory.clone()))
        .directory_ttl(Duration::from_secs(3600))
        .build()
        .expect("client should build with an AI provider")
}
