//! # Filter Endpoint Tests
//!
//! Exercises the filter, explanation and cache endpoints against the
//! call-recording fakes from `talentfilter-test-utils`.

mod common;

use crate::common::{TestApp, HIRED_STAGE_RESPONSE};
use serde_json::{json, Value};
use talentfilter::types::EntityKind;
use talentfilter_test_utils::{MockAiProvider, MockDirectoryProvider};

fn hired_directory() -> MockDirectoryProvider {
    MockDirectoryProvider::new().with_entry(EntityKind::Stage, "stage-id-123", "Hired")
}

#[tokio::test]
async fn test_explain_endpoint_uses_directory_names() -> anyhow::Result<()> {
    let ai = MockAiProvider::with_response(HIRED_STAGE_RESPONSE);
    let app = TestApp::spawn_with_mocks(&ai, &hired_directory()).await?;
    // Populate the directory cache.
    app.client.post(app.url("/directory/refresh")).send().await?;

    let body: Value = app
        .client
        .post(app.url("/filter/explain"))
        .json(&json!({
            "filter": {
                "filterParameters": [
                    { "logicalOperator": "AND", "name": "stage", "operator": "equals", "filterVariable": "stage-id-123" },
                    { "logicalOperator": "AND", "name": "salary", "operator": "gte", "filterVariable": "2000",
                      "salaryCurr": "EUR", "salaryPeriod": "MONTHLY" }
                ],
                "query": "",
                "isFavoriteApplicant": false,
                "jobListingId": null
            }
        }))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(
        body["result"]["text"],
        "Finding candidates in the Hired stage AND with salary at least 2000 EUR/monthly"
    );
    assert_eq!(ai.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_explain_endpoint_on_empty_filter() -> anyhow::Result<()> {
    let ai = MockAiProvider::new();
    let app = TestApp::spawn_with_mocks(&ai, &MockDirectoryProvider::new()).await?;

    let body: Value = app
        .client
        .post(app.url("/filter/explain"))
        .json(&json!({ "filter": { "filterParameters": [], "query": "" } }))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["result"]["text"], "No filter applied");
    Ok(())
}

#[tokio::test]
async fn test_clearing_cache_forces_new_model_call() -> anyhow::Result<()> {
    let ai = MockAiProvider::with_response(HIRED_STAGE_RESPONSE);
    let app = TestApp::spawn_with_mocks(&ai, &hired_directory()).await?;
    let request = json!({ "prompt": "hired candidates" });

    app.client.post(app.url("/filter")).json(&request).send().await?;
    app.client.post(app.url("/filter")).json(&request).send().await?;
    assert_eq!(ai.call_count(), 1);

    let cleared: Value = app
        .client
        .delete(app.url("/cache"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(cleared["result"]["cleared"], true);

    app.client.post(app.url("/filter")).json(&request).send().await?;
    assert_eq!(ai.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_unresolved_stage_is_demoted_over_http() -> anyhow::Result<()> {
    let ai = MockAiProvider::with_response(
        r#"{"filterParameters":[{"logicalOperator":"AND","name":"stage","operator":"equals","filterVariable":"Nonexistent Stage"}],"query":""}"#,
    );
    let app = TestApp::spawn_with_mocks(&ai, &hired_directory()).await?;

    let body: Value = app
        .client
        .post(app.url("/filter"))
        .json(&json!({ "prompt": "people in the nonexistent stage" }))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["result"]["filter"]["filterParameters"], json!([]));
    assert_eq!(body["result"]["filter"]["query"], "Nonexistent Stage");
    assert_eq!(
        body["result"]["explanation"],
        "Finding candidates matching \"Nonexistent Stage\""
    );
    Ok(())
}

#[tokio::test]
async fn test_directory_failure_keeps_serving() -> anyhow::Result<()> {
    let ai = MockAiProvider::with_response(HIRED_STAGE_RESPONSE);
    let directory = hired_directory();
    let app = TestApp::spawn_with_mocks(&ai, &directory).await?;

    let first: Value = app
        .client
        .post(app.url("/directory/refresh"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(first["result"]["counts"]["stage"], 1);

    directory.set_failing(true);
    let response = app.client.post(app.url("/directory/refresh")).send().await?;
    assert_eq!(response.status(), 200);
    let stale: Value = response.json().await?;
    assert_eq!(stale["result"]["counts"]["stage"], 1);
    Ok(())
}
