//! # `talentfilter` CLI Integration Tests

use anyhow::Result;
use assert_cmd::Command;
use httpmock::{Method::POST, MockServer};
use predicates::prelude::*;
use serde_json::json;
use std::fs::File;
use std::io::Write;
use tempfile::tempdir;

const SALARY_FILTER: &str = r#"{
  "filterParameters": [
    { "logicalOperator": "AND", "name": "country", "operator": "equals", "filterVariable": "Germany" },
    { "logicalOperator": "AND", "name": "salary", "operator": "gte", "filterVariable": "2000",
      "salaryCurr": "EUR", "salaryPeriod": "MONTHLY" }
  ],
  "query": "",
  "isFavoriteApplicant": false,
  "jobListingId": null
}"#;

/// The binary with every configuration variable cleared.
fn talentfilter() -> Command {
    let mut cmd = Command::cargo_bin("talentfilter").expect("binary should be built");
    for var in [
        "AI_PROVIDER",
        "AI_API_KEY",
        "AI_API_URL",
        "AI_MODEL",
        "DIRECTORY_API_URL",
        "DIRECTORY_API_TOKEN",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_explain_from_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("filter.json");
    File::create(&path)?.write_all(SALARY_FILTER.as_bytes())?;

    talentfilter()
        .arg("explain")
        .arg("--file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Finding candidates from Germany AND with salary at least 2000 EUR/monthly",
        ));
    Ok(())
}

#[test]
fn test_explain_from_stdin() {
    talentfilter()
        .arg("explain")
        .write_stdin(r#"{"filterParameters": [], "query": ""}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("No filter applied"));
}

#[test]
fn test_explain_favorites_only_from_stdin() {
    talentfilter()
        .arg("explain")
        .write_stdin(r#"{"filterParameters": [], "query": "", "isFavoriteApplicant": true}"#)
        .assert()
        .success()
        .stdout(predicate::str::diff("Finding favorite candidates\n"));
}

#[test]
fn test_explain_rejects_malformed_json() {
    talentfilter()
        .arg("explain")
        .write_stdin("not a filter")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse filter JSON"));
}

#[test]
fn test_translate_without_gemini_key_fails() {
    talentfilter()
        .args(["translate", "candidates in Germany", "--provider", "gemini"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[talentfilter error]"));
}

#[test]
fn test_translate_with_local_provider() {
    let server = MockServer::start();
    let model = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({
            "choices": [{ "message": { "role": "assistant", "content":
                "Here you go:\n```json\n{\"filterParameters\":[{\"logicalOperator\":\"AND\",\"name\":\"country\",\"operator\":\"equals\",\"filterVariable\":\"germany\"}],\"query\":\"\"}\n```"
            } }]
        }));
    });

    talentfilter()
        .args(["translate", "candidates in germany", "--provider", "local"])
        .arg("--api-url")
        .arg(server.url("/v1/chat/completions"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"filterVariable\": \"Germany\""))
        .stdout(predicate::str::contains("Finding candidates from Germany"));

    model.assert();
}

#[test]
fn test_translate_reports_model_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(503).body("unavailable");
    });

    talentfilter()
        .args(["translate", "anyone", "--provider", "local"])
        .arg("--api-url")
        .arg(server.url("/v1/chat/completions"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to translate prompt"));
}
