use super::{DirectoryEntry, DirectoryPage, DirectoryProvider};
use crate::{errors::PromptError, types::EntityKind};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Debug;
use tracing::debug;

// --- GraphQL documents, one per entity kind ---

const STAGES_QUERY: &str = "query DirectoryStages { getCompanyStages { id name } }";
const JOB_LISTINGS_QUERY: &str = "query DirectoryJobListings { getCompanyJobListings { id name } }";
const TAGS_QUERY: &str = "query DirectoryTags { getCompanyTags { id name } }";
const SKILLS_QUERY: &str = "query DirectorySkills { getSkills { id name } }";
const REJECTED_REASONS_QUERY: &str =
    "query DirectoryRejectedReasons { getCompanyRejectedReasons { id name } }";
const UNIVERSITIES_QUERY: &str = "query DirectoryUniversities($page: Int!, $pageSize: Int) { getUniversities(page: $page, pageSize: $pageSize) { universities { id name } pages } }";

/// The GraphQL document and the root field holding the result for a kind.
fn document_for(kind: EntityKind) -> (&'static str, &'static str) {
    match kind {
        EntityKind::Stage => (STAGES_QUERY, "getCompanyStages"),
        EntityKind::JobListing => (JOB_LISTINGS_QUERY, "getCompanyJobListings"),
        EntityKind::Tag => (TAGS_QUERY, "getCompanyTags"),
        EntityKind::Skill => (SKILLS_QUERY, "getSkills"),
        EntityKind::RejectedReason => (REJECTED_REASONS_QUERY, "getCompanyRejectedReasons"),
        EntityKind::University => (UNIVERSITIES_QUERY, "getUniversities"),
    }
}

// --- GraphQL request and response structures ---

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize, Debug)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Deserialize, Debug)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize, Debug)]
struct PaginatedEntries {
    #[serde(alias = "items")]
    universities: Vec<DirectoryEntry>,
    #[serde(default = "default_pages")]
    pages: u32,
}

fn default_pages() -> u32 {
    1
}

// --- GraphQL Directory Provider implementation ---

/// A provider that reads the directory from the backend's GraphQL API.
#[derive(Clone, Debug)]
pub struct GraphqlDirectoryProvider {
    client: ReqwestClient,
    api_url: String,
    api_token: Option<String>,
}

impl GraphqlDirectoryProvider {
    /// Creates a new `GraphqlDirectoryProvider`.
    pub fn new(api_url: String, api_token: Option<String>) -> Result<Self, PromptError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(PromptError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_token,
        })
    }
}

/// Reads the entries for `field` out of a GraphQL `data` object.
///
/// Unpaginated fields hold a bare list; paginated ones hold `{universities, pages}`.
fn parse_page(data: &Value, field: &str) -> Result<DirectoryPage, PromptError> {
    let node = data.get(field).ok_or_else(|| {
        PromptError::DirectoryDeserialization(format!("response is missing field '{field}'"))
    })?;

    if node.is_array() {
        let entries: Vec<DirectoryEntry> = serde_json::from_value(node.clone())
            .map_err(|e| PromptError::DirectoryDeserialization(format!("{field}: {e}")))?;
        return Ok(DirectoryPage { entries, pages: 1 });
    }

    let paginated: PaginatedEntries = serde_json::from_value(node.clone())
        .map_err(|e| PromptError::DirectoryDeserialization(format!("{field}: {e}")))?;
    Ok(DirectoryPage {
        entries: paginated.universities,
        pages: paginated.pages,
    })
}

#[async_trait]
impl DirectoryProvider for GraphqlDirectoryProvider {
    async fn fetch_page(
        &self,
        kind: EntityKind,
        page: u32,
        page_size: u32,
    ) -> Result<DirectoryPage, PromptError> {
        let (query, field) = document_for(kind);
        let variables = match kind {
            EntityKind::University => json!({ "page": page, "pageSize": page_size }),
            _ => json!({}),
        };

        debug!("--> Directory request for {kind} (page {page})");

        let mut request_builder = self
            .client
            .post(&self.api_url)
            .json(&GraphqlRequest { query, variables });
        if let Some(token) = &self.api_token {
            request_builder = request_builder.bearer_auth(token);
        }

        let response = request_builder
            .send()
            .await
            .map_err(PromptError::DirectoryRequest)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PromptError::DirectoryApi(format!("{status}: {error_text}")));
        }

        let body: GraphqlResponse = response
            .json()
            .await
            .map_err(|e| PromptError::DirectoryDeserialization(e.to_string()))?;

        if let Some(errors) = body.errors.filter(|errors| !errors.is_empty()) {
            let messages = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(PromptError::DirectoryApi(messages));
        }

        let data = body.data.ok_or_else(|| {
            PromptError::DirectoryDeserialization("response has no data".to_string())
        })?;
        parse_page(&data, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unpaginated_list() {
        let data = json!({ "getCompanyTags": [{ "id": "t1", "name": "Remote" }] });
        let page = parse_page(&data, "getCompanyTags").unwrap();
        assert_eq!(page.pages, 1);
        assert_eq!(page.entries[0].name, "Remote");
    }

    #[test]
    fn test_parse_paginated_object() {
        let data = json!({
            "getUniversities": {
                "universities": [{ "id": "u1", "name": "Marmara University" }],
                "pages": 3
            }
        });
        let page = parse_page(&data, "getUniversities").unwrap();
        assert_eq!(page.pages, 3);
        assert_eq!(page.entries[0].id, "u1");
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let data = json!({ "somethingElse": [] });
        assert!(matches!(
            parse_page(&data, "getSkills"),
            Err(PromptError::DirectoryDeserialization(_))
        ));
    }
}
