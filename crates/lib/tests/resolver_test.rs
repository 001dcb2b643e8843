//! # Resolver Tests
//!
//! Tests `FilterResolver::resolve` on whole raw filters: demotion of unresolved
//! entities into the free-text query, parameter order, and field cleanup.

mod common;

use crate::common::setup_tracing;
use std::time::Duration;
use talentfilter::{
    directory::DirectoryLookup,
    resolver::FilterResolver,
    types::{EntityKind, RawQueryFilter},
    FilterField, FilterOperator, LogicalOperator,
};
use talentfilter_test_utils::MockDirectoryProvider;

fn resolver(provider: MockDirectoryProvider) -> FilterResolver {
    FilterResolver::new(DirectoryLookup::new(
        Box::new(provider),
        Duration::from_secs(3600),
        5,
        100,
    ))
}

fn raw(json: &str) -> RawQueryFilter {
    serde_json::from_str(json).expect("test JSON should parse")
}

#[tokio::test]
async fn test_unresolved_stage_moves_to_query() {
    setup_tracing();
    let resolver = resolver(MockDirectoryProvider::new());

    let filter = resolver
        .resolve(raw(
            r#"{"filterParameters":[{"name":"stage","operator":"equals","filterVariable":"Nonexistent Stage"}],"query":""}"#,
        ))
        .await;

    assert!(filter.filter_parameters.is_empty());
    assert_eq!(filter.query, "Nonexistent Stage");
}

#[tokio::test]
async fn test_demoted_terms_append_to_existing_query_in_order() {
    setup_tracing();
    let provider = MockDirectoryProvider::new().with_entry(EntityKind::Skill, "k1", "Rust");
    let resolver = resolver(provider);

    let filter = resolver
        .resolve(raw(
            r#"{"filterParameters":[
                {"name":"tag","filterVariable":"Night Owl"},
                {"name":"skill","filterVariable":"rust"},
                {"name":"university","filterVariable":"Unknown U"}
            ],"query":"backend"}"#,
        ))
        .await;

    assert_eq!(filter.query, "backend Night Owl Unknown U");
    assert_eq!(filter.filter_parameters.len(), 1);
    assert_eq!(filter.filter_parameters[0].name, FilterField::Skill);
    assert_eq!(filter.filter_parameters[0].filter_variable, "k1");
}

#[tokio::test]
async fn test_salary_normalization_and_defaults() {
    setup_tracing();
    let resolver = resolver(MockDirectoryProvider::new());

    let filter = resolver
        .resolve(raw(
            r#"{"filterParameters":[{"name":"salary","operator":"gte","filterVariable":"2.000,50"}]}"#,
        ))
        .await;

    let param = &filter.filter_parameters[0];
    assert_eq!(param.filter_variable, "2.000.50");
    assert_eq!(param.salary_curr.as_deref(), Some("EUR"));
    assert_eq!(param.salary_period.as_deref(), Some("MONTHLY"));
}

#[tokio::test]
async fn test_mixed_filter_keeps_order_and_operators() {
    setup_tracing();
    let provider = MockDirectoryProvider::new()
        .with_entry(EntityKind::JobListing, "job-9", "Backend Engineer")
        .with_entry(EntityKind::University, "uni-7", "Marmara University");
    let resolver = resolver(provider);

    let filter = resolver
        .resolve(raw(
            r#"{"filterParameters":[
                {"logicalOperator":"AND","name":"Job Title","operator":"gte","filterVariable":"backend engineer"},
                {"logicalOperator":"or","name":"school","operator":"contains","filterVariable":"Marmara University"},
                {"logicalOperator":"AND","name":"experience","operator":"between","filterVariable":"2 years","filterVariable2":5},
                {"logicalOperator":"AND","name":"gender","operator":"is","filterVariable":"F"}
            ],"query":null,"isFavoriteApplicant":"true"}"#,
        ))
        .await;

    assert!(filter.is_favorite_applicant);
    assert_eq!(filter.query, "");
    let params = &filter.filter_parameters;
    assert_eq!(params.len(), 4);

    assert_eq!(params[0].name, FilterField::JobTitle);
    assert_eq!(params[0].filter_variable, "job-9");
    assert_eq!(params[0].operator, FilterOperator::Equals);

    assert_eq!(params[1].name, FilterField::University);
    assert_eq!(params[1].logical_operator, LogicalOperator::Or);
    assert_eq!(params[1].operator, FilterOperator::Contains);
    assert_eq!(params[1].filter_variable, "uni-7");

    assert_eq!(params[2].name, FilterField::Experience);
    assert_eq!(params[2].operator, FilterOperator::Between);
    assert_eq!(params[2].filter_variable, "2");
    assert_eq!(params[2].filter_variable2.as_deref(), Some("5"));

    assert_eq!(params[3].filter_variable, "Female");
    assert_eq!(params[3].operator, FilterOperator::Equals);
}

#[tokio::test]
async fn test_missing_parameter_list_yields_query_only_filter() {
    setup_tracing();
    let provider = MockDirectoryProvider::new();
    let resolver = resolver(provider.clone());

    let filter = resolver
        .resolve(raw(r#"{"query":"  rust developers  "}"#))
        .await;

    assert!(filter.filter_parameters.is_empty());
    assert_eq!(filter.query, "rust developers");
    assert!(provider.requests().is_empty());
}
