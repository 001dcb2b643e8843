//! # Filter Normalizer & Entity Resolver
//!
//! Turns the model's raw filter into the backend contract:
//!
//! - field names are classified into `FilterField` and operators into `FilterOperator`;
//! - entity references (stage, job title, tag, skill, university, rejection reason)
//!   are resolved to backend IDs through the directory cache, and demoted to the
//!   free-text `query` when they cannot be resolved;
//! - standard fields get their field-specific cleanup (salary, experience, gender,
//!   location).
//!
//! Resolution never fails. Every problem degrades to a passthrough or a demotion.

use crate::{
    constants::{DEFAULT_SALARY_CURRENCY, DEFAULT_SALARY_PERIOD},
    directory::{DirectoryCache, DirectoryLookup},
    normalize::{canonical_gender, clean_numeric, title_case},
    types::{
        FilterField, FilterOperator, FilterParameter, LogicalOperator, QueryFilter,
        RawFilterParameter, RawQueryFilter,
    },
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The outcome of normalizing one raw parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The parameter survives, canonicalized.
    Keep(FilterParameter),
    /// The parameter is dropped and its value joins the free-text query.
    Demote(String),
    /// The parameter carries nothing usable.
    Skip,
}

/// Normalizes raw filters and resolves entity names against the directory.
#[derive(Debug)]
pub struct FilterResolver {
    directory: DirectoryLookup,
}

impl FilterResolver {
    pub fn new(directory: DirectoryLookup) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &DirectoryLookup {
        &self.directory
    }

    /// Resolves a raw filter, preserving parameter order.
    ///
    /// The directory is only consulted when at least one parameter references an entity.
    pub async fn resolve(&self, raw: RawQueryFilter) -> QueryFilter {
        let raw_params = raw.filter_parameters.unwrap_or_default();

        let needs_directory = raw_params.iter().any(|param| {
            param
                .name
                .as_deref()
                .map(FilterField::classify)
                .and_then(|field| field.entity_kind())
                .is_some()
        });
        let directory = if needs_directory {
            self.directory.fetch().await
        } else {
            Arc::new(DirectoryCache::default())
        };

        let mut query_terms: Vec<String> = raw
            .query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .into_iter()
            .collect();
        let mut filter_parameters = Vec::with_capacity(raw_params.len());

        for raw_param in raw_params {
            match resolve_parameter(raw_param, &directory) {
                Resolution::Keep(param) => filter_parameters.push(param),
                Resolution::Demote(text) => query_terms.push(text),
                Resolution::Skip => {}
            }
        }

        QueryFilter {
            filter_parameters,
            query: query_terms.join(" "),
            is_favorite_applicant: raw.is_favorite_applicant,
            job_listing_id: None,
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Cleans a numeric value, falling back to the original text when nothing numeric remains.
fn numeric_or_passthrough(field: &FilterField, value: &str) -> String {
    let cleaned = clean_numeric(value);
    if cleaned.is_empty() {
        warn!("No numeric content in {field} value '{value}', passing through unchanged");
        value.to_string()
    } else {
        cleaned
    }
}

/// Normalizes one raw parameter against a directory snapshot.
pub fn resolve_parameter(raw: RawFilterParameter, directory: &DirectoryCache) -> Resolution {
    let value = trimmed(raw.filter_variable);

    let Some(name) = trimmed(raw.name) else {
        warn!("Filter parameter without a name");
        return value.map_or(Resolution::Skip, Resolution::Demote);
    };
    let field = FilterField::classify(&name);

    let logical_operator = raw
        .logical_operator
        .as_deref()
        .map(LogicalOperator::parse_lenient)
        .unwrap_or_default();

    let mut operator = match raw.operator.as_deref() {
        None => FilterOperator::Equals,
        Some(op) => FilterOperator::parse_lenient(op).unwrap_or_else(|| {
            warn!("Unknown operator '{op}' on {field}, using equals");
            FilterOperator::Equals
        }),
    };

    let Some(mut value) = value else {
        debug!("Skipping {field} parameter without a value");
        return Resolution::Skip;
    };
    let mut value2 = trimmed(raw.filter_variable2);

    if let Some(kind) = field.entity_kind() {
        return match directory.resolve_id(kind, &value) {
            Some(id) => {
                if !matches!(operator, FilterOperator::Equals | FilterOperator::Contains) {
                    operator = FilterOperator::Equals;
                }
                Resolution::Keep(FilterParameter {
                    logical_operator,
                    name: field,
                    operator,
                    filter_variable: id.to_string(),
                    filter_variable2: None,
                    salary_curr: None,
                    salary_period: None,
                })
            }
            None => {
                info!("Could not resolve {kind} '{value}', moving it to the free-text query");
                Resolution::Demote(value)
            }
        };
    }

    let mut salary_curr = None;
    let mut salary_period = None;

    match field {
        FilterField::Salary => {
            value = numeric_or_passthrough(&field, &value);
            value2 = value2.map(|v| numeric_or_passthrough(&field, &v));
            salary_curr = Some(
                trimmed(raw.salary_curr)
                    .map(|c| c.to_uppercase())
                    .unwrap_or_else(|| DEFAULT_SALARY_CURRENCY.to_string()),
            );
            salary_period = Some(
                trimmed(raw.salary_period)
                    .map(|p| p.to_uppercase())
                    .unwrap_or_else(|| DEFAULT_SALARY_PERIOD.to_string()),
            );
        }
        FilterField::Experience => {
            value = numeric_or_passthrough(&field, &value);
            value2 = value2.map(|v| numeric_or_passthrough(&field, &v));
        }
        FilterField::Gender => {
            value = canonical_gender(&value);
        }
        FilterField::Address | FilterField::Country => {
            value = title_case(&value);
        }
        _ => {}
    }

    // `between` needs both bounds; anything else carries only one.
    if operator == FilterOperator::Between {
        if value2.is_none() {
            warn!("{field} uses 'between' without a second bound, using gte");
            operator = FilterOperator::Gte;
        }
    } else {
        value2 = None;
    }

    Resolution::Keep(FilterParameter {
        logical_operator,
        name: field,
        operator,
        filter_variable: value,
        filter_variable2: value2,
        salary_curr,
        salary_period,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityKind;

    fn raw(name: &str, operator: &str, value: &str) -> RawFilterParameter {
        RawFilterParameter {
            logical_operator: Some("AND".to_string()),
            name: Some(name.to_string()),
            operator: Some(operator.to_string()),
            filter_variable: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn kept(resolution: Resolution) -> FilterParameter {
        match resolution {
            Resolution::Keep(param) => param,
            other => panic!("expected a kept parameter, got {other:?}"),
        }
    }

    #[test]
    fn test_salary_defaults_and_textual_cleanup() {
        let param = kept(resolve_parameter(
            raw("salary", "GTE", "2.000,50"),
            &DirectoryCache::default(),
        ));
        assert_eq!(param.filter_variable, "2.000.50");
        assert_eq!(param.operator, FilterOperator::Gte);
        assert_eq!(param.salary_curr.as_deref(), Some("EUR"));
        assert_eq!(param.salary_period.as_deref(), Some("MONTHLY"));
    }

    #[test]
    fn test_salary_currency_is_upper_cased() {
        let mut input = raw("salary", "between", "1000 $");
        input.filter_variable2 = Some("1500$".to_string());
        input.salary_curr = Some("usd".to_string());
        input.salary_period = Some("yearly".to_string());
        let param = kept(resolve_parameter(input, &DirectoryCache::default()));
        assert_eq!(param.filter_variable, "1000");
        assert_eq!(param.filter_variable2.as_deref(), Some("1500"));
        assert_eq!(param.salary_curr.as_deref(), Some("USD"));
        assert_eq!(param.salary_period.as_deref(), Some("YEARLY"));
    }

    #[test]
    fn test_between_without_second_bound_becomes_gte() {
        let param = kept(resolve_parameter(
            raw("experience", "between", "3 years"),
            &DirectoryCache::default(),
        ));
        assert_eq!(param.operator, FilterOperator::Gte);
        assert_eq!(param.filter_variable, "3");
        assert!(param.filter_variable2.is_none());
    }

    #[test]
    fn test_second_bound_dropped_for_single_value_operators() {
        let mut input = raw("salary", "lte", "3000");
        input.filter_variable2 = Some("4000".to_string());
        let param = kept(resolve_parameter(input, &DirectoryCache::default()));
        assert!(param.filter_variable2.is_none());
    }

    #[test]
    fn test_experience_aliases_and_default_operator() {
        let mut input = raw("YearsOfExperience", "", "5,5+");
        input.operator = None;
        let param = kept(resolve_parameter(input, &DirectoryCache::default()));
        assert_eq!(param.name, FilterField::Experience);
        assert_eq!(param.operator, FilterOperator::Equals);
        assert_eq!(param.filter_variable, "5.5");
    }

    #[test]
    fn test_gender_and_location_canonicalization() {
        let gender = kept(resolve_parameter(
            raw("sex", "equals", "women"),
            &DirectoryCache::default(),
        ));
        assert_eq!(gender.name, FilterField::Gender);
        assert_eq!(gender.filter_variable, "Female");

        let country = kept(resolve_parameter(
            raw("Country", "contains", "united states"),
            &DirectoryCache::default(),
        ));
        assert_eq!(country.filter_variable, "United States");
    }

    #[test]
    fn test_entity_resolves_to_id_with_canonical_name() {
        let mut directory = DirectoryCache::default();
        directory.insert(EntityKind::University, "Marmara University", "uni-7");
        let param = kept(resolve_parameter(
            raw("School", "contains", "marmara university"),
            &directory,
        ));
        assert_eq!(param.name, FilterField::University);
        assert_eq!(param.filter_variable, "uni-7");
    }

    #[test]
    fn test_unresolved_entity_is_demoted() {
        assert_eq!(
            resolve_parameter(
                raw("stage", "equals", "Nonexistent Stage"),
                &DirectoryCache::default()
            ),
            Resolution::Demote("Nonexistent Stage".to_string())
        );
    }

    #[test]
    fn test_unknown_field_passes_through_lowercased() {
        let param = kept(resolve_parameter(
            raw("Email", "CONTAINS", "@example.com"),
            &DirectoryCache::default(),
        ));
        assert_eq!(param.name, FilterField::Other("email".to_string()));
        assert_eq!(param.operator, FilterOperator::Contains);
        assert_eq!(param.filter_variable, "@example.com");
    }

    #[test]
    fn test_unknown_operator_falls_back_to_equals() {
        let param = kept(resolve_parameter(
            raw("fullName", "startsWith", "Ada"),
            &DirectoryCache::default(),
        ));
        assert_eq!(param.operator, FilterOperator::Equals);
    }

    #[test]
    fn test_parameter_without_value_is_skipped() {
        let mut input = raw("salary", "gte", "");
        input.filter_variable = None;
        assert_eq!(
            resolve_parameter(input, &DirectoryCache::default()),
            Resolution::Skip
        );
    }
}
