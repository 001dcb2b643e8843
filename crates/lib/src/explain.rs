//! # Filter Explanation
//!
//! Renders a resolved filter as a one-line, human-readable sentence for the UI to
//! show as confirmation, e.g.
//! `Finding candidates in the Hired stage AND with salary at least 2000 EUR/monthly`.

use crate::{
    constants::{DEFAULT_SALARY_CURRENCY, DEFAULT_SALARY_PERIOD, NO_FILTER_EXPLANATION},
    directory::DirectoryCache,
    types::{FilterField, FilterOperator, FilterParameter, QueryFilter},
};

/// Explains a filter, rendering entity IDs verbatim.
pub fn explain_filter(filter: &QueryFilter) -> String {
    explain_filter_with_directory(filter, None)
}

/// Explains a filter, rendering entity IDs as their directory names when known.
pub fn explain_filter_with_directory(
    filter: &QueryFilter,
    directory: Option<&DirectoryCache>,
) -> String {
    if filter.is_empty() {
        return NO_FILTER_EXPLANATION.to_string();
    }
    let query = filter.query.trim();

    let mut sentence = if filter.is_favorite_applicant {
        "Finding favorite candidates".to_string()
    } else {
        "Finding candidates".to_string()
    };

    for (index, param) in filter.filter_parameters.iter().enumerate() {
        sentence.push(' ');
        if index > 0 {
            sentence.push_str(param.logical_operator.as_str());
            sentence.push(' ');
        }
        sentence.push_str(&describe(param, directory));
    }

    if !query.is_empty() {
        sentence.push_str(&format!(" matching \"{query}\""));
    }
    sentence
}

fn label<'a>(param: &'a FilterParameter, directory: Option<&'a DirectoryCache>) -> &'a str {
    param
        .name
        .entity_kind()
        .zip(directory)
        .and_then(|(kind, directory)| directory.label_for(kind, &param.filter_variable))
        .unwrap_or(param.filter_variable.as_str())
}

/// `at least 2000`, `between 1 and 3`, ...
fn bound(param: &FilterParameter) -> String {
    let value = &param.filter_variable;
    match param.operator {
        FilterOperator::Gte => format!("at least {value}"),
        FilterOperator::Lte => format!("at most {value}"),
        FilterOperator::Between => format!(
            "between {value} and {}",
            param.filter_variable2.as_deref().unwrap_or_default()
        ),
        FilterOperator::Equals | FilterOperator::Contains => value.clone(),
    }
}

fn describe(param: &FilterParameter, directory: Option<&DirectoryCache>) -> String {
    let value = &param.filter_variable;
    match &param.name {
        FilterField::Stage => format!("in the {} stage", label(param, directory)),
        FilterField::JobTitle => format!("applying for {}", label(param, directory)),
        FilterField::Tag => format!("tagged {}", label(param, directory)),
        FilterField::Skill => format!("with skill {}", label(param, directory)),
        FilterField::University => format!("who studied at {}", label(param, directory)),
        FilterField::Reason => format!("rejected for {}", label(param, directory)),
        FilterField::Salary => {
            let currency = param.salary_curr.as_deref().unwrap_or(DEFAULT_SALARY_CURRENCY);
            let period = param
                .salary_period
                .as_deref()
                .unwrap_or(DEFAULT_SALARY_PERIOD)
                .to_lowercase();
            let amount = match param.operator {
                FilterOperator::Equals | FilterOperator::Contains => format!("of {value}"),
                _ => bound(param),
            };
            format!("with salary {amount} {currency}/{period}")
        }
        FilterField::Experience => format!("with {} years of experience", bound(param)),
        FilterField::Address | FilterField::Country => format!("from {value}"),
        FilterField::FullName => match param.operator {
            FilterOperator::Contains => format!("with name containing \"{value}\""),
            _ => format!("named \"{value}\""),
        },
        FilterField::Gender => format!("with gender {value}"),
        FilterField::Other(name) => {
            let mut clause = format!("where {name} {} {value}", param.operator.as_str());
            if let (FilterOperator::Between, Some(value2)) =
                (param.operator, param.filter_variable2.as_deref())
            {
                clause.push_str(&format!(" and {value2}"));
            }
            clause
        }
    }
}
