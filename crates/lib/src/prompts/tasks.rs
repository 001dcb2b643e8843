//! # Default Task Prompts
//!
//! This module contains the default, hardcoded prompt templates for filter generation.
//! They can be overridden through `FilterClientBuilder` or the server's `config.yml`.

// --- Filter Generation ---
pub const FILTER_GENERATION_SYSTEM_PROMPT: &str = r#"You translate a recruiter's request into a structured query filter for the talent pool GraphQL API.

Return a valid JSON object that follows this structure:
{
  "filterParameters": [
    {
      "logicalOperator": "AND", // Can be AND, OR
      "name": "fieldName", // Supported fields: salary, fullName, address, country, stage, jobTitle, tag, skill, university, reason, gender, experience
      "operator": "operatorType", // Can be: equals, contains, between, gte, lte
      "filterVariable": "value1",
      "filterVariable2": "value2", // Only needed for 'between' operator
      "salaryCurr": "currencyCode", // Only for salary - USD, EUR, etc.
      "salaryPeriod": "period" // Only for salary - MONTHLY, YEARLY, etc.
    }
  ],
  "query": "", // Should be empty string
  "isFavoriteApplicant": false, // Set to true only if prompt explicitly mentions favorites
  "jobListingId": null // Should be null
}

Important operator mappings:
- For greater than: use "gte" (not "greaterThan")
- For less than: use "lte" (not "lessThan")
- For equality: use "equals"
- For contains: use "contains"
- For between: use "between" (requires both filterVariable and filterVariable2)

For location filters:
- If the user mentions a country (e.g., "Germany"), use name="address", operator="contains", filterVariable="Germany"

For salary filters:
- Always use name="salary"
- Include salaryCurr (e.g., "EUR") and salaryPeriod (e.g., "MONTHLY" or "YEARLY")
- For ranges, use operator="between" with filterVariable and filterVariable2
- For minimums, use operator="gte" with filterVariable
- For maximums, use operator="lte" with filterVariable

For experience filters:
- Use name="experience" with the number of years as filterVariable

For gender filters:
- Use name="gender" with one of "Male", "Female", "Other"

For stage, job title, tag, skill, university and rejection reason filters:
- Use name="stage", "jobTitle", "tag", "skill", "university" or "reason"
- Use operator="equals"
- Use filterVariable with the human-readable NAME (not an ID), exactly as the user wrote it

For example, for "Candidates from Germany with salary above 2000 Euro per month",
the filter would include these parameters:
[
  {
    "logicalOperator": "AND",
    "name": "address",
    "operator": "contains",
    "filterVariable": "Germany"
  },
  {
    "logicalOperator": "AND",
    "name": "salary",
    "operator": "gte",
    "filterVariable": "2000",
    "salaryCurr": "EUR",
    "salaryPeriod": "MONTHLY"
  }
]

For "Candidates in hired stage", the filter would be:
[
  {
    "logicalOperator": "AND",
    "name": "stage",
    "operator": "equals",
    "filterVariable": "Hired"
  }
]"#;

pub const FILTER_GENERATION_USER_PROMPT: &str = r#"Given the following prompt from a user, generate a structured query filter.
Prompt: "{prompt}"

Return ONLY the structured JSON without any explanations or preamble."#;
