//! # Prompt Template Modules
//!
//! This module organizes the prompt templates used by the filter translator.
//! The templates and the JSON shape they describe live next to each other so that
//! schema drift shows up in the fixture-based tests.

pub mod tasks;

pub use tasks::{FILTER_GENERATION_SYSTEM_PROMPT, FILTER_GENERATION_USER_PROMPT};

/// Renders the user prompt template with the recruiter's literal prompt.
///
/// Placeholders: `{prompt}`
pub fn render_user_prompt(template: &str, prompt: &str) -> String {
    template.replace("{prompt}", prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_user_prompt_embeds_literal_prompt() {
        let rendered = render_user_prompt(FILTER_GENERATION_USER_PROMPT, "  Hired  STAGE ");
        assert!(rendered.contains("Prompt: \"  Hired  STAGE \""));
        assert!(!rendered.contains("{prompt}"));
    }

    #[test]
    fn test_system_prompt_documents_every_operator() {
        for operator in ["equals", "contains", "between", "gte", "lte"] {
            assert!(
                FILTER_GENERATION_SYSTEM_PROMPT.contains(&format!("\"{operator}\"")),
                "operator {operator} missing from the schema description"
            );
        }
    }
}
