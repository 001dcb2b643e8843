//! # Normalization Helpers
//!
//! Pure text canonicalizers shared by the translator and the filter resolver:
//! the prompt cache key, numeric cleanup, title casing and gender matching.

use tracing::warn;

/// Produces the cache key for a prompt.
///
/// Trims, lowercases and collapses internal whitespace runs to a single space.
/// The original prompt text is still what the model sees.
pub fn normalize_prompt(prompt: &str) -> String {
    prompt
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Strips everything except digits, `.` and `,`, then turns the first `,` into `.`.
///
/// This is a textual rule, not a numeric parse: `"2.000,50"` becomes `"2.000.50"`
/// and `"1,000,000"` becomes `"1.000,000"`.
pub fn clean_numeric(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    kept.replacen(',', ".", 1)
}

/// Upper-cases the first character of each whitespace-delimited token and
/// lower-cases the rest.
pub fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// Checked in order: female synonyms first because "female" contains "male" and
// "woman" contains "man".
const FEMALE_HINTS: &[&str] = &[
    "female", "woman", "women", "girl", "lady", "ladies", "kadın", "kadin", "bayan", "weiblich",
    "frau", "femme", "mujer", "f",
];
const OTHER_HINTS: &[&str] = &[
    "other", "diverse", "divers", "nonbinary", "non-binary", "non binary", "diğer", "diger",
    "andere", "autre", "x",
];
const MALE_HINTS: &[&str] = &[
    "male", "man", "men", "boy", "gentleman", "erkek", "bay", "männlich", "mannlich", "herr",
    "homme", "hombre", "m",
];

/// Maps a free-form gender value onto `Male`, `Female` or `Other`.
///
/// Single-letter hints only match the whole value. Unrecognized values are
/// returned unchanged.
pub fn canonical_gender(raw: &str) -> String {
    let value = raw.trim().to_lowercase();
    let matches = |hints: &[&str]| {
        hints.iter().any(|hint| {
            if hint.chars().count() == 1 {
                value == *hint
            } else {
                value.contains(hint)
            }
        })
    };

    if matches(FEMALE_HINTS) {
        "Female".to_string()
    } else if matches(OTHER_HINTS) {
        "Other".to_string()
    } else if matches(MALE_HINTS) {
        "Male".to_string()
    } else {
        warn!("Unrecognized gender value '{}', passing through unchanged", raw);
        raw.to_string()
    }
}
