//! # Shared Constants
//!
//! This module provides a centralized location for constants that are shared across
//! the `talentfilter` workspace. Using these constants helps to avoid "magic strings"
//! and keeps the library, server and CLI defaults consistent.

/// The default number of resolved filters kept in the prompt cache.
pub const DEFAULT_PROMPT_CACHE_CAPACITY: usize = 50;

/// How long a directory snapshot is served before it is refetched, in seconds.
pub const DEFAULT_DIRECTORY_TTL_SECS: u64 = 60 * 60;

/// The maximum number of university pages fetched in one directory refresh.
pub const DEFAULT_MAX_UNIVERSITY_PAGES: u32 = 5;

/// The page size requested for paginated directory lookups.
pub const DEFAULT_UNIVERSITY_PAGE_SIZE: u32 = 100;

/// The salary currency assumed when the model does not name one.
pub const DEFAULT_SALARY_CURRENCY: &str = "EUR";

/// The salary period assumed when the model does not name one.
pub const DEFAULT_SALARY_PERIOD: &str = "MONTHLY";

/// The Gemini model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro-latest";

/// The explanation returned for a filter that constrains nothing.
pub const NO_FILTER_EXPLANATION: &str = "No filter applied";
