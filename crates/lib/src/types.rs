use crate::{
    cache::LruCache,
    constants::{
        DEFAULT_DIRECTORY_TTL_SECS, DEFAULT_MAX_UNIVERSITY_PAGES, DEFAULT_PROMPT_CACHE_CAPACITY,
        DEFAULT_UNIVERSITY_PAGE_SIZE,
    },
    directory::{static_provider::StaticDirectoryProvider, DirectoryLookup, DirectoryProvider},
    errors::PromptError,
    prompts::{FILTER_GENERATION_SYSTEM_PROMPT, FILTER_GENERATION_USER_PROMPT},
    providers::ai::AiProvider,
    resolver::FilterResolver,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{fmt, sync::Mutex, time::Duration};

// --- Filter Vocabulary ---

/// The kinds of user-defined entities that are referenced by ID in a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Stage,
    JobListing,
    Tag,
    Skill,
    RejectedReason,
    University,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Stage,
        EntityKind::JobListing,
        EntityKind::Tag,
        EntityKind::Skill,
        EntityKind::RejectedReason,
        EntityKind::University,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Stage => "stage",
            EntityKind::JobListing => "jobListing",
            EntityKind::Tag => "tag",
            EntityKind::Skill => "skill",
            EntityKind::RejectedReason => "rejectedReason",
            EntityKind::University => "university",
        }
    }

    /// Parses a kind name case-insensitively, ignoring `_` and `-` (`job_listing`, `jobListing`).
    pub fn parse(raw: &str) -> Option<Self> {
        let compact: String = raw
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect();
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(compact.trim()))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Keywords for entity fields, checked in order against the words of a field name
// ("rejectionReason" -> ["rejection", "reason"]). A word matches its keyword or
// the keyword's plural.
const ENTITY_KEYWORDS: &[(&str, EntityKind)] = &[
    ("reason", EntityKind::RejectedReason),
    ("rejection", EntityKind::RejectedReason),
    ("university", EntityKind::University),
    ("school", EntityKind::University),
    ("college", EntityKind::University),
    ("skill", EntityKind::Skill),
    ("stage", EntityKind::Stage),
    ("pipeline", EntityKind::Stage),
    ("tag", EntityKind::Tag),
    ("job", EntityKind::JobListing),
    ("vacancy", EntityKind::JobListing),
];

// Generic words that name an entity only when they are the whole field name:
// "status" is a stage, "employmentStatus" is not.
const STANDALONE_ENTITY_KEYWORDS: &[(&str, EntityKind)] = &[
    ("status", EntityKind::Stage),
    ("label", EntityKind::Tag),
    ("labels", EntityKind::Tag),
    ("position", EntityKind::JobListing),
    ("title", EntityKind::JobListing),
    ("role", EntityKind::JobListing),
];

/// Splits a field name into lowercase words at camelCase humps and at
/// non-alphanumeric separators.
fn field_words(raw: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous_lower = false;
    for c in raw.trim().chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous_lower = false;
            continue;
        }
        if c.is_uppercase() && previous_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        previous_lower = c.is_lowercase() || c.is_numeric();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn word_matches(word: &str, keyword: &str) -> bool {
    word == keyword
        || word
            .strip_prefix(keyword)
            .is_some_and(|rest| rest == "s" || rest == "es")
}

/// The canonical field a filter parameter constrains.
///
/// Serialized as the backend's field key (`salary`, `fullName`, `jobTitle`, ...).
/// Any name outside the vocabulary is carried through lowercased as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterField {
    Salary,
    FullName,
    Address,
    Country,
    Gender,
    Experience,
    Stage,
    JobTitle,
    Tag,
    Skill,
    University,
    Reason,
    Other(String),
}

impl FilterField {
    /// Classifies a free-form field name produced by the model.
    pub fn classify(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        let compact: String = lowered
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect();

        match compact.as_str() {
            "salary" | "salaryexp" | "salaryexpectation" => return FilterField::Salary,
            "fullname" | "name" => return FilterField::FullName,
            "address" | "location" => return FilterField::Address,
            "country" => return FilterField::Country,
            "gender" | "sex" | "genders" => return FilterField::Gender,
            "experience" | "exp" | "experienceyears" | "yearsofexperience" => {
                return FilterField::Experience
            }
            _ => {}
        }

        let words = field_words(raw);
        let standalone = match words.as_slice() {
            [word] => STANDALONE_ENTITY_KEYWORDS
                .iter()
                .find(|(keyword, _)| word.as_str() == *keyword),
            _ => None,
        };
        standalone
            .or_else(|| {
                ENTITY_KEYWORDS
                    .iter()
                    .find(|(keyword, _)| words.iter().any(|word| word_matches(word, keyword)))
            })
            .map(|(_, kind)| FilterField::for_entity(*kind))
            .unwrap_or(FilterField::Other(lowered))
    }

    /// The canonical field for references to an entity kind.
    pub fn for_entity(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Stage => FilterField::Stage,
            EntityKind::JobListing => FilterField::JobTitle,
            EntityKind::Tag => FilterField::Tag,
            EntityKind::Skill => FilterField::Skill,
            EntityKind::RejectedReason => FilterField::Reason,
            EntityKind::University => FilterField::University,
        }
    }

    /// The canonical key sent to the backend.
    pub fn as_str(&self) -> &str {
        match self {
            FilterField::Salary => "salary",
            FilterField::FullName => "fullName",
            FilterField::Address => "address",
            FilterField::Country => "country",
            FilterField::Gender => "gender",
            FilterField::Experience => "experience",
            FilterField::Stage => "stage",
            FilterField::JobTitle => "jobTitle",
            FilterField::Tag => "tag",
            FilterField::Skill => "skill",
            FilterField::University => "university",
            FilterField::Reason => "reason",
            FilterField::Other(name) => name,
        }
    }

    /// The directory map backing this field, if its values are entity references.
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            FilterField::Stage => Some(EntityKind::Stage),
            FilterField::JobTitle => Some(EntityKind::JobListing),
            FilterField::Tag => Some(EntityKind::Tag),
            FilterField::Skill => Some(EntityKind::Skill),
            FilterField::University => Some(EntityKind::University),
            FilterField::Reason => Some(EntityKind::RejectedReason),
            _ => None,
        }
    }
}

impl From<String> for FilterField {
    fn from(raw: String) -> Self {
        FilterField::classify(&raw)
    }
}

impl From<FilterField> for String {
    fn from(field: FilterField) -> Self {
        field.as_str().to_string()
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combinator joining a parameter to the previous one. Ignored on the first parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    /// Anything that is not recognizably "or" joins conjunctively.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "or" | "||" | "any" => LogicalOperator::Or,
            _ => LogicalOperator::And,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    #[default]
    Equals,
    Contains,
    Between,
    Gte,
    Lte,
}

impl FilterOperator {
    /// Maps the model's operator spelling onto the closed vocabulary.
    ///
    /// Returns `None` for an operator that is not recognized at all.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let compact: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect();
        match compact.as_str() {
            "" | "equals" | "equal" | "eq" | "is" | "=" | "==" => Some(FilterOperator::Equals),
            "contains" | "like" | "includes" | "in" => Some(FilterOperator::Contains),
            "between" | "range" => Some(FilterOperator::Between),
            "gte" | "gt" | "greaterthan" | "greaterthanorequal" | "atleast" | "min" | ">="
            | ">" => Some(FilterOperator::Gte),
            "lte" | "lt" | "lessthan" | "lessthanorequal" | "atmost" | "max" | "<=" | "<" => {
                Some(FilterOperator::Lte)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::Contains => "contains",
            FilterOperator::Between => "between",
            FilterOperator::Gte => "gte",
            FilterOperator::Lte => "lte",
        }
    }
}

// --- Resolved Filter ---

/// One predicate in the filter chain sent to the applicant listing query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParameter {
    #[serde(default)]
    pub logical_operator: LogicalOperator,
    pub name: FilterField,
    #[serde(default)]
    pub operator: FilterOperator,
    pub filter_variable: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_variable2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_curr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_period: Option<String>,
}

/// The structured filter returned to the caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilter {
    #[serde(default)]
    pub filter_parameters: Vec<FilterParameter>,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub is_favorite_applicant: bool,
    #[serde(default)]
    pub job_listing_id: Option<String>,
}

impl QueryFilter {
    /// True when the filter constrains nothing.
    pub fn is_empty(&self) -> bool {
        self.filter_parameters.is_empty()
            && self.query.trim().is_empty()
            && !self.is_favorite_applicant
    }
}

// --- Raw Model Output ---

/// A filter parameter exactly as the model wrote it. Every field is optional and
/// scalar values may arrive as strings, numbers or booleans.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFilterParameter {
    #[serde(default, deserialize_with = "lenient_string")]
    pub logical_operator: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub operator: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub filter_variable: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub filter_variable2: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub salary_curr: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub salary_period: Option<String>,
}

/// The model's filter before normalization and entity resolution.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQueryFilter {
    #[serde(default)]
    pub filter_parameters: Option<Vec<RawFilterParameter>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub query: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_favorite_applicant: bool,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

// --- Client ---

/// The filter translation client.
///
/// Holds the AI provider, the entity resolver (with its directory cache) and the
/// prompt cache. One instance is meant to be shared process-wide behind an `Arc`.
pub struct FilterClient {
    pub(crate) ai_provider: Box<dyn AiProvider>,
    pub(crate) resolver: FilterResolver,
    pub(crate) prompt_cache: Mutex<LruCache<String, QueryFilter>>,
    pub(crate) system_prompt: String,
    pub(crate) user_prompt_template: String,
}

impl fmt::Debug for FilterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterClient")
            .field("ai_provider", &self.ai_provider)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

/// A builder for creating `FilterClient` instances.
#[derive(Default)]
pub struct FilterClientBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    directory_provider: Option<Box<dyn DirectoryProvider>>,
    cache_capacity: Option<usize>,
    directory_ttl: Option<Duration>,
    max_university_pages: Option<u32>,
    university_page_size: Option<u32>,
    system_prompt: Option<String>,
    user_prompt: Option<String>,
}

impl FilterClientBuilder {
    /// Creates a new `FilterClientBuilder`.
    ///
    /// # Examples
    ///
    /// ```
    /// use talentfilter::FilterClientBuilder;
    ///
    /// let builder = FilterClientBuilder::new().cache_capacity(100);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the AI provider used to translate prompts.
    pub fn ai_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(provider);
        self
    }

    /// Sets the directory service used to resolve entity names to IDs.
    ///
    /// Without one, every entity reference falls back to the free-text query.
    pub fn directory_provider(mut self, provider: Box<dyn DirectoryProvider>) -> Self {
        self.directory_provider = Some(provider);
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub fn directory_ttl(mut self, ttl: Duration) -> Self {
        self.directory_ttl = Some(ttl);
        self
    }

    pub fn max_university_pages(mut self, pages: u32) -> Self {
        self.max_university_pages = Some(pages);
        self
    }

    pub fn university_page_size(mut self, size: u32) -> Self {
        self.university_page_size = Some(size);
        self
    }

    /// Overrides the system prompt describing the filter schema.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Overrides the user prompt template. Must contain `{prompt}`.
    pub fn user_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.user_prompt = Some(prompt.into());
        self
    }

    /// Builds the `FilterClient`.
    ///
    /// Fails only when no AI provider was supplied.
    pub fn build(self) -> Result<FilterClient, PromptError> {
        let ai_provider = self.ai_provider.ok_or_else(|| {
            PromptError::MissingAiProvider("an AI provider must be set on the builder".to_string())
        })?;
        let directory_provider = self
            .directory_provider
            .unwrap_or_else(|| Box::new(StaticDirectoryProvider::default()));

        let directory = DirectoryLookup::new(
            directory_provider,
            self.directory_ttl
                .unwrap_or(Duration::from_secs(DEFAULT_DIRECTORY_TTL_SECS)),
            self.max_university_pages
                .unwrap_or(DEFAULT_MAX_UNIVERSITY_PAGES),
            self.university_page_size
                .unwrap_or(DEFAULT_UNIVERSITY_PAGE_SIZE),
        );

        Ok(FilterClient {
            ai_provider,
            resolver: FilterResolver::new(directory),
            prompt_cache: Mutex::new(LruCache::new(
                self.cache_capacity.unwrap_or(DEFAULT_PROMPT_CACHE_CAPACITY),
            )),
            system_prompt: self
                .system_prompt
                .unwrap_or_else(|| FILTER_GENERATION_SYSTEM_PROMPT.to_string()),
            user_prompt_template: self
                .user_prompt
                .unwrap_or_else(|| FILTER_GENERATION_USER_PROMPT.to_string()),
        })
    }
}
