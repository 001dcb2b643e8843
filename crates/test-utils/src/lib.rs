use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use talentfilter::directory::{DirectoryEntry, DirectoryPage, DirectoryProvider};
use talentfilter::errors::PromptError;
use talentfilter::providers::ai::AiProvider;
use talentfilter::types::EntityKind;

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<Vec<(String, String)>>>,
    default_response: Arc<Mutex<Option<String>>>,
    failing: Arc<AtomicBool>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            default_response: Arc::new(Mutex::new(None)),
            failing: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A mock that answers every prompt with `response`.
    pub fn with_response(response: &str) -> Self {
        let mock = Self::new();
        mock.set_default_response(response);
        mock
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the user prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.push((key.to_string(), response.to_string()));
    }

    /// The response used when no key matches.
    pub fn set_default_response(&self, response: &str) {
        *self.default_response.lock().unwrap() = Some(response.to_string());
    }

    /// Makes every subsequent call fail with an `AiApi` error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Retrieves the recorded `(system_prompt, user_prompt)` calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        if self.failing.load(Ordering::SeqCst) {
            return Err(PromptError::AiApi(
                "MockAiProvider: configured to fail".to_string(),
            ));
        }

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if user_prompt.contains(key.as_str()) {
                return Ok(response.clone());
            }
        }

        self.default_response.lock().unwrap().clone().ok_or_else(|| {
            PromptError::AiApi(format!(
                "MockAiProvider: No response programmed for user prompt. Got: '{user_prompt}'"
            ))
        })
    }
}

// --- Mock Directory Provider ---

/// An in-memory directory service that counts requests and can be made to fail or stall.
#[derive(Clone, Debug, Default)]
pub struct MockDirectoryProvider {
    entries: Arc<Mutex<HashMap<EntityKind, Vec<DirectoryEntry>>>>,
    failing: Arc<AtomicBool>,
    delay: Arc<Mutex<Option<Duration>>>,
    requests: Arc<Mutex<Vec<(EntityKind, u32)>>>,
    refreshes: Arc<AtomicUsize>,
}

impl MockDirectoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry of the given kind.
    pub fn with_entry(self, kind: EntityKind, id: &str, name: &str) -> Self {
        self.add_entry(kind, id, name);
        self
    }

    pub fn add_entry(&self, kind: EntityKind, id: &str, name: &str) {
        self.entries
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(DirectoryEntry {
                id: id.to_string(),
                name: name.to_string(),
            });
    }

    /// Adds `count` universities named `University {n}` with IDs `uni-{n}`.
    pub fn with_universities(self, count: usize) -> Self {
        for n in 1..=count {
            self.add_entry(
                EntityKind::University,
                &format!("uni-{n}"),
                &format!("University {n}"),
            );
        }
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delays every response, to widen race windows in concurrency tests.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// All `(kind, page)` requests received so far.
    pub fn requests(&self) -> Vec<(EntityKind, u32)> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of bulk refreshes observed, counted by stage requests.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectoryProvider for MockDirectoryProvider {
    async fn fetch_page(
        &self,
        kind: EntityKind,
        page: u32,
        page_size: u32,
    ) -> Result<DirectoryPage, PromptError> {
        self.requests.lock().unwrap().push((kind, page));
        if kind == EntityKind::Stage {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
        }

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(PromptError::DirectoryApi(
                "MockDirectoryProvider: configured to fail".to_string(),
            ));
        }

        let all = self
            .entries
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_default();

        if kind != EntityKind::University {
            return Ok(DirectoryPage {
                entries: all,
                pages: 1,
            });
        }

        let page_size = page_size.max(1) as usize;
        let pages = all.len().div_ceil(page_size).max(1) as u32;
        let entries = all
            .into_iter()
            .skip((page.saturating_sub(1) as usize) * page_size)
            .take(page_size)
            .collect();
        Ok(DirectoryPage { entries, pages })
    }
}
