//! # Directory Lookup Cache
//!
//! Maps human-readable entity names (stages, job listings, tags, skills, rejection
//! reasons, universities) to backend IDs. The maps are fetched in bulk from a
//! `DirectoryProvider`, served for a fixed TTL, and refreshed behind a single-flight
//! guard so concurrent resolutions never issue duplicate refreshes.
//!
//! A failed refresh never fails resolution: the previous snapshot (possibly stale)
//! is served, or an empty one if nothing was ever fetched.

pub mod graphql;
pub mod static_provider;

use crate::{errors::PromptError, types::EntityKind};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    fmt::Debug,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, PoisonError, RwLock,
    },
    time::Duration,
};
use tracing::{debug, info, warn};

/// One `{id, name}` pair returned by the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub id: String,
    pub name: String,
}

/// A page of directory entries and the total number of pages available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryPage {
    pub entries: Vec<DirectoryEntry>,
    pub pages: u32,
}

/// A trait for read-only access to the directory service.
#[async_trait]
pub trait DirectoryProvider: Send + Sync + Debug + DynClone {
    /// Fetches one page of entries of the given kind. Pages are 1-based.
    ///
    /// Kinds that are not paginated return everything on page 1 with `pages == 1`.
    async fn fetch_page(
        &self,
        kind: EntityKind,
        page: u32,
        page_size: u32,
    ) -> Result<DirectoryPage, PromptError>;
}

dyn_clone::clone_trait_object!(DirectoryProvider);

/// A lowercase-name -> ID map for one entity kind, with the reverse mapping
/// kept for display.
#[derive(Debug, Clone, Default)]
pub struct EntityMap {
    ids_by_name: HashMap<String, String>,
    names_by_id: HashMap<String, String>,
}

impl EntityMap {
    /// Adds an entry. The first ID seen for a name wins.
    pub fn insert(&mut self, name: &str, id: &str) {
        let key = name.trim().to_lowercase();
        if key.is_empty() || id.is_empty() {
            return;
        }
        self.ids_by_name
            .entry(key)
            .or_insert_with(|| id.to_string());
        self.names_by_id
            .entry(id.to_string())
            .or_insert_with(|| name.trim().to_string());
    }

    pub fn id_for(&self, name: &str) -> Option<&str> {
        self.ids_by_name
            .get(&name.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn name_for(&self, id: &str) -> Option<&str> {
        self.names_by_id.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids_by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids_by_name.is_empty()
    }
}

/// A snapshot of every entity map plus the time it was fetched.
#[derive(Debug, Clone, Default)]
pub struct DirectoryCache {
    maps: HashMap<EntityKind, EntityMap>,
    pub last_fetched: Option<DateTime<Utc>>,
}

impl DirectoryCache {
    pub fn insert(&mut self, kind: EntityKind, name: &str, id: &str) {
        self.maps.entry(kind).or_default().insert(name, id);
    }

    pub fn map(&self, kind: EntityKind) -> Option<&EntityMap> {
        self.maps.get(&kind)
    }

    /// Looks up the ID for a human-readable name, case-insensitively.
    pub fn resolve_id(&self, kind: EntityKind, name: &str) -> Option<&str> {
        self.maps.get(&kind).and_then(|map| map.id_for(name))
    }

    /// Looks up the display name for an ID.
    pub fn label_for(&self, kind: EntityKind, id: &str) -> Option<&str> {
        self.maps.get(&kind).and_then(|map| map.name_for(id))
    }

    /// True when no map holds any entry.
    pub fn is_empty(&self) -> bool {
        self.maps.values().all(EntityMap::is_empty)
    }

    /// True while the snapshot is younger than `ttl`.
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        match self.last_fetched {
            // A timestamp in the future (clock skew) counts as fresh.
            Some(fetched) => (now - fetched).to_std().map_or(true, |age| age < ttl),
            None => false,
        }
    }

    pub fn status(&self) -> DirectoryStatus {
        let counts = EntityKind::ALL
            .iter()
            .map(|kind| {
                (
                    kind.as_str().to_string(),
                    self.maps.get(kind).map_or(0, EntityMap::len),
                )
            })
            .collect();
        DirectoryStatus {
            counts,
            last_fetched: self.last_fetched,
        }
    }
}

/// Entry counts per kind, for status reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStatus {
    pub counts: BTreeMap<String, usize>,
    pub last_fetched: Option<DateTime<Utc>>,
}

/// The TTL-bounded, single-flight directory cache.
pub struct DirectoryLookup {
    provider: Box<dyn DirectoryProvider>,
    ttl: Duration,
    max_university_pages: u32,
    university_page_size: u32,
    current: RwLock<Arc<DirectoryCache>>,
    refresh_lock: tokio::sync::Mutex<()>,
    // Incremented after every refresh attempt, successful or not.
    attempts: AtomicU64,
}

impl Debug for DirectoryLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryLookup")
            .field("provider", &self.provider)
            .field("ttl", &self.ttl)
            .field("max_university_pages", &self.max_university_pages)
            .finish_non_exhaustive()
    }
}

impl DirectoryLookup {
    pub fn new(
        provider: Box<dyn DirectoryProvider>,
        ttl: Duration,
        max_university_pages: u32,
        university_page_size: u32,
    ) -> Self {
        Self {
            provider,
            ttl,
            max_university_pages,
            university_page_size,
            current: RwLock::new(Arc::new(DirectoryCache::default())),
            refresh_lock: tokio::sync::Mutex::new(()),
            attempts: AtomicU64::new(0),
        }
    }

    /// The current snapshot, without refreshing.
    pub fn snapshot(&self) -> Arc<DirectoryCache> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Marks the current snapshot stale so the next `fetch` refetches.
    ///
    /// The maps are kept as the fallback for a failed refetch.
    pub fn invalidate(&self) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut stale = DirectoryCache::clone(&current);
        stale.last_fetched = None;
        *current = Arc::new(stale);
        info!("Directory cache invalidated");
    }

    /// Returns a fresh snapshot, refreshing it first if it is older than the TTL.
    ///
    /// Concurrent callers that find the snapshot stale wait for a single refresh
    /// and share its outcome.
    pub async fn fetch(&self) -> Arc<DirectoryCache> {
        let seen = self.attempts.load(Ordering::Acquire);
        let cached = self.snapshot();
        if cached.is_fresh(self.ttl, Utc::now()) {
            return cached;
        }

        let _guard = self.refresh_lock.lock().await;
        if self.attempts.load(Ordering::Acquire) != seen {
            debug!("Directory refresh completed by a concurrent request");
            return self.snapshot();
        }

        let cached = self.snapshot();
        let result = self.fetch_all().await;
        let served = match result {
            Ok(fresh) => {
                let fresh = Arc::new(fresh);
                *self.current.write().unwrap_or_else(PoisonError::into_inner) = fresh.clone();
                info!(status = ?fresh.status().counts, "Directory cache refreshed");
                fresh
            }
            Err(e) => {
                if cached.is_empty() {
                    warn!("Directory fetch failed, serving empty cache: {e}");
                } else {
                    warn!("Directory fetch failed, serving stale cache: {e}");
                }
                cached
            }
        };
        self.attempts.fetch_add(1, Ordering::AcqRel);
        served
    }

    async fn fetch_all(&self) -> Result<DirectoryCache, PromptError> {
        let (stages, job_listings, tags, skills, reasons, universities) = futures::try_join!(
            self.fetch_kind(EntityKind::Stage),
            self.fetch_kind(EntityKind::JobListing),
            self.fetch_kind(EntityKind::Tag),
            self.fetch_kind(EntityKind::Skill),
            self.fetch_kind(EntityKind::RejectedReason),
            self.fetch_universities(),
        )?;

        let mut cache = DirectoryCache::default();
        for (kind, entries) in [
            (EntityKind::Stage, stages),
            (EntityKind::JobListing, job_listings),
            (EntityKind::Tag, tags),
            (EntityKind::Skill, skills),
            (EntityKind::RejectedReason, reasons),
            (EntityKind::University, universities),
        ] {
            for entry in entries {
                cache.insert(kind, &entry.name, &entry.id);
            }
        }
        cache.last_fetched = Some(Utc::now());
        Ok(cache)
    }

    async fn fetch_kind(&self, kind: EntityKind) -> Result<Vec<DirectoryEntry>, PromptError> {
        let page = self
            .provider
            .fetch_page(kind, 1, self.university_page_size)
            .await?;
        debug!("Fetched {} {} entries", page.entries.len(), kind);
        Ok(page.entries)
    }

    async fn fetch_universities(&self) -> Result<Vec<DirectoryEntry>, PromptError> {
        let mut entries = Vec::new();
        for page_number in 1..=self.max_university_pages {
            let page = self
                .provider
                .fetch_page(EntityKind::University, page_number, self.university_page_size)
                .await?;
            entries.extend(page.entries);
            if page_number >= page.pages {
                break;
            }
        }
        debug!("Fetched {} university entries", entries.len());
        Ok(entries)
    }
}
