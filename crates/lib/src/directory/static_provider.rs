//! # Static Directory Provider
//!
//! An in-memory directory, configured up front. Useful for deployments whose
//! stage IDs are fixed, and as the empty default when no directory service is
//! configured (every entity reference then falls back to the free-text query).

use super::{DirectoryEntry, DirectoryPage, DirectoryProvider};
use crate::{errors::PromptError, types::EntityKind};
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct StaticDirectoryProvider {
    entries: HashMap<EntityKind, Vec<DirectoryEntry>>,
}

impl StaticDirectoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a provider from `kind -> (name -> id)` maps, as found in `config.yml`.
    pub fn from_names(maps: HashMap<EntityKind, HashMap<String, String>>) -> Self {
        let entries = maps
            .into_iter()
            .map(|(kind, names)| {
                let mut entries: Vec<DirectoryEntry> = names
                    .into_iter()
                    .map(|(name, id)| DirectoryEntry { id, name })
                    .collect();
                entries.sort_by(|a, b| a.name.cmp(&b.name));
                (kind, entries)
            })
            .collect();
        Self { entries }
    }

    pub fn with_entry(mut self, kind: EntityKind, id: &str, name: &str) -> Self {
        self.entries.entry(kind).or_default().push(DirectoryEntry {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }
}

#[async_trait]
impl DirectoryProvider for StaticDirectoryProvider {
    async fn fetch_page(
        &self,
        kind: EntityKind,
        _page: u32,
        _page_size: u32,
    ) -> Result<DirectoryPage, PromptError> {
        Ok(DirectoryPage {
            entries: self.entries.get(&kind).cloned().unwrap_or_default(),
            pages: 1,
        })
    }
}
