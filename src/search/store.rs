//! Shared, reloadable handle to the current index generation.
//!
//! Readers take an `Arc` snapshot and search it without holding any lock.
//! A reload builds the next generation first and then swaps the whole
//! index in one step, so a query never sees a half-built generation.

use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::error::Result;
use crate::glossary::Glossary;

use super::index::GlossaryIndex;

/// Current glossary index, swappable as a unit.
#[derive(Debug)]
pub struct GlossaryStore {
    current: RwLock<Arc<GlossaryIndex>>,
}

impl GlossaryStore {
    /// Build a store around an initial glossary.
    pub fn new(glossary: Glossary) -> Self {
        Self::from_index(GlossaryIndex::build(glossary))
    }

    /// Wrap an already-built index.
    pub fn from_index(index: GlossaryIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// Open a glossary file, starting empty when it cannot be loaded.
    pub fn open(path: &Path) -> Self {
        Self::new(Glossary::load_or_empty(path))
    }

    /// The generation queries should run against right now.
    pub fn snapshot(&self) -> Arc<GlossaryIndex> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the current generation. Returns the previous one.
    pub fn replace(&self, glossary: Glossary) -> Arc<GlossaryIndex> {
        let next = Arc::new(GlossaryIndex::build(glossary));
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *guard, next)
    }

    /// Reload from `path`. On failure the current generation stays in place.
    ///
    /// Returns the number of entries in the new generation.
    pub fn reload(&self, path: &Path) -> Result<usize> {
        let glossary = Glossary::load(path)?;
        let count = glossary.len();
        self.replace(glossary);
        tracing::info!(path = %path.display(), entries = count, "Glossary reloaded");
        Ok(count)
    }
}

impl Default for GlossaryStore {
    fn default() -> Self {
        Self::from_index(GlossaryIndex::empty())
    }
}
