//! Lookup structures built once from the glossary.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::glossary::{Entry, Glossary};

use super::normalize::{clean_text, normalize};

/// Words shorter than this never enter the word index.
pub(crate) const MIN_INDEXED_WORD_LEN: usize = 4;

/// Immutable retrieval index over one glossary generation.
///
/// Entries are identified by their position in the glossary. The exact index
/// keeps insertion order: a key re-bound by a later entry keeps the slot of
/// its first insertion and points at the later entry.
#[derive(Debug, Default)]
pub struct GlossaryIndex {
    glossary: Glossary,
    exact: IndexMap<String, usize>,
    words: HashMap<String, Vec<usize>>,
    blobs: Vec<String>,
}

/// Summary of an index, as reported by `glossa check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub entries: usize,
    pub complete_entries: usize,
    pub exact_keys: usize,
    pub indexed_words: usize,
    pub blank_terms: usize,
    /// Entries whose exact binding was overwritten by a later entry.
    pub shadowed_terms: usize,
}

impl GlossaryIndex {
    /// Build both indices in a single pass over the glossary.
    pub fn build(glossary: Glossary) -> Self {
        let mut exact = IndexMap::new();
        let mut words: HashMap<String, Vec<usize>> = HashMap::new();
        let mut blobs = Vec::with_capacity(glossary.len());

        for (id, entry) in glossary.entries().iter().enumerate() {
            let key = normalize(&entry.term);

            for word in key.split_whitespace() {
                if word.len() >= MIN_INDEXED_WORD_LEN {
                    words.entry(word.to_string()).or_default().push(id);
                }
            }

            exact.insert(key, id);
            blobs.push(search_blob(entry));
        }

        tracing::info!(
            entries = glossary.len(),
            exact_keys = exact.len(),
            indexed_words = words.len(),
            "Glossary index built"
        );

        Self {
            glossary,
            exact,
            words,
            blobs,
        }
    }

    /// An index over no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The glossary this index was built from.
    pub fn glossary(&self) -> &Glossary {
        &self.glossary
    }

    pub fn len(&self) -> usize {
        self.glossary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glossary.is_empty()
    }

    /// Entry by identity. Panics on an id not produced by this index.
    pub(crate) fn entry(&self, id: usize) -> &Entry {
        &self.glossary.entries()[id]
    }

    /// Exact-index bindings in insertion order.
    pub(crate) fn exact_bindings(&self) -> impl Iterator<Item = (&str, usize)> {
        self.exact.iter().map(|(key, id)| (key.as_str(), *id))
    }

    /// Entry bound to a normalized key.
    pub fn exact(&self, key: &str) -> Option<&Entry> {
        self.exact.get(key).map(|id| self.entry(*id))
    }

    /// Entry ids whose normalized term contains `word`, in glossary order.
    pub(crate) fn word_ids(&self, word: &str) -> Option<&[usize]> {
        self.words.get(word).map(Vec::as_slice)
    }

    pub(crate) fn has_word(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Normalized concatenation of an entry's narrative fields.
    pub(crate) fn blob(&self, id: usize) -> &str {
        &self.blobs[id]
    }

    pub fn stats(&self) -> IndexStats {
        let entries = self.glossary.entries();
        IndexStats {
            entries: entries.len(),
            complete_entries: entries.iter().filter(|e| e.is_complete()).count(),
            exact_keys: self.exact.len(),
            indexed_words: self.words.len(),
            blank_terms: self.glossary.blank_terms(),
            shadowed_terms: entries.len() - self.exact.len(),
        }
    }
}

fn search_blob(entry: &Entry) -> String {
    let joined = [
        entry.term.as_str(),
        entry.definition.as_str(),
        entry.conflict_notes.as_str(),
        entry.biological_sense.as_str(),
        entry.technical_notes.as_str(),
    ]
    .join(" ");
    clean_text(&normalize(&joined))
}
