//! Deterministic glossary retrieval.
//!
//! Build a [`GlossaryIndex`] once from a [`Glossary`](crate::glossary::Glossary),
//! then call [`GlossaryIndex::search`] for every query. [`GlossaryStore`]
//! holds the current index when the glossary can be reloaded at runtime.

pub mod engine;
pub mod index;
pub mod normalize;
pub mod store;

pub use engine::{search, search_traced, MatchStrategy, SearchHit};
pub use index::{GlossaryIndex, IndexStats};
pub use normalize::{clean_text, extract_keywords, is_generic, normalize, singularize};
pub use store::GlossaryStore;
