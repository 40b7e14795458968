//! Glossa - glossary-grounded question answering

pub mod answer;
pub mod config;
pub mod error;
pub mod glossary;
pub mod providers;
pub mod search;

pub use config::Config;
pub use error::{GlossaError, Result};
pub use glossary::{Entry, Glossary};
pub use search::{GlossaryIndex, GlossaryStore};
