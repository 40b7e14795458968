//! Glossary entries and the on-disk glossary file.
//!
//! The glossary is produced offline and stored as JSON, either as a bare
//! array of entries or wrapped in an object under `entries` (`entradas` in
//! the extractor's output). Field names are accepted in English or in the
//! extractor's Spanish form. Absent or `null` fields read as empty.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{GlossaError, Result};
use crate::search::normalize;

const MIN_DEFINITION_CHARS: usize = 20;
const MIN_TECHNICAL_CHARS: usize = 10;
const MIN_BIOLOGICAL_CHARS: usize = 20;

/// One glossary record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Headword, e.g. "Estómago".
    #[serde(default, alias = "termino", deserialize_with = "nullable")]
    pub term: String,
    /// Medical definition.
    #[serde(default, alias = "definicion", deserialize_with = "nullable")]
    pub definition: String,
    /// Embryonic layer, conflict type, disease phases.
    #[serde(default, alias = "tecnico", deserialize_with = "nullable")]
    pub technical_notes: String,
    /// Why the body responds this way.
    #[serde(default, alias = "sentido_biologico", deserialize_with = "nullable")]
    pub biological_sense: String,
    /// Associated emotional conflicts.
    #[serde(default, alias = "conflicto", deserialize_with = "nullable")]
    pub conflict_notes: String,
    /// Related terms, in the order the source lists them.
    #[serde(default, alias = "referencias_cruzadas", deserialize_with = "nullable")]
    pub cross_references: Vec<String>,
    /// First source page, when the extractor recorded it.
    #[serde(
        default,
        alias = "pagina_inicio",
        skip_serializing_if = "Option::is_none"
    )]
    pub page_start: Option<u32>,
    /// Last source page, when the extractor recorded it.
    #[serde(default, alias = "pagina_fin", skip_serializing_if = "Option::is_none")]
    pub page_end: Option<u32>,
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Entry {
    /// Create an entry with only a term set.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }

    /// Whether every narrative section carries real content.
    ///
    /// Mirrors the acceptance gate of the offline extractor: a term, a
    /// definition over 20 characters, technical notes over 10 and a
    /// biological sense over 20. Entries failing it still load and match.
    pub fn is_complete(&self) -> bool {
        !self.term.trim().is_empty()
            && self.definition.chars().count() > MIN_DEFINITION_CHARS
            && self.technical_notes.chars().count() > MIN_TECHNICAL_CHARS
            && self.biological_sense.chars().count() > MIN_BIOLOGICAL_CHARS
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GlossaryFile {
    Entries(Vec<Entry>),
    Wrapped {
        #[serde(alias = "entradas")]
        entries: Vec<Entry>,
    },
}

/// The ordered list of all entries, as loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glossary {
    entries: Vec<Entry>,
}

impl Glossary {
    /// Wrap an already-built list of entries.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// A glossary with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a glossary from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::empty());
        }

        let file: GlossaryFile = serde_json::from_str(content)?;
        let entries = match file {
            GlossaryFile::Entries(entries) => entries,
            GlossaryFile::Wrapped { entries } => entries,
        };
        Ok(Self { entries })
    }

    /// Load a glossary file.
    ///
    /// Returns [`GlossaError::NotFound`] when the file does not exist,
    /// [`GlossaError::Io`] when it cannot be read and [`GlossaError::Json`]
    /// when it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Err(GlossaError::Glossary(format!(
                "Glossary path is a directory: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                GlossaError::NotFound(format!("Glossary file not found: {}", path.display()))
            }
            _ => GlossaError::Io(e),
        })?;
        let glossary = Self::from_json(&content)?;

        let blank = glossary.blank_terms();
        if blank > 0 {
            tracing::warn!(
                path = %path.display(),
                blank_terms = blank,
                "Glossary contains entries whose term has no letters; they match every query"
            );
        }

        tracing::info!(
            path = %path.display(),
            entries = glossary.len(),
            "Glossary loaded"
        );
        Ok(glossary)
    }

    /// Load a glossary file, falling back to an empty glossary on any failure.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(glossary) => glossary,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Using an empty glossary"
                );
                Self::empty()
            }
        }
    }

    /// Entries in load order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entries whose term normalizes to the empty string.
    pub fn blank_terms(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| normalize(&entry.term).is_empty())
            .count()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the glossary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Entry>> for Glossary {
    fn from(entries: Vec<Entry>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn complete_entry() -> Entry {
        Entry {
            term: "Estómago".to_string(),
            definition: "Órgano del aparato digestivo entre esófago e intestino.".to_string(),
            technical_notes: "Endodermo, fase activa.".to_string(),
            biological_sense: "Digerir un bocado difícil de tragar.".to_string(),
            conflict_notes: "Contrariedad indigesta.".to_string(),
            cross_references: vec!["Úlcera".to_string()],
            page_start: None,
            page_end: None,
        }
    }

    #[test]
    fn test_from_json_bare_array_english_fields() {
        let json = r#"[
            {"term": "Piel", "definition": "Órgano", "technical_notes": "Ectodermo",
             "biological_sense": "Contacto", "conflict_notes": "Separación",
             "cross_references": ["Eczema", "Psoriasis"]}
        ]"#;
        let glossary = Glossary::from_json(json).unwrap();
        assert_eq!(glossary.len(), 1);
        let entry = &glossary.entries()[0];
        assert_eq!(entry.term, "Piel");
        assert_eq!(entry.cross_references, vec!["Eczema", "Psoriasis"]);
    }

    #[test]
    fn test_from_json_spanish_fields() {
        let json = r#"[
            {"termino": "Alergia", "definicion": "Reacción", "tecnico": "Mesodermo",
             "sentido_biologico": "Protección", "conflicto": "Separación",
             "referencias_cruzadas": ["Asma"], "pagina_inicio": 12, "pagina_fin": 13}
        ]"#;
        let glossary = Glossary::from_json(json).unwrap();
        let entry = &glossary.entries()[0];
        assert_eq!(entry.term, "Alergia");
        assert_eq!(entry.technical_notes, "Mesodermo");
        assert_eq!(entry.biological_sense, "Protección");
        assert_eq!(entry.conflict_notes, "Separación");
        assert_eq!(entry.cross_references, vec!["Asma"]);
        assert_eq!(entry.page_start, Some(12));
        assert_eq!(entry.page_end, Some(13));
    }

    #[test]
    fn test_from_json_wrapped_object() {
        let json = r#"{"introduccion": {"contenido": "x"},
                       "entradas": [{"termino": "Asma"}, {"termino": "Tos"}]}"#;
        let glossary = Glossary::from_json(json).unwrap();
        let terms: Vec<&str> = glossary.entries().iter().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, vec!["Asma", "Tos"]);
    }

    #[test]
    fn test_missing_and_null_fields_are_empty() {
        let json = r#"[{"termino": "Tos", "definicion": null, "referencias_cruzadas": null}]"#;
        let glossary = Glossary::from_json(json).unwrap();
        let entry = &glossary.entries()[0];
        assert_eq!(entry.definition, "");
        assert_eq!(entry.technical_notes, "");
        assert!(entry.cross_references.is_empty());
    }

    #[test]
    fn test_from_json_blank_content_is_empty() {
        assert!(Glossary::from_json("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = Glossary::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, GlossaError::NotFound(_)));
    }

    #[test]
    fn test_load_malformed_file_is_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{\"termino\": ").unwrap();
        let err = Glossary::load(&path).unwrap_err();
        assert!(matches!(err, GlossaError::Json(_)));
    }

    #[test]
    fn test_load_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = Glossary::load(dir.path()).unwrap_err();
        assert!(matches!(err, GlossaError::Glossary(_)));
    }

    #[test]
    fn test_blank_terms_count_letterless_terms() {
        let json = r#"[{"termino": "Piel"}, {"termino": "2024"}, {"termino": "¿?"}, {"termino": "  "}]"#;
        let glossary = Glossary::from_json(json).unwrap();
        assert_eq!(glossary.blank_terms(), 3);
    }

    #[test]
    fn test_load_digit_only_term_is_blank() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("glossary.json");
        std::fs::write(&path, r#"[{"termino": "Piel"}, {"termino": "2024"}]"#).unwrap();

        let glossary = Glossary::load(&path).unwrap();
        assert_eq!(glossary.blank_terms(), 1);

        let index = crate::search::GlossaryIndex::build(glossary);
        assert_eq!(index.stats().blank_terms, 1);
    }

    #[test]
    fn test_load_or_empty_degrades() {
        let dir = TempDir::new().unwrap();
        let missing = Glossary::load_or_empty(&dir.path().join("missing.json"));
        assert!(missing.is_empty());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "not json").unwrap();
        assert!(Glossary::load_or_empty(&broken).is_empty());
    }

    #[test]
    fn test_load_roundtrip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("glossary.json");
        let entries = vec![complete_entry(), Entry::new("Úlcera")];
        std::fs::write(&path, serde_json::to_string_pretty(&entries).unwrap()).unwrap();

        let glossary = Glossary::load(&path).unwrap();
        assert_eq!(glossary.entries(), entries.as_slice());
    }

    #[test]
    fn test_is_complete() {
        assert!(complete_entry().is_complete());

        let mut short = complete_entry();
        short.technical_notes = "Corto".to_string();
        assert!(!short.is_complete());

        let mut blank = complete_entry();
        blank.term = "   ".to_string();
        assert!(!blank.is_complete());

        assert!(!Entry::new("Tos").is_complete());
    }
}
