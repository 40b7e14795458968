//! Text normalization for glossary matching.
//!
//! Two cleaners live here:
//!
//! - [`normalize`] keeps only ASCII letters. It produces index keys, query
//!   words and the Tier-3 search blob.
//! - [`clean_text`] also keeps digits. Keyword extraction is built on it.
//!
//! Both lowercase, decompose (NFD), drop nonspacing marks, turn every other
//! character into a space and collapse whitespace.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_normalization::UnicodeNormalization;

/// Domain words too broad to anchor a match on their own.
static GENERIC_TERMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "problema",
        "problemas",
        "emocion",
        "emociones",
        "conflicto",
        "conflictos",
        "trastorno",
        "trastornos",
        "alteracion",
        "alteraciones",
        "sintoma",
        "sintomas",
    ]
    .into_iter()
    .collect()
});

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "se", "puede", "ser", "a", "la", "el", "los", "las", "un", "una", "de", "que", "y", "o",
        "es",
    ]
    .into_iter()
    .collect()
});

/// Normalize text into lowercase ASCII words separated by single spaces.
///
/// # Examples
///
/// ```
/// use glossa::search::normalize;
///
/// assert_eq!(normalize("  Estómago / Úlcera-2 "), "estomago ulcera");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    fold(text, |c| c.is_ascii_lowercase())
}

/// Like [`normalize`] but digits survive.
pub fn clean_text(text: &str) -> String {
    fold(text, |c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

fn fold(text: &str, keep: impl Fn(char) -> bool) -> String {
    let lowered = text.to_lowercase();
    let mapped: String = lowered
        .nfd()
        .filter(|c| !is_nonspacing_mark(*c))
        .map(|c| if keep(c) || c.is_whitespace() { c } else { ' ' })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Accents after NFD. Spacing and enclosing marks are not dropped here, so
/// they end up as word separators like any other non-letter.
fn is_nonspacing_mark(c: char) -> bool {
    get_general_category(c) == GeneralCategory::NonspacingMark
}

/// Strip a trailing `es`, or failing that a trailing `s`.
///
/// Deliberately naive: there is no length guard, so `"es"` becomes `""`.
pub fn singularize(word: &str) -> &str {
    if let Some(stem) = word.strip_suffix("es") {
        stem
    } else if let Some(stem) = word.strip_suffix('s') {
        stem
    } else {
        word
    }
}

/// Whether `word` (already normalized) is in the generic-term set.
pub fn is_generic(word: &str) -> bool {
    GENERIC_TERMS.contains(word)
}

/// Significant words of `text`, in order of appearance, duplicates kept.
pub fn extract_keywords(text: &str) -> Vec<String> {
    clean_text(text)
        .split_whitespace()
        .filter(|word| !STOPWORDS.contains(word) && word.len() > 3)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents_and_case() {
        assert_eq!(normalize("Estómago"), "estomago");
        assert_eq!(normalize("CORAZÓN Y PULMÓN"), "corazon y pulmon");
        assert_eq!(normalize("niño"), "nino");
    }

    #[test]
    fn test_normalize_replaces_digits_and_separators() {
        assert_eq!(normalize("covid-19"), "covid");
        assert_eq!(normalize("tipo_1/tipo_2"), "tipo tipo");
        assert_eq!(normalize("a-b_c/d"), "a b c d");
    }

    #[test]
    fn test_normalize_punctuation_becomes_space() {
        assert_eq!(normalize("¿Qué es la piel?"), "que es la piel");
        assert_eq!(normalize("l'estomac"), "l estomac");
    }

    #[test]
    fn test_normalize_spacing_and_enclosing_marks_split_words() {
        assert_eq!(normalize("a\u{0903}b"), "a b");
        assert_eq!(normalize("a\u{20DD}b"), "a b");
        assert_eq!(clean_text("x\u{0903}1"), "x 1");
        // Nonspacing marks are accents and vanish
        assert_eq!(normalize("e\u{0301}xito"), "exito");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  hígado \t\n  graso  "), "higado graso");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["Ácido Úrico (gota)", "tipo-2", "  ", "Ñandú", "x/y/z 42"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_clean_text_keeps_digits() {
        assert_eq!(clean_text("Covid-19"), "covid 19");
        assert_eq!(clean_text("¡Alergia, 2 veces!"), "alergia 2 veces");
    }

    #[test]
    fn test_singularize_rules() {
        assert_eq!(singularize("alergias"), "alergia");
        assert_eq!(singularize("emociones"), "emocion");
        assert_eq!(singularize("piel"), "piel");
        assert_eq!(singularize("estres"), "estr");
    }

    #[test]
    fn test_singularize_has_no_length_guard() {
        assert_eq!(singularize("es"), "");
        assert_eq!(singularize("s"), "");
        assert_eq!(singularize("as"), "a");
        assert_eq!(singularize(""), "");
    }

    #[test]
    fn test_is_generic() {
        assert!(is_generic("problema"));
        assert!(is_generic("sintomas"));
        assert!(!is_generic("estomago"));
        assert!(!is_generic("Problema"));
    }

    #[test]
    fn test_extract_keywords_drops_stopwords_and_short_words() {
        let keywords = extract_keywords("¿Qué sentido biológico tiene el covid?");
        assert_eq!(keywords, vec!["sentido", "biologico", "tiene", "covid"]);
    }

    #[test]
    fn test_extract_keywords_keeps_duplicates_and_digits() {
        let keywords = extract_keywords("piel piel 2024 de la piel");
        assert_eq!(keywords, vec!["piel", "piel", "2024", "piel"]);
    }

    #[test]
    fn test_extract_keywords_removes_stopword_puede() {
        let keywords = extract_keywords("puede ser alergia");
        assert_eq!(keywords, vec!["alergia"]);
    }
}
