//! Four-tier glossary retrieval.
//!
//! 1. Exact key / nucleus match over the exact index. A key equal to or
//!    contained in the query ends the search with that single entry. A
//!    nucleus (first word of a key) found among the query words is pushed to
//!    the front of the results.
//! 2. Word-index lookup of the remaining significant query words.
//! 3. Keyword scan of every entry's normalized text, anchored on a nucleus.
//!
//! Once Tier 1 finds entries, their cross-references restrict what Tiers 2
//! and 3 may add. Tiers 2 and 3 stop once `cap * 3` candidates are held; the
//! result is the first `cap` candidates.

use std::collections::{HashSet, VecDeque};

use serde::Serialize;
use tracing::debug;

use crate::glossary::Entry;

use super::index::GlossaryIndex;
use super::normalize::{extract_keywords, is_generic, normalize, singularize};

/// Candidates are gathered up to this multiple of the cap.
const CANDIDATE_FACTOR: usize = 3;
/// Entries whose normalized text reaches this length are skipped by the scan.
const MAX_BLOB_LEN: usize = 3000;
/// Nuclei shorter than this never anchor a Tier-1 match.
const MIN_NUCLEUS_LEN: usize = 5;
/// Query words must be longer than this to be looked up in the word index.
const MIN_LOOKUP_LEN: usize = 3;
/// Query words must be longer than this to anchor the keyword scan.
const MIN_SCAN_NUCLEUS_LEN: usize = 4;

/// How an entry was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", content = "detail", rename_all = "snake_case")]
pub enum MatchStrategy {
    /// An exact-index key equal to or contained in the query.
    Exact,
    /// The first word of the entry's term appears in the query.
    Nucleus,
    /// Word-index hit on the given (singularized) query word.
    Word(String),
    /// Keyword scan with the given number of keyword hits.
    Keywords(usize),
}

/// One retrieved entry with the strategy that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'a> {
    pub entry: &'a Entry,
    pub strategy: MatchStrategy,
}

/// Retrieve at most `cap` entries for `query`.
///
/// Never fails: a query with no matches yields an empty list. A `cap` of
/// zero is treated as one.
pub fn search<'a>(index: &'a GlossaryIndex, query: &str, cap: usize) -> Vec<&'a Entry> {
    search_traced(index, query, cap)
        .into_iter()
        .map(|hit| hit.entry)
        .collect()
}

/// Like [`search`], also reporting how each entry was found.
pub fn search_traced<'a>(index: &'a GlossaryIndex, query: &str, cap: usize) -> Vec<SearchHit<'a>> {
    let cap = cap.max(1);
    let mut candidates = collect_candidates(index, query, cap);
    candidates.truncate(cap);

    debug!(returned = candidates.len(), "Glossary search finished");

    candidates
        .into_iter()
        .map(|(id, strategy)| SearchHit {
            entry: index.entry(id),
            strategy,
        })
        .collect()
}

impl GlossaryIndex {
    /// See [`search`].
    pub fn search(&self, query: &str, cap: usize) -> Vec<&Entry> {
        search(self, query, cap)
    }

    /// See [`search_traced`].
    pub fn search_traced(&self, query: &str, cap: usize) -> Vec<SearchHit<'_>> {
        search_traced(self, query, cap)
    }
}

/// Normalized view of a query.
struct QueryPlan<'q> {
    raw: &'q str,
    normalized: String,
    words: Vec<String>,
    /// A short query built around one generic word, e.g. "problemas digestivos".
    intentional_generic: bool,
}

impl<'q> QueryPlan<'q> {
    fn new(raw: &'q str) -> Self {
        let normalized = normalize(raw);
        let words: Vec<String> = normalized.split_whitespace().map(str::to_string).collect();
        let generic_hits = words.iter().filter(|w| is_generic(w)).count();
        let intentional_generic = generic_hits == 1 && words.len() <= 2;

        Self {
            raw,
            normalized,
            words,
            intentional_generic,
        }
    }

    fn has_word(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Singularized words for the word-index tier.
    fn lookup_words(&self) -> Vec<&str> {
        self.words
            .iter()
            .filter(|w| w.len() > MIN_LOOKUP_LEN)
            .filter(|w| self.intentional_generic || !is_generic(w))
            .map(|w| singularize(w))
            .collect()
    }

    /// Anchors for the keyword tier: singularized words known to the word
    /// index, or failing that any long non-generic word.
    fn scan_nuclei(&self, index: &GlossaryIndex) -> HashSet<&str> {
        let real: HashSet<&str> = self
            .words
            .iter()
            .filter(|w| w.len() > MIN_SCAN_NUCLEUS_LEN)
            .map(|w| singularize(w))
            .filter(|n| index.has_word(n) && !is_generic(n))
            .collect();

        if !real.is_empty() {
            return real;
        }

        self.words
            .iter()
            .filter(|w| w.len() > MIN_SCAN_NUCLEUS_LEN && !is_generic(w))
            .map(String::as_str)
            .collect()
    }
}

/// Ordered, deduplicated candidate list.
#[derive(Default)]
struct Candidates {
    hits: VecDeque<(usize, MatchStrategy)>,
    seen: HashSet<usize>,
}

impl Candidates {
    fn len(&self) -> usize {
        self.hits.len()
    }

    fn contains(&self, id: usize) -> bool {
        self.seen.contains(&id)
    }

    fn push_front(&mut self, id: usize, strategy: MatchStrategy) {
        if self.seen.insert(id) {
            self.hits.push_front((id, strategy));
        }
    }

    fn push_back(&mut self, id: usize, strategy: MatchStrategy) {
        if self.seen.insert(id) {
            self.hits.push_back((id, strategy));
        }
    }

    fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.hits.iter().map(|(id, _)| *id)
    }

    fn into_vec(self) -> Vec<(usize, MatchStrategy)> {
        self.hits.into()
    }
}

/// Terms cross-referenced by the Tier-1 matches. Empty admits everything.
struct ReferenceGate<'a> {
    allowed: HashSet<&'a str>,
}

impl<'a> ReferenceGate<'a> {
    fn from_matches(index: &'a GlossaryIndex, ids: impl Iterator<Item = usize>) -> Self {
        let allowed = ids
            .flat_map(move |id| index.entry(id).cross_references.iter())
            .map(String::as_str)
            .collect();
        Self { allowed }
    }

    fn admits(&self, entry: &Entry) -> bool {
        self.allowed.is_empty() || self.allowed.contains(entry.term.as_str())
    }
}

/// Run all tiers and return the candidates before the final cut to `cap`.
pub(crate) fn collect_candidates(
    index: &GlossaryIndex,
    query: &str,
    cap: usize,
) -> Vec<(usize, MatchStrategy)> {
    let limit = cap.max(1).saturating_mul(CANDIDATE_FACTOR);
    let plan = QueryPlan::new(query);
    debug!(
        query = %plan.normalized,
        intentional_generic = plan.intentional_generic,
        "Searching glossary"
    );

    let mut candidates = Candidates::default();

    if let Some(id) = match_exact_or_nucleus(index, &plan, &mut candidates) {
        return vec![(id, MatchStrategy::Exact)];
    }

    let gate = ReferenceGate::from_matches(index, candidates.ids());
    if !gate.allowed.is_empty() {
        debug!(
            references = gate.allowed.len(),
            "Restricting later tiers to cross-references"
        );
    }

    match_words(index, &plan, &gate, limit, &mut candidates);
    match_keywords(index, &plan, &gate, limit, &mut candidates);

    candidates.into_vec()
}

/// Tier 1. Returns the id of a definitive exact hit.
fn match_exact_or_nucleus(
    index: &GlossaryIndex,
    plan: &QueryPlan<'_>,
    candidates: &mut Candidates,
) -> Option<usize> {
    for (key, id) in index.exact_bindings() {
        if plan.normalized.contains(key) {
            debug!(strategy = "exact", term = %index.entry(id).term, "Glossary hit");
            return Some(id);
        }

        let Some(nucleus) = key.split_whitespace().next() else {
            continue;
        };
        if nucleus.len() < MIN_NUCLEUS_LEN || is_generic(nucleus) {
            continue;
        }

        if plan.has_word(nucleus) {
            debug!(strategy = "nucleus", term = %index.entry(id).term, "Glossary hit");
            candidates.push_front(id, MatchStrategy::Nucleus);
        }
    }

    None
}

/// Tier 2.
fn match_words(
    index: &GlossaryIndex,
    plan: &QueryPlan<'_>,
    gate: &ReferenceGate<'_>,
    limit: usize,
    candidates: &mut Candidates,
) {
    'words: for word in plan.lookup_words() {
        let Some(ids) = index.word_ids(word) else {
            continue;
        };

        for &id in ids {
            if candidates.len() >= limit {
                break 'words;
            }
            let entry = index.entry(id);
            if candidates.contains(id) || !gate.admits(entry) {
                continue;
            }

            debug!(strategy = "word", word, term = %entry.term, "Glossary hit");
            candidates.push_back(id, MatchStrategy::Word(word.to_string()));
        }
    }
}

/// Tier 3.
fn match_keywords(
    index: &GlossaryIndex,
    plan: &QueryPlan<'_>,
    gate: &ReferenceGate<'_>,
    limit: usize,
    candidates: &mut Candidates,
) {
    let nuclei = plan.scan_nuclei(index);
    let keywords = extract_keywords(plan.raw);
    if nuclei.is_empty() || keywords.is_empty() {
        return;
    }

    let needles: Vec<String> = keywords.iter().map(|k| format!(" {} ", k)).collect();

    for (id, entry) in index.glossary().entries().iter().enumerate() {
        if candidates.len() >= limit {
            break;
        }
        if candidates.contains(id) || !gate.admits(entry) {
            continue;
        }

        let blob = index.blob(id);
        if blob.len() >= MAX_BLOB_LEN || !nuclei.iter().any(|n| blob.contains(n)) {
            continue;
        }

        let padded = format!(" {} ", blob);
        let hits = needles.iter().filter(|n| padded.contains(n.as_str())).count();
        if hits == 0 {
            continue;
        }

        debug!(strategy = "keywords", hits, term = %entry.term, "Glossary hit");
        candidates.push_back(id, MatchStrategy::Keywords(hits));
    }
}
