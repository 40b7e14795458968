//! Retrieval-only commands: `search` and `context`.

use anyhow::Result;

use glossa::answer::{build_context, NO_CONTEXT};
use glossa::search::{MatchStrategy, SearchHit};
use glossa::{Config, Glossary, GlossaryIndex};

use super::entry_cap;

fn open_index(config: &Config) -> GlossaryIndex {
    GlossaryIndex::build(Glossary::load_or_empty(&config.glossary.path))
}

/// Print the entries retrieved for `query`.
pub(crate) fn cmd_search(
    config: &Config,
    query: &str,
    limit: Option<usize>,
    explain: bool,
    json: bool,
) -> Result<()> {
    let index = open_index(config);
    let hits = index.search_traced(query, entry_cap(config, limit));

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("{}", NO_CONTEXT);
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        println!("{}", format_hit(i + 1, hit, explain));
    }

    Ok(())
}

/// Print the context block built from the entries retrieved for `query`.
pub(crate) fn cmd_context(config: &Config, query: &str, limit: Option<usize>) -> Result<()> {
    let index = open_index(config);
    let entries = index.search(query, entry_cap(config, limit));
    print!("{}", build_context(&entries));
    if entries.is_empty() {
        println!();
    }
    Ok(())
}

fn format_hit(rank: usize, hit: &SearchHit<'_>, explain: bool) -> String {
    let mut line = format!("{:>2}. {}", rank, hit.entry.term);
    if let (Some(start), Some(end)) = (hit.entry.page_start, hit.entry.page_end) {
        line.push_str(&format!(" (pp. {}-{})", start, end));
    }
    if explain {
        line.push_str(&format!("  [{}]", describe(&hit.strategy)));
    }
    line
}

fn describe(strategy: &MatchStrategy) -> String {
    match strategy {
        MatchStrategy::Exact => "exact".to_string(),
        MatchStrategy::Nucleus => "nucleus".to_string(),
        MatchStrategy::Word(word) => format!("word '{}'", word),
        MatchStrategy::Keywords(hits) => format!("keywords x{}", hits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa::Entry;

    fn entry(term: &str, pages: Option<(u32, u32)>) -> Entry {
        let mut entry = Entry::new(term);
        if let Some((start, end)) = pages {
            entry.page_start = Some(start);
            entry.page_end = Some(end);
        }
        entry
    }

    #[test]
    fn test_format_hit_plain() {
        let entry = entry("Gastritis", None);
        let hit = SearchHit {
            entry: &entry,
            strategy: MatchStrategy::Exact,
        };
        assert_eq!(format_hit(1, &hit, false), " 1. Gastritis");
    }

    #[test]
    fn test_format_hit_with_pages_and_strategy() {
        let entry = entry("Cálculo biliar", Some((120, 121)));
        let hit = SearchHit {
            entry: &entry,
            strategy: MatchStrategy::Word("calculo".to_string()),
        };
        assert_eq!(
            format_hit(12, &hit, true),
            "12. Cálculo biliar (pp. 120-121)  [word 'calculo']"
        );
    }

    #[test]
    fn test_describe_keywords() {
        assert_eq!(describe(&MatchStrategy::Keywords(2)), "keywords x2");
        assert_eq!(describe(&MatchStrategy::Nucleus), "nucleus");
    }
}
