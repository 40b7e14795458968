//! `check`: strict glossary validation.

use anyhow::{Context, Result};

use glossa::search::IndexStats;
use glossa::{Config, Glossary, GlossaryIndex};

const MAX_LISTED: usize = 10;

/// Load the glossary strictly and print index statistics.
///
/// Fails (non-zero exit) when the file is missing or malformed, unlike the
/// query commands which fall back to an empty glossary.
pub(crate) fn cmd_check(config: &Config) -> Result<()> {
    let path = &config.glossary.path;
    let glossary = Glossary::load(path)
        .with_context(|| format!("Glossary check failed for {}", path.display()))?;

    let incomplete: Vec<String> = glossary
        .entries()
        .iter()
        .filter(|e| !e.is_complete())
        .map(|e| e.term.clone())
        .collect();

    let index = GlossaryIndex::build(glossary);
    println!("Glossary: {}", path.display());
    println!("{}", format_stats(&index.stats()));

    if !incomplete.is_empty() {
        println!();
        println!("Incomplete entries:");
        for term in incomplete.iter().take(MAX_LISTED) {
            let shown = if term.trim().is_empty() {
                "(blank term)"
            } else {
                term.as_str()
            };
            println!("  - {}", shown);
        }
        if incomplete.len() > MAX_LISTED {
            println!("  ... and {} more", incomplete.len() - MAX_LISTED);
        }
    }

    Ok(())
}

fn format_stats(stats: &IndexStats) -> String {
    [
        format!("  Entries:          {}", stats.entries),
        format!("  Complete:         {}", stats.complete_entries),
        format!("  Exact keys:       {}", stats.exact_keys),
        format!("  Indexed words:    {}", stats.indexed_words),
        format!("  Blank terms:      {}", stats.blank_terms),
        format!("  Shadowed terms:   {}", stats.shadowed_terms),
    ]
    .join("\n")
}
