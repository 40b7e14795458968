//! Question answering over the glossary.
//!
//! Retrieve entries, render them as context and ask the generator. When
//! retrieval finds nothing the generator is not called and a fixed fallback
//! answer is returned instead.

pub mod context;

use serde::Serialize;

use crate::error::Result;
use crate::providers::AnswerGenerator;
use crate::search::GlossaryIndex;

pub use context::{build_context, NO_CONTEXT};

/// Answer given when the glossary has nothing on the question.
pub const FALLBACK_ANSWER: &str = "No encontré información específica sobre ese tema en el diccionario. ¿Podrías reformular tu pregunta o usar términos diferentes?";

/// Result of answering one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    /// Generated (or fallback) text.
    pub text: String,
    /// Terms of the entries the answer is grounded on, in retrieval order.
    pub sources: Vec<String>,
    /// Whether any glossary entry was found.
    pub relevant: bool,
}

impl Answer {
    fn fallback() -> Self {
        Self {
            text: FALLBACK_ANSWER.to_string(),
            sources: Vec::new(),
            relevant: false,
        }
    }
}

/// Answer `question` from at most `cap` glossary entries.
pub async fn respond(
    question: &str,
    index: &GlossaryIndex,
    generator: &dyn AnswerGenerator,
    cap: usize,
) -> Result<Answer> {
    let entries = index.search(question, cap);
    if entries.is_empty() {
        tracing::info!("No glossary entries matched, answering with fallback");
        return Ok(Answer::fallback());
    }

    let sources: Vec<String> = entries.iter().map(|e| e.term.clone()).collect();
    let context = build_context(&entries);

    tracing::info!(
        provider = generator.name(),
        sources = sources.len(),
        "Generating answer"
    );
    let text = generator.generate(question, &context).await?;

    Ok(Answer {
        text,
        sources,
        relevant: true,
    })
}
