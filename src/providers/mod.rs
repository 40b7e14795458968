//! Answer generators.
//!
//! An [`AnswerGenerator`] turns a question plus the retrieved glossary
//! context into prose. Retrieval never depends on it; it only runs when the
//! search found something.

pub mod ollama;

use async_trait::async_trait;

use crate::error::Result;

pub use ollama::OllamaProvider;

/// System instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "Responde únicamente con la información proporcionada.";

/// Produces a natural-language answer from retrieved context.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Provider name for logs (e.g. "ollama").
    fn name(&self) -> &str;

    /// Generate an answer to `question` grounded in `context`.
    async fn generate(&self, question: &str, context: &str) -> Result<String>;
}

/// User prompt combining the retrieved context and the question.
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "Eres un asistente de biodescodificación.\n\n\
         INFORMACIÓN:\n{}\n\n\
         PREGUNTA: {}\n\n\
         Responde de forma completa, clara y estructurada, ciñéndote a la INFORMACIÓN.\n\
         No inventes nada y no te repitas.",
        context.trim_end(),
        question.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_contains_context_and_question() {
        let prompt = build_prompt("  ¿Qué es la gastritis? ", "--- Entrada 1: Gastritis ---\n\n");
        assert!(prompt.contains("INFORMACIÓN:\n--- Entrada 1: Gastritis ---\n\nPREGUNTA"));
        assert!(prompt.contains("PREGUNTA: ¿Qué es la gastritis?\n"));
        assert!(prompt.ends_with("No inventes nada y no te repitas."));
    }
}
