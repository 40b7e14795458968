//! Renders retrieved entries as the context block handed to the generator.

use crate::glossary::Entry;

/// Context text used when retrieval found nothing.
pub const NO_CONTEXT: &str = "No se encontró información relevante en el diccionario.";

const HEADER: &str = "INFORMACIÓN DEL DICCIONARIO DE BIODESCODIFICACIÓN:";
const MISSING: &str = "N/A";

/// Format entries as numbered, labeled blocks.
pub fn build_context(entries: &[&Entry]) -> String {
    if entries.is_empty() {
        return NO_CONTEXT.to_string();
    }

    let mut out = format!("{}\n\n", HEADER);
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!("--- Entrada {}: {} ---\n", i + 1, or_missing(&entry.term)));
        out.push_str(&format!("Definición: {}\n", or_missing(&entry.definition)));
        out.push_str(&format!("Técnico: {}\n", or_missing(&entry.technical_notes)));
        out.push_str(&format!(
            "Sentido Biológico: {}\n",
            or_missing(&entry.biological_sense)
        ));
        out.push_str(&format!("Conflicto: {}\n", or_missing(&entry.conflict_notes)));
        if !entry.cross_references.is_empty() {
            out.push_str(&format!(
                "Referencias: {}\n",
                entry.cross_references.join(", ")
            ));
        }
        out.push('\n');
    }
    out
}

fn or_missing(value: &str) -> &str {
    if value.trim().is_empty() {
        MISSING
    } else {
        value
    }
}
