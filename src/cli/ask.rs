//! Question answering commands: `ask` and `console`.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use glossa::answer::{respond, Answer};
use glossa::providers::ollama::OllamaProvider;
use glossa::{Config, GlossaryStore};

use super::entry_cap;

const EXIT_WORDS: [&str; 3] = ["salir", "exit", "quit"];
const RELOAD_COMMAND: &str = ":reload";

/// Answer a single question and print the result.
pub(crate) async fn cmd_ask(config: &Config, question: &str, limit: Option<usize>) -> Result<()> {
    let store = GlossaryStore::open(&config.glossary.path);
    let provider =
        OllamaProvider::new(&config.ollama).with_context(|| "Failed to create Ollama client")?;

    let answer = respond(
        question,
        &store.snapshot(),
        &provider,
        entry_cap(config, limit),
    )
    .await
    .with_context(|| format!("Failed to answer with model '{}'", provider.model()))?;

    print_answer(&answer);
    Ok(())
}

/// Interactive loop: one question per line until EOF or an exit word.
pub(crate) async fn cmd_console(config: &Config, limit: Option<usize>) -> Result<()> {
    let store = GlossaryStore::open(&config.glossary.path);
    let provider =
        OllamaProvider::new(&config.ollama).with_context(|| "Failed to create Ollama client")?;
    let cap = entry_cap(config, limit);

    println!(
        "Glossa ({} entradas, modelo {})",
        store.snapshot().len(),
        provider.model()
    );
    println!("Escribe tu pregunta. 'salir' para terminar, ':reload' para recargar el diccionario.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {
                let input = input.trim();
                if input.is_empty() {
                    continue;
                }
                if is_exit(input) {
                    println!("¡Hasta luego!");
                    break;
                }
                if input == RELOAD_COMMAND {
                    match store.reload(&config.glossary.path) {
                        Ok(count) => println!("Diccionario recargado: {} entradas.", count),
                        Err(e) => eprintln!("No se pudo recargar el diccionario: {}", e),
                    }
                    println!();
                    continue;
                }

                match respond(input, &store.snapshot(), &provider, cap).await {
                    Ok(answer) => {
                        println!();
                        print_answer(&answer);
                        println!();
                    }
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        eprintln!();
                    }
                }
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }

    Ok(())
}

fn is_exit(input: &str) -> bool {
    EXIT_WORDS.iter().any(|w| input.eq_ignore_ascii_case(w))
}

fn print_answer(answer: &Answer) {
    println!("{}", answer.text);
    if let Some(sources) = format_sources(answer) {
        println!();
        println!("{}", sources);
    }
}

fn format_sources(answer: &Answer) -> Option<String> {
    if answer.sources.is_empty() {
        return None;
    }
    Some(format!("Fuentes: {}", answer.sources.join(", ")))
}
