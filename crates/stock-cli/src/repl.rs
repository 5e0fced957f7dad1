//! Interactive prompt

use crate::commands::{Command, CommandError};
use crate::render::{Panel, render_json};
use std::io::{self, BufRead, Write};
use stock_data::{MarketDataProvider, StockAnalyzer};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";
const PROMPT: &str = "🔎 Company or ticker: ";
const CONTINUE_PROMPT: &str = "Press Enter for a new query or [S] to exit: ";

/// How analyses are written to stdout
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub panel: Panel,
    pub json: bool,
}

impl Output {
    /// Analyse `query` and print the result; returns whether anything was found
    pub async fn show<P: MarketDataProvider>(&self, analyzer: &StockAnalyzer<P>, query: &str) -> bool {
        match analyzer.analyze(query).await {
            Ok(analysis) if self.json => match render_json(&analysis) {
                Ok(json) => {
                    println!("{json}");
                    true
                }
                Err(e) => {
                    eprintln!("{}", self.panel.error(&e));
                    false
                }
            },
            Ok(analysis) => {
                print!("{}", self.panel.render(&analysis));
                true
            }
            Err(e) if e.is_not_found() => {
                eprintln!("{}", self.panel.not_found(query));
                false
            }
            Err(e) => {
                tracing::error!(query, error = %e, "Lookup failed");
                eprintln!("{}", self.panel.error(&e));
                false
            }
        }
    }
}

/// Queries made during one run; never persisted
#[derive(Debug, Default)]
pub struct Session {
    history: Vec<String>,
}

impl Session {
    pub fn record(&mut self, query: &str) {
        self.history.push(query.to_string());
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn format_history(&self) -> String {
        if self.history.is_empty() {
            return "No queries yet.".to_string();
        }
        self.history
            .iter()
            .enumerate()
            .map(|(i, query)| format!("  {:>2}. {query}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Answer to the post-lookup prompt that ends the session
fn wants_exit(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("s")
}

/// Read one line; `None` on EOF
fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input))
}

/// Read-analyse-print loop until `S`, `/exit` or EOF
pub async fn run<P: MarketDataProvider>(analyzer: &StockAnalyzer<P>, output: Output) -> anyhow::Result<()> {
    println!("{}\n", output.panel.banner());

    let mut session = Session::default();

    loop {
        let Some(input) = read_line(PROMPT)? else {
            println!("\nGoodbye!");
            break;
        };

        match Command::parse(&input) {
            Ok(Command::Lookup { query }) => {
                session.record(&query);
                output.show(analyzer, &query).await;

                match read_line(&format!("\n{CONTINUE_PROMPT}"))? {
                    Some(answer) if !wants_exit(&answer) => println!(),
                    _ => {
                        println!("\nGoodbye!");
                        break;
                    }
                }
            }
            Ok(Command::History) => println!("{}\n", session.format_history()),
            Ok(Command::Clear) => {
                print!("{CLEAR_SCREEN}");
                println!("{}\n", output.panel.banner());
            }
            Ok(Command::Help) => println!("{}", Command::help_text()),
            Ok(Command::Exit) => {
                println!("Goodbye!");
                break;
            }
            Err(CommandError::Empty) => {}
            Err(e) => eprintln!("{}\n", output.panel.error(&e)),
        }
    }

    tracing::debug!(queries = session.history().len(), "Session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continue_prompt_answers() {
        assert!(wants_exit("S\n"));
        assert!(wants_exit(" s "));
        assert!(!wants_exit("\n"));
        assert!(!wants_exit("shell"));
    }

    #[test]
    fn test_session_history() {
        let mut session = Session::default();
        assert_eq!(session.format_history(), "No queries yet.");

        session.record("apple");
        session.record("PETR4.SA");
        assert_eq!(session.history(), ["apple", "PETR4.SA"]);
        assert_eq!(session.format_history(), "   1. apple\n   2. PETR4.SA");
    }
}
