//! Command parsing for the interactive prompt

use thiserror::Error;

/// Errors raised while parsing prompt input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty input")]
    Empty,

    #[error("Unknown command: /{0} (type /help)")]
    Unknown(String),
}

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Analyse a company name or ticker
    Lookup { query: String },
    /// Show the queries made this session
    History,
    /// Clear the screen
    Clear,
    /// Show help
    Help,
    /// Leave the prompt
    Exit,
}

impl Command {
    /// Parse a command from user input
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(CommandError::Empty);
        }

        // Bare one-letter menu keys
        match input.to_lowercase().as_str() {
            "h" => return Ok(Command::History),
            "l" => return Ok(Command::Clear),
            "s" => return Ok(Command::Exit),
            _ => {}
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Ok(Command::Lookup {
                query: input.to_string(),
            });
        };

        let cmd = rest.split_whitespace().next().unwrap_or_default().to_lowercase();

        match cmd.as_str() {
            "history" | "h" => Ok(Command::History),
            "clear" | "cls" | "l" => Ok(Command::Clear),
            "help" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" | "s" => Ok(Command::Exit),
            _ => Err(CommandError::Unknown(cmd)),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
Type a company name or ticker to analyse it:
  apple, petrobras, itaú, AAPL, PETR4.SA

Commands:
  H   /history   (/h)         queries made this session
  L   /clear     (/l, /cls)   clear the screen
      /help      (/?)         this help
  S   /exit      (/q, /s)     leave
"
    }
}
