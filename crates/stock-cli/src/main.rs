//! stock-panel: buy / neutral / avoid panel for a company or ticker
//!
//! # Usage
//!
//! ```bash
//! # One-shot
//! stock-panel petrobras
//! stock-panel --json AAPL
//!
//! # Interactive prompt
//! stock-panel
//! ```
//!
//! `STOCK_PANEL_*` environment variables set defaults; flags override them.

mod commands;
mod render;
mod repl;

use clap::Parser;
use render::Panel;
use repl::Output;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;
use stock_data::{AnalyzerConfig, StockAnalyzer, YahooFinanceClient};

#[derive(Parser, Debug)]
#[command(name = "stock-panel", version)]
#[command(about = "Buy / neutral / avoid panel for a company or ticker", long_about = None)]
struct Args {
    /// Company name or ticker; starts the interactive prompt when omitted
    query: Vec<String>,

    /// Print the analysis as JSON
    #[arg(long)]
    json: bool,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,

    /// Regional suffix used on retry (e.g. .SA)
    #[arg(long)]
    suffix: Option<String>,

    /// Price history range (e.g. 1mo, 3mo, 1y)
    #[arg(long)]
    range: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

impl Args {
    fn config(&self) -> anyhow::Result<AnalyzerConfig> {
        let mut config = AnalyzerConfig::default().with_env()?;

        if let Some(suffix) = &self.suffix {
            config.regional_suffix.clone_from(suffix);
        }
        if let Some(range) = &self.range {
            config.history_range.clone_from(range);
        }
        if let Some(secs) = self.timeout {
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    stock_utils::init_tracing("warn,stock_cli=info");

    let args = Args::parse();
    let config = args.config()?;
    tracing::debug!(?config, "Loaded configuration");

    let color = !args.no_color && std::io::stdout().is_terminal();
    let output = Output {
        panel: Panel::new(color),
        json: args.json,
    };

    let client = YahooFinanceClient::new(&config)?;
    let analyzer = StockAnalyzer::new(client, config);

    if args.query.is_empty() {
        repl::run(&analyzer, output).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let query = args.query.join(" ");
    if output.show(&analyzer, &query).await {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
