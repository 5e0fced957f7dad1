//! Terminal rendering of an analysis

use chrono::Local;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table, presets};
use stock_core::{Signal, Tier};
use stock_data::Analysis;

const RULE_WIDTH: usize = 72;
const SUMMARY_WIDTH: usize = 70;
const SUMMARY_WORDS: usize = 80;
const FACTOR_WIDTH: usize = 68;
const CELL_WIDTH: usize = 28;
const BAR_CELLS: usize = 20;
const SPARK_POINTS: usize = 40;
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const DISCLAIMER: &str = "⚠️  For educational use only. This is not professional financial advice.\n   Consult a specialist before investing.";

#[derive(Debug, Clone, Copy)]
enum Style {
    Frame,
    Heading,
    Label,
    Value,
    Good,
    Warn,
    Bad,
    Muted,
}

/// Renders analyses as a boxed text panel
#[derive(Debug, Clone, Copy)]
pub struct Panel {
    color: bool,
}

impl Panel {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if !self.color {
            return text.to_string();
        }
        match style {
            Style::Frame => text.blue().bold().to_string(),
            Style::Heading => text.yellow().bold().to_string(),
            Style::Label => text.bright_black().to_string(),
            Style::Value => text.white().bold().to_string(),
            Style::Good => text.green().bold().to_string(),
            Style::Warn => text.yellow().bold().to_string(),
            Style::Bad => text.red().bold().to_string(),
            Style::Muted => text.bright_black().to_string(),
        }
    }

    fn rule(&self, left: char, right: char) -> String {
        let line: String = std::iter::once(left)
            .chain(std::iter::repeat_n('═', RULE_WIDTH))
            .chain(std::iter::once(right))
            .collect();
        self.paint(&line, Style::Frame)
    }

    fn row(&self, content: &str) -> String {
        format!("{} {content}", self.paint("║", Style::Frame))
    }

    /// Render the full panel
    pub fn render(&self, analysis: &Analysis) -> String {
        let mut lines = Vec::new();

        lines.push(self.rule('╔', '╗'));
        self.header(analysis, &mut lines);
        lines.push(self.rule('╠', '╣'));
        self.price(analysis, &mut lines);
        lines.push(self.rule('╠', '╣'));
        self.fundamentals(analysis, &mut lines);
        lines.push(self.rule('╠', '╣'));
        self.recommendation(analysis, &mut lines);
        lines.push(self.rule('╠', '╣'));
        self.factors(analysis, &mut lines);
        lines.push(self.rule('╠', '╣'));
        self.history(analysis, &mut lines);

        if let Some(summary) = analysis.data.snapshot.long_business_summary.as_deref() {
            let wrapped = wrap_summary(summary, SUMMARY_WIDTH, SUMMARY_WORDS);
            if !wrapped.is_empty() {
                lines.push(self.rule('╠', '╣'));
                lines.push(self.row(&self.paint("📝 About the company:", Style::Heading)));
                for line in wrapped {
                    lines.push(self.row(&self.paint(&format!("  {line}"), Style::Muted)));
                }
            }
        }

        lines.push(self.rule('╚', '╝'));
        lines.push(String::new());
        lines.push(self.paint(DISCLAIMER, Style::Muted));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Message for a query that matched nothing, with a hint
    pub fn not_found(&self, query: &str) -> String {
        format!(
            "{}\n{}",
            self.paint(&format!("❌ Company '{query}' not found."), Style::Bad),
            self.paint(
                "💡 Tip: try the ticker directly (e.g. AAPL, PETR4.SA)",
                Style::Warn
            ),
        )
    }

    pub fn error(&self, error: &dyn std::fmt::Display) -> String {
        self.paint(&format!("❌ Error: {error}"), Style::Bad)
    }

    pub fn banner(&self) -> String {
        let title = "📊 stock-panel: buy / neutral / avoid at a glance";
        [
            self.rule('╔', '╗'),
            self.row(&self.paint(title, Style::Value)),
            self.row(&self.paint("Type a company name or ticker, /help for commands", Style::Muted)),
            self.rule('╚', '╝'),
        ]
        .join("\n")
    }

    fn header(&self, analysis: &Analysis, lines: &mut Vec<String>) {
        let snapshot = &analysis.data.snapshot;
        let symbol = analysis.symbol();
        let name = snapshot.display_name(symbol);
        let sector = snapshot.sector.as_deref().unwrap_or("N/A");
        let retrieved = analysis
            .generated_at
            .with_timezone(&Local)
            .format("%d/%m/%Y %H:%M:%S")
            .to_string();

        lines.push(self.row(&format!("🏢 {}", self.paint(name, Style::Value))));
        lines.push(self.row(&format!(
            "{} {}  {} {}",
            self.paint("Ticker:", Style::Label),
            self.paint(symbol, Style::Value),
            self.paint("Sector:", Style::Label),
            self.paint(sector, Style::Value),
        )));
        lines.push(self.row(&format!(
            "{} {}",
            self.paint("Retrieved:", Style::Label),
            self.paint(&retrieved, Style::Value),
        )));
    }

    fn price(&self, analysis: &Analysis, lines: &mut Vec<String>) {
        let snapshot = &analysis.data.snapshot;
        let currency = snapshot.currency.as_deref().unwrap_or("USD");
        let symbol = currency_symbol(currency);
        let price = snapshot.price().unwrap_or_default();
        let change = snapshot.regular_market_change_percent.unwrap_or_default();

        let (arrow, style) = if change >= 0.0 {
            ('▲', Style::Good)
        } else {
            ('▼', Style::Bad)
        };

        lines.push(self.row(&format!(
            "💰 {} {} {}   {}",
            self.paint("Price:", Style::Label),
            self.paint(&format!("{symbol}{price:.2}"), Style::Good),
            currency,
            self.paint(&format!("{arrow} {change:+.2}%"), style),
        )));
    }

    fn fundamentals(&self, analysis: &Analysis, lines: &mut Vec<String>) {
        let snapshot = &analysis.data.snapshot;
        let symbol = currency_symbol(snapshot.currency.as_deref().unwrap_or("USD"));

        let price_or_na =
            |value: Option<f64>| value.map_or_else(|| "N/A".to_string(), |v| format!("{symbol}{v:.2}"));
        let pe = snapshot
            .pe_ratio()
            .map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"));
        let dividend = format!("{:.2}%", snapshot.dividend_yield.unwrap_or_default() * 100.0);
        let employees = snapshot
            .full_time_employees
            .filter(|v| *v > 0.0)
            .map_or_else(|| "N/A".to_string(), |v| group_thousands(&format!("{v:.0}")));
        let text = |value: Option<&str>| truncate(value.unwrap_or("N/A"), CELL_WIDTH);

        let rows = [
            [
                "Market Cap".to_string(),
                format_number(snapshot.market_cap, symbol),
                "52w Low".to_string(),
                price_or_na(snapshot.fifty_two_week_low),
            ],
            [
                "52w High".to_string(),
                price_or_na(snapshot.fifty_two_week_high),
                "Volume".to_string(),
                format_number(snapshot.regular_market_volume, ""),
            ],
            ["P/E Ratio".to_string(), pe, "Div. Yield".to_string(), dividend],
            [
                "Country".to_string(),
                text(snapshot.country.as_deref()),
                "Employees".to_string(),
                employees,
            ],
            [
                "Industry".to_string(),
                text(snapshot.industry.as_deref()),
                "Website".to_string(),
                text(snapshot.website.as_deref()),
            ],
        ];

        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Disabled);
        for row in rows {
            table.add_row(row);
        }

        // Grid cells stay unstyled so escape codes never skew column widths
        for line in table.lines() {
            lines.push(self.row(line.trim_end()));
        }
    }

    fn recommendation(&self, analysis: &Analysis, lines: &mut Vec<String>) {
        let result = &analysis.result;
        let style = tier_style(result.tier);
        let (filled, empty) = score_cells(result.score);

        lines.push(self.row(&format!(
            "🎯 {}  {}   {} {}",
            self.paint("RECOMMENDATION:", Style::Value),
            self.paint(&format!("{} {}", tier_badge(result.tier), result.tier), style),
            self.paint("Score:", Style::Value),
            self.paint(&format!("{:.0}/100", result.score), style),
        )));
        lines.push(self.row(&format!(
            "{}{}",
            self.paint(&"█".repeat(filled), style),
            self.paint(&"░".repeat(empty), Style::Muted),
        )));
    }

    fn factors(&self, analysis: &Analysis, lines: &mut Vec<String>) {
        lines.push(self.row(&self.paint("📋 Factors analysed:", Style::Heading)));
        for factor in &analysis.result.factors {
            let style = match factor.signal {
                Signal::Positive => Style::Good,
                Signal::Negative => Style::Bad,
                Signal::Neutral => Style::Muted,
            };
            let text = truncate(&factor.to_string(), FACTOR_WIDTH);
            lines.push(self.row(&self.paint(&format!(" • {text}"), style)));
        }
    }

    fn history(&self, analysis: &Analysis, lines: &mut Vec<String>) {
        let data = &analysis.data;
        let closes: Vec<f64> = data.history.iter().map(|p| p.close).collect();

        let (Some(first), Some(last)) = (closes.first(), closes.last()) else {
            lines.push(self.row(&format!(
                "📈 {} {}",
                self.paint("Price history:", Style::Label),
                self.paint("unavailable", Style::Muted),
            )));
            return;
        };

        let symbol = currency_symbol(data.snapshot.currency.as_deref().unwrap_or("USD"));
        let change = data.history_change_percent().unwrap_or_default();
        let style = if change >= 0.0 { Style::Good } else { Style::Bad };

        lines.push(self.row(&format!(
            "📈 {} {symbol}{first:.2} → {symbol}{last:.2} ({} sessions)  {}",
            self.paint("Price history:", Style::Label),
            closes.len(),
            self.paint(&format!("{change:+.2}%"), style),
        )));
        lines.push(self.row(&self.paint(&sparkline(&closes), style)));
    }
}

/// Pretty JSON of the whole analysis
pub fn render_json(analysis: &Analysis) -> serde_json::Result<String> {
    serde_json::to_string_pretty(analysis)
}

fn tier_style(tier: Tier) -> Style {
    match tier {
        Tier::Buy => Style::Good,
        Tier::Neutral => Style::Warn,
        Tier::Avoid => Style::Bad,
    }
}

fn tier_badge(tier: Tier) -> &'static str {
    match tier {
        Tier::Buy => "🟢",
        Tier::Neutral => "🟡",
        Tier::Avoid => "🔴",
    }
}

/// Display symbol for an ISO currency code
pub fn currency_symbol(currency: &str) -> &'static str {
    match currency {
        "BRL" => "R$",
        "EUR" => "€",
        _ => "$",
    }
}

/// Compact number: `T`/`B`/`M` suffixes, otherwise grouped with two decimals
pub fn format_number(value: Option<f64>, prefix: &str) -> String {
    let Some(value) = value else {
        return "N/A".to_string();
    };

    let magnitude = value.abs();
    if magnitude >= 1e12 {
        format!("{prefix}{:.2}T", value / 1e12)
    } else if magnitude >= 1e9 {
        format!("{prefix}{:.2}B", value / 1e9)
    } else if magnitude >= 1e6 {
        format!("{prefix}{:.2}M", value / 1e6)
    } else {
        format!("{prefix}{}", group_thousands(&format!("{value:.2}")))
    }
}

/// Insert `,` separators into the integer part of a formatted number
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = formatted
        .strip_prefix('-')
        .map_or(("", formatted), |rest| ("-", rest));
    let (int_part, frac_part) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Filled and empty cells of the 20-cell score bar
pub fn score_cells(score: f64) -> (usize, usize) {
    let filled = ((score / 5.0).floor().max(0.0) as usize).min(BAR_CELLS);
    (filled, BAR_CELLS - filled)
}

/// Plain score bar, `█` filled and `░` empty
pub fn score_bar(score: f64) -> String {
    let (filled, empty) = score_cells(score);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Block sparkline of at most 40 evenly sampled closes
pub fn sparkline(closes: &[f64]) -> String {
    if closes.is_empty() {
        return String::new();
    }

    let sampled: Vec<f64> = if closes.len() > SPARK_POINTS {
        (0..SPARK_POINTS)
            .map(|i| closes[i * (closes.len() - 1) / (SPARK_POINTS - 1)])
            .collect()
    } else {
        closes.to_vec()
    };

    let min = sampled.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sampled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let top = SPARK_LEVELS.len() - 1;

    sampled
        .iter()
        .map(|close| {
            if span <= 0.0 {
                SPARK_LEVELS[top / 2]
            } else {
                let level = ((close - min) / span * top as f64).round() as usize;
                SPARK_LEVELS[level.min(top)]
            }
        })
        .collect()
}

/// Greedy word wrap of the first `max_words` words to `width` columns
pub fn wrap_summary(text: &str, width: usize, max_words: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace().take(max_words) {
        let needed = current.chars().count() + word.chars().count() + 1;
        if !current.is_empty() && needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cut `text` to `max` characters
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
