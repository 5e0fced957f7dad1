//! Weighted-factor recommendation scoring
//!
//! Scoring starts at [`BASE_SCORE`] and applies five independent additive
//! adjustments (P/E, 52-week position, dividend yield, revenue growth,
//! profit margin). Each adjustment is skipped when its inputs are missing.
//! The total is clamped to `0..=100` and bucketed into a [`Tier`].

use crate::error::Result;
use crate::snapshot::QuoteSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score every snapshot starts from
pub const BASE_SCORE: f64 = 50.0;
/// Lowest score that maps to [`Tier::Buy`]
pub const BUY_THRESHOLD: f64 = 70.0;
/// Lowest score that maps to [`Tier::Neutral`]
pub const NEUTRAL_THRESHOLD: f64 = 50.0;

const INSUFFICIENT_DATA: &str = "Insufficient data for detailed analysis.";

/// Recommendation bucket derived from the clamped score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Buy,
    Neutral,
    Avoid,
}

impl Tier {
    /// Bucket a clamped score
    pub fn from_score(score: f64) -> Self {
        if score >= BUY_THRESHOLD {
            Self::Buy
        } else if score >= NEUTRAL_THRESHOLD {
            Self::Neutral
        } else {
            Self::Avoid
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Neutral => "NEUTRAL",
            Self::Avoid => "AVOID",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which rule produced a factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    PeRatio,
    RangePosition,
    DividendYield,
    RevenueGrowth,
    ProfitMargin,
    /// Placeholder shown when no rule fired; never scored
    InsufficientData,
}

/// Marker attached to a factor for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Positive,
    Negative,
    Neutral,
}

impl Signal {
    pub fn marker(self) -> char {
        match self {
            Self::Positive => '✓',
            Self::Negative => '✗',
            Self::Neutral => '~',
        }
    }
}

/// One contributing factor of a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub kind: FactorKind,
    pub signal: Signal,
    /// Points added to (or removed from) the score
    pub adjustment: f64,
    pub description: String,
}

impl Factor {
    fn new(kind: FactorKind, signal: Signal, adjustment: f64, description: String) -> Self {
        Self {
            kind,
            signal,
            adjustment,
            description,
        }
    }

    fn insufficient_data() -> Self {
        Self::new(
            FactorKind::InsufficientData,
            Signal::Neutral,
            0.0,
            INSUFFICIENT_DATA.to_string(),
        )
    }

    pub fn is_insufficient_data(&self) -> bool {
        self.kind == FactorKind::InsufficientData
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_insufficient_data() {
            f.write_str(&self.description)
        } else {
            write!(f, "{} {}", self.description, self.signal.marker())
        }
    }
}

/// Outcome of scoring one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub tier: Tier,
    /// Clamped to `0..=100`
    pub score: f64,
    /// Factors in evaluation order
    pub factors: Vec<Factor>,
}

impl ScoreResult {
    /// Factor lines as shown to the user
    pub fn descriptions(&self) -> Vec<String> {
        self.factors.iter().map(ToString::to_string).collect()
    }

    /// Sum of all adjustments before clamping
    pub fn raw_adjustment(&self) -> f64 {
        self.factors
            .iter()
            .filter(|f| !f.is_insufficient_data())
            .map(|f| f.adjustment)
            .sum()
    }

    /// Whether only the insufficient-data placeholder is present
    pub fn is_insufficient(&self) -> bool {
        matches!(self.factors.as_slice(), [only] if only.is_insufficient_data())
    }
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn pe_factor(snapshot: &QuoteSnapshot) -> Option<Factor> {
    let pe = snapshot.pe_ratio()?;

    let factor = if pe < 15.0 {
        Factor::new(
            FactorKind::PeRatio,
            Signal::Positive,
            15.0,
            format!("Low P/E ({pe:.1}) → cheap stock"),
        )
    } else if pe < 25.0 {
        Factor::new(
            FactorKind::PeRatio,
            Signal::Neutral,
            5.0,
            format!("Moderate P/E ({pe:.1}) → fair price"),
        )
    } else if pe < 40.0 {
        Factor::new(
            FactorKind::PeRatio,
            Signal::Negative,
            -5.0,
            format!("High P/E ({pe:.1}) → expensive stock"),
        )
    } else {
        Factor::new(
            FactorKind::PeRatio,
            Signal::Negative,
            -15.0,
            format!("Very high P/E ({pe:.1}) → elevated risk"),
        )
    };
    Some(factor)
}

#[allow(clippy::float_cmp)]
fn range_factor(snapshot: &QuoteSnapshot) -> Option<Factor> {
    let low = non_zero(snapshot.fifty_two_week_low)?;
    let high = non_zero(snapshot.fifty_two_week_high)?;
    let price = snapshot.price()?;

    if high == low {
        return None;
    }

    let pos = (price - low) / (high - low) * 100.0;

    let factor = if pos < 30.0 {
        Factor::new(
            FactorKind::RangePosition,
            Signal::Positive,
            15.0,
            format!("Near 52-week low ({pos:.0}%) → opportunity"),
        )
    } else if pos > 80.0 {
        Factor::new(
            FactorKind::RangePosition,
            Signal::Negative,
            -10.0,
            format!("Near 52-week high ({pos:.0}%) → correction risk"),
        )
    } else {
        Factor::new(
            FactorKind::RangePosition,
            Signal::Neutral,
            0.0,
            format!("52-week position: {pos:.0}% of range"),
        )
    };
    Some(factor)
}

fn dividend_factor(snapshot: &QuoteSnapshot) -> Option<Factor> {
    let pct = non_zero(snapshot.dividend_yield)? * 100.0;

    if pct > 5.0 {
        Some(Factor::new(
            FactorKind::DividendYield,
            Signal::Positive,
            10.0,
            format!("High dividend yield ({pct:.2}%) → passive income"),
        ))
    } else if pct > 2.0 {
        Some(Factor::new(
            FactorKind::DividendYield,
            Signal::Neutral,
            5.0,
            format!("OK dividend yield ({pct:.2}%)"),
        ))
    } else {
        None
    }
}

fn growth_factor(snapshot: &QuoteSnapshot) -> Option<Factor> {
    let growth = non_zero(snapshot.revenue_growth)?;

    if growth > 0.10 {
        Some(Factor::new(
            FactorKind::RevenueGrowth,
            Signal::Positive,
            10.0,
            format!("Revenue growth {:.1}% → expansion", growth * 100.0),
        ))
    } else if growth < 0.0 {
        Some(Factor::new(
            FactorKind::RevenueGrowth,
            Signal::Negative,
            -10.0,
            format!("Revenue decline {:.1}% → warning", growth * 100.0),
        ))
    } else {
        None
    }
}

fn margin_factor(snapshot: &QuoteSnapshot) -> Option<Factor> {
    let margin = non_zero(snapshot.profit_margins)?;

    if margin > 0.20 {
        Some(Factor::new(
            FactorKind::ProfitMargin,
            Signal::Positive,
            10.0,
            format!("High profit margin ({:.1}%)", margin * 100.0),
        ))
    } else if margin < 0.0 {
        Some(Factor::new(
            FactorKind::ProfitMargin,
            Signal::Negative,
            -10.0,
            format!("Net loss ({:.1}%)", margin * 100.0),
        ))
    } else {
        None
    }
}

/// Score a snapshot.
///
/// Fails only when the snapshot holds an invalid numeric value; missing
/// fields simply skip their rule.
pub fn score(snapshot: &QuoteSnapshot) -> Result<ScoreResult> {
    snapshot.validate()?;

    let mut factors: Vec<Factor> = [
        pe_factor(snapshot),
        range_factor(snapshot),
        dividend_factor(snapshot),
        growth_factor(snapshot),
        margin_factor(snapshot),
    ]
    .into_iter()
    .flatten()
    .collect();

    let raw = BASE_SCORE + factors.iter().map(|f| f.adjustment).sum::<f64>();
    let score = raw.clamp(0.0, 100.0);
    let tier = Tier::from_score(score);

    tracing::debug!(raw, score, %tier, factors = factors.len(), "Scored snapshot");

    if factors.is_empty() {
        factors.push(Factor::insufficient_data());
    }

    Ok(ScoreResult {
        tier,
        score,
        factors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(result: &ScoreResult) -> Vec<FactorKind> {
        result.factors.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::from_score(100.0), Tier::Buy);
        assert_eq!(Tier::from_score(70.0), Tier::Buy);
        assert_eq!(Tier::from_score(69.9), Tier::Neutral);
        assert_eq!(Tier::from_score(50.0), Tier::Neutral);
        assert_eq!(Tier::from_score(49.9), Tier::Avoid);
        assert_eq!(Tier::from_score(0.0), Tier::Avoid);
        assert_eq!(Tier::Buy.to_string(), "BUY");
    }

    #[test]
    fn test_pe_thresholds() {
        let cases = [
            (10.0, 15.0, Signal::Positive),
            (15.0, 5.0, Signal::Neutral),
            (24.9, 5.0, Signal::Neutral),
            (25.0, -5.0, Signal::Negative),
            (39.9, -5.0, Signal::Negative),
            (40.0, -15.0, Signal::Negative),
            (-4.0, 15.0, Signal::Positive),
        ];
        for (pe, adjustment, signal) in cases {
            let snapshot = QuoteSnapshot {
                trailing_pe: Some(pe),
                ..Default::default()
            };
            let factor = pe_factor(&snapshot).unwrap();
            assert_eq!(factor.adjustment, adjustment, "pe {pe}");
            assert_eq!(factor.signal, signal, "pe {pe}");
        }
    }

    #[test]
    fn test_forward_pe_used_when_trailing_missing() {
        let snapshot = QuoteSnapshot {
            forward_pe: Some(30.0),
            ..Default::default()
        };
        let result = score(&snapshot).unwrap();
        assert_eq!(result.score, 45.0);
        assert_eq!(result.factors[0].description, "High P/E (30.0) → expensive stock");
    }

    #[test]
    fn test_range_position_bands() {
        let at = |price: f64| QuoteSnapshot {
            fifty_two_week_low: Some(100.0),
            fifty_two_week_high: Some(200.0),
            current_price: Some(price),
            ..Default::default()
        };

        let near_low = range_factor(&at(110.0)).unwrap();
        assert_eq!(near_low.adjustment, 15.0);
        assert_eq!(near_low.to_string(), "Near 52-week low (10%) → opportunity ✓");

        let near_high = range_factor(&at(190.0)).unwrap();
        assert_eq!(near_high.adjustment, -10.0);
        assert_eq!(near_high.signal, Signal::Negative);

        let middle = range_factor(&at(150.0)).unwrap();
        assert_eq!(middle.adjustment, 0.0);
        assert_eq!(middle.to_string(), "52-week position: 50% of range ~");
    }

    #[test]
    fn test_range_uses_market_price_fallback() {
        let snapshot = QuoteSnapshot {
            fifty_two_week_low: Some(10.0),
            fifty_two_week_high: Some(20.0),
            regular_market_price: Some(19.5),
            ..Default::default()
        };
        let result = score(&snapshot).unwrap();
        assert_eq!(result.score, 40.0);
        assert_eq!(result.tier, Tier::Avoid);
    }

    #[test]
    fn test_range_skipped_when_high_equals_low() {
        let snapshot = QuoteSnapshot {
            fifty_two_week_low: Some(100.0),
            fifty_two_week_high: Some(100.0),
            current_price: Some(100.0),
            ..Default::default()
        };
        let result = score(&snapshot).unwrap();
        assert_eq!(result.score, 50.0);
        assert!(result.is_insufficient());
    }

    #[test]
    fn test_range_skipped_without_price() {
        let snapshot = QuoteSnapshot {
            fifty_two_week_low: Some(100.0),
            fifty_two_week_high: Some(200.0),
            ..Default::default()
        };
        assert!(range_factor(&snapshot).is_none());
    }

    #[test]
    fn test_dividend_bands() {
        let with_yield = |dy: f64| QuoteSnapshot {
            dividend_yield: Some(dy),
            ..Default::default()
        };
        assert_eq!(dividend_factor(&with_yield(0.06)).unwrap().adjustment, 10.0);
        assert_eq!(dividend_factor(&with_yield(0.05)).unwrap().adjustment, 5.0);
        assert_eq!(dividend_factor(&with_yield(0.021)).unwrap().adjustment, 5.0);
        assert!(dividend_factor(&with_yield(0.02)).is_none());
        assert!(dividend_factor(&with_yield(0.0)).is_none());
    }

    #[test]
    fn test_growth_and_margin_neutral_band_adds_nothing() {
        let snapshot = QuoteSnapshot {
            revenue_growth: Some(0.10),
            profit_margins: Some(0.20),
            ..Default::default()
        };
        let result = score(&snapshot).unwrap();
        assert_eq!(result.score, 50.0);
        assert_eq!(result.tier, Tier::Neutral);
        assert!(result.is_insufficient());
    }

    #[test]
    fn test_empty_snapshot_yields_sentinel_only() {
        let result = score(&QuoteSnapshot::default()).unwrap();
        assert_eq!(result.score, 50.0);
        assert_eq!(result.tier, Tier::Neutral);
        assert_eq!(result.factors.len(), 1);
        assert!(result.factors[0].is_insufficient_data());
        assert_eq!(result.raw_adjustment(), 0.0);
        assert_eq!(
            result.descriptions(),
            vec!["Insufficient data for detailed analysis.".to_string()]
        );
    }

    #[test]
    fn test_all_positive_factors_clamp_to_100() {
        let snapshot = QuoteSnapshot {
            trailing_pe: Some(10.0),
            fifty_two_week_low: Some(100.0),
            fifty_two_week_high: Some(200.0),
            current_price: Some(110.0),
            dividend_yield: Some(0.06),
            revenue_growth: Some(0.15),
            profit_margins: Some(0.25),
            ..Default::default()
        };
        let result = score(&snapshot).unwrap();
        assert_eq!(result.raw_adjustment(), 60.0);
        assert_eq!(result.score, 100.0);
        assert_eq!(result.tier, Tier::Buy);
        assert_eq!(
            kinds(&result),
            vec![
                FactorKind::PeRatio,
                FactorKind::RangePosition,
                FactorKind::DividendYield,
                FactorKind::RevenueGrowth,
                FactorKind::ProfitMargin,
            ]
        );
    }

    #[test]
    fn test_negative_factors_reach_avoid() {
        let snapshot = QuoteSnapshot {
            trailing_pe: Some(50.0),
            revenue_growth: Some(-0.05),
            profit_margins: Some(-0.10),
            ..Default::default()
        };
        let result = score(&snapshot).unwrap();
        assert_eq!(result.score, 15.0);
        assert_eq!(result.tier, Tier::Avoid);
        assert_eq!(
            result.descriptions(),
            vec![
                "Very high P/E (50.0) → elevated risk ✗".to_string(),
                "Revenue decline -5.0% → warning ✗".to_string(),
                "Net loss (-10.0%) ✗".to_string(),
            ]
        );
    }

    #[test]
    fn test_worst_case_snapshot_scores_five() {
        let snapshot = QuoteSnapshot {
            trailing_pe: Some(80.0),
            fifty_two_week_low: Some(10.0),
            fifty_two_week_high: Some(20.0),
            current_price: Some(20.0),
            revenue_growth: Some(-0.4),
            profit_margins: Some(-0.5),
            ..Default::default()
        };
        let result = score(&snapshot).unwrap();
        assert_eq!(result.raw_adjustment(), -45.0);
        assert_eq!(result.score, 5.0);
        assert_eq!(result.tier, Tier::Avoid);
    }

    #[test]
    fn test_invalid_snapshot_fails_with_field_name() {
        let snapshot = QuoteSnapshot {
            trailing_pe: Some(12.0),
            fifty_two_week_high: Some(-1.0),
            ..Default::default()
        };
        let err = score(&snapshot).unwrap_err();
        assert_eq!(err.field(), "fiftyTwoWeekHigh");
    }

    #[test]
    fn test_factor_descriptions_are_single_line_plain_text() {
        let snapshot = QuoteSnapshot {
            trailing_pe: Some(18.0),
            fifty_two_week_low: Some(1.0),
            fifty_two_week_high: Some(3.0),
            current_price: Some(2.0),
            dividend_yield: Some(0.03),
            revenue_growth: Some(0.2),
            profit_margins: Some(0.3),
            ..Default::default()
        };
        for line in score(&snapshot).unwrap().descriptions() {
            assert!(!line.contains('\n'));
            assert!(!line.contains('\u{1b}'));
        }
    }
}
