//! Domain types shared between the extraction engine and its consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One brokerage position as extracted from the portal's holdings page.
///
/// Monetary fields that the page does not state directly are derived by
/// [`HoldingRecord::apply_derivations`]; a record that names nothing and
/// carries no positive monetary value fails [`HoldingRecord::is_valid`] and
/// is discarded by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
    /// Ticker symbol, if the page exposes one.
    pub symbol: Option<String>,
    /// Display name of the instrument.
    pub name: Option<String>,
    pub units: f64,
    pub average_buy_price: f64,
    pub current_price: f64,
    pub invested_value: f64,
    pub current_value: f64,
    pub profit_loss: f64,
    /// Overall return in percent.
    pub profit_loss_percentage: f64,
    /// Single-day move in percent.
    pub day_change_percentage: f64,
    pub sector: Option<String>,
    pub exchange: Option<String>,
    pub market_cap: Option<String>,
    pub isin: Option<String>,
    pub extracted_at: DateTime<Utc>,
}

impl HoldingRecord {
    /// Returns an all-zero record stamped with the current time.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            symbol: None,
            name: None,
            units: 0.0,
            average_buy_price: 0.0,
            current_price: 0.0,
            invested_value: 0.0,
            current_value: 0.0,
            profit_loss: 0.0,
            profit_loss_percentage: 0.0,
            day_change_percentage: 0.0,
            sector: None,
            exchange: None,
            market_cap: None,
            isin: None,
            extracted_at: Utc::now(),
        }
    }

    /// Fills monetary fields the page did not state directly.
    ///
    /// - `invested_value` defaults to `units * average_buy_price`.
    /// - `profit_loss` defaults to `current_value - invested_value`.
    /// - `profit_loss_percentage` defaults to
    ///   `profit_loss / invested_value * 100` when `invested_value > 0`.
    ///
    /// A zero field counts as "not stated"; directly observed values are
    /// never overwritten.
    pub fn apply_derivations(&mut self) {
        if self.invested_value == 0.0 && self.units > 0.0 && self.average_buy_price > 0.0 {
            self.invested_value = self.units * self.average_buy_price;
        }
        if self.profit_loss == 0.0 && self.current_value > 0.0 && self.invested_value > 0.0 {
            self.profit_loss = self.current_value - self.invested_value;
        }
        if self.profit_loss_percentage == 0.0 && self.invested_value > 0.0 {
            self.profit_loss_percentage = self.profit_loss / self.invested_value * 100.0;
        }
    }

    /// Minimum-validity rule: a record must identify itself (symbol or name)
    /// or carry at least one positive monetary value.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let has_identity = self.symbol.as_deref().is_some_and(|s| !s.is_empty())
            || self.name.as_deref().is_some_and(|s| !s.is_empty());
        let has_value =
            self.units > 0.0 || self.invested_value > 0.0 || self.current_value > 0.0;
        has_identity || has_value
    }
}

/// Aggregate figures read off the holdings page itself.
///
/// Each field is populated only when directly observed; nothing here is ever
/// back-filled from per-holding sums (that aggregation belongs to the
/// consumer).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_invested: Option<f64>,
    pub current_value: Option<f64>,
    pub total_returns: Option<f64>,
    pub total_returns_percentage: Option<f64>,
}

impl PortfolioSummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_invested.is_none()
            && self.current_value.is_none()
            && self.total_returns.is_none()
            && self.total_returns_percentage.is_none()
    }
}

/// The complete result of one extraction session.
///
/// Immutable once returned; ownership passes to the caller, which is
/// responsible for persisting the holdings into its own store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Holdings in page order. Order is not stable across sessions.
    pub holdings: Vec<HoldingRecord>,
    pub summary: PortfolioSummary,
    pub extracted_at: DateTime<Utc>,
    /// The URL the holdings were read from.
    pub source_url: String,
}

/// The phases an extraction session moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Idle,
    Initializing,
    AwaitingLogin,
    SessionDetected,
    Navigating,
    Extracting,
    Completed,
    Failed,
}

impl SessionPhase {
    /// The percentage at which this phase begins. Waiting inside a phase may
    /// advance the reported percentage up to (but not past) the next floor.
    #[must_use]
    pub fn percentage_floor(self) -> u8 {
        match self {
            SessionPhase::Idle => 0,
            SessionPhase::Initializing => 5,
            SessionPhase::AwaitingLogin => 10,
            SessionPhase::SessionDetected => 35,
            SessionPhase::Navigating => 40,
            SessionPhase::Extracting => 50,
            SessionPhase::Completed => 100,
            SessionPhase::Failed => 0,
        }
    }

    /// Human-readable message shown alongside progress updates.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            SessionPhase::Idle => "Session created",
            SessionPhase::Initializing => "Starting browser",
            SessionPhase::AwaitingLogin => "Waiting for you to log in",
            SessionPhase::SessionDetected => "Login detected",
            SessionPhase::Navigating => "Locating your holdings page",
            SessionPhase::Extracting => "Reading holdings",
            SessionPhase::Completed => "Extraction complete",
            SessionPhase::Failed => "Extraction failed",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Initializing => "initializing",
            SessionPhase::AwaitingLogin => "awaiting_login",
            SessionPhase::SessionDetected => "session_detected",
            SessionPhase::Navigating => "navigating",
            SessionPhase::Extracting => "extracting",
            SessionPhase::Completed => "completed",
            SessionPhase::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// One progress event delivered to a session's registered callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub session_id: String,
    /// 0..=100, non-decreasing for a given session.
    pub percentage: u8,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(units: f64, avg: f64, current_value: f64) -> HoldingRecord {
        let mut r = HoldingRecord::empty();
        r.units = units;
        r.average_buy_price = avg;
        r.current_value = current_value;
        r
    }

    #[test]
    fn derives_invested_from_units_and_avg_price() {
        let mut r = record_with(19.0, 5168.90, 131_670.0);
        r.apply_derivations();
        assert!((r.invested_value - 98_209.10).abs() < 1e-6);
    }

    #[test]
    fn derives_profit_loss_from_values() {
        let mut r = record_with(19.0, 5168.90, 131_670.0);
        r.apply_derivations();
        assert!((r.profit_loss - 33_460.90).abs() < 1e-6);
    }

    #[test]
    fn derives_profit_loss_percentage_when_invested_positive() {
        let mut r = record_with(19.0, 5168.90, 131_670.0);
        r.apply_derivations();
        let expected = 33_460.90 / 98_209.10 * 100.0;
        assert!((r.profit_loss_percentage - expected).abs() < 1e-6);
    }

    #[test]
    fn observed_values_are_never_overwritten() {
        let mut r = record_with(10.0, 100.0, 1500.0);
        r.invested_value = 999.0;
        r.profit_loss = 7.0;
        r.profit_loss_percentage = 1.5;
        r.apply_derivations();
        assert!((r.invested_value - 999.0).abs() < f64::EPSILON);
        assert!((r.profit_loss - 7.0).abs() < f64::EPSILON);
        assert!((r.profit_loss_percentage - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn no_percentage_derived_for_zero_invested() {
        let mut r = HoldingRecord::empty();
        r.name = Some("Free Share".to_string());
        r.current_value = 50.0;
        r.apply_derivations();
        assert!((r.profit_loss_percentage - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn record_with_name_only_is_valid() {
        let mut r = HoldingRecord::empty();
        r.name = Some("Nuvama Wealth".to_string());
        assert!(r.is_valid());
    }

    #[test]
    fn record_with_value_only_is_valid() {
        let mut r = HoldingRecord::empty();
        r.current_value = 131_670.0;
        assert!(r.is_valid());
    }

    #[test]
    fn nameless_zero_value_record_is_invalid() {
        let mut r = HoldingRecord::empty();
        r.symbol = Some(String::new());
        assert!(!r.is_valid());
    }

    #[test]
    fn phase_floors_are_monotone_in_order() {
        let order = [
            SessionPhase::Idle,
            SessionPhase::Initializing,
            SessionPhase::AwaitingLogin,
            SessionPhase::SessionDetected,
            SessionPhase::Navigating,
            SessionPhase::Extracting,
            SessionPhase::Completed,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].percentage_floor() <= pair[1].percentage_floor());
        }
    }

    #[test]
    fn summary_is_empty_only_when_all_fields_absent() {
        assert!(PortfolioSummary::default().is_empty());
        let s = PortfolioSummary {
            current_value: Some(1.0),
            ..PortfolioSummary::default()
        };
        assert!(!s.is_empty());
    }

    #[test]
    fn snapshot_serializes_round_trip() {
        let snapshot = PortfolioSnapshot {
            holdings: vec![],
            summary: PortfolioSummary::default(),
            extracted_at: Utc::now(),
            source_url: "https://portal.example.com/holdings".to_string(),
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: PortfolioSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.source_url, snapshot.source_url);
    }
}
