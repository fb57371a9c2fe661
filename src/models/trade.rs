use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeDirection {
    Long,
    Short,
}

/// One trade assembled in the trade builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEntry {
    pub id: Uuid,
    pub symbol: String,
    pub direction: TradeDirection,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub size: f64,
    pub stop_loss: Option<f64>,
    pub emotion: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TradeEntry {
    /// Realized profit or loss, once the trade has an exit.
    pub fn pnl(&self) -> Option<f64> {
        let exit = self.exit_price?;
        let per_unit = match self.direction {
            TradeDirection::Long => exit - self.entry_price,
            TradeDirection::Short => self.entry_price - exit,
        };
        Some(per_unit * self.size)
    }

    /// Amount at risk between entry and stop.
    pub fn risk(&self) -> Option<f64> {
        self.stop_loss
            .map(|stop| (self.entry_price - stop).abs() * self.size)
    }
}

/// Newest-first list of trades, persisted as one blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeHistory {
    pub entries: Vec<TradeEntry>,
    pub last_saved: Option<DateTime<Utc>>,
}
