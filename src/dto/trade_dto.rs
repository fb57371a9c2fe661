use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::trade::{TradeDirection, TradeEntry};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordTradeRequest {
    #[validate(length(min = 1, max = 20))]
    pub symbol: String,
    pub direction: TradeDirection,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub size: f64,
    pub stop_loss: Option<f64>,
    #[validate(length(max = 100))]
    pub emotion: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeHistoryResponse {
    pub entries: Vec<TradeEntry>,
    /// Sum of realized profit and loss over closed trades.
    pub realized_pnl: f64,
    pub open_trades: usize,
}

impl TradeHistoryResponse {
    pub fn new(entries: Vec<TradeEntry>) -> Self {
        let realized_pnl = entries.iter().filter_map(TradeEntry::pnl).sum();
        let open_trades = entries.iter().filter(|e| e.exit_price.is_none()).count();
        Self {
            entries,
            realized_pnl,
            open_trades,
        }
    }
}
