use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::{load_json, save_json, KeyValueStore};
use crate::dto::trade_dto::RecordTradeRequest;
use crate::error::{Error, Result};
use crate::models::trade::{TradeEntry, TradeHistory};

pub const TRADE_HISTORY_KEY: &str = "trade_builder_history";

/// Oldest entries are dropped past this many trades.
const MAX_ENTRIES: usize = 200;

/// Trade-builder history kept as one blob under its own storage key.
/// Storage failures are logged; a failed read yields an empty history.
#[derive(Clone)]
pub struct TradeHistoryService {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl TradeHistoryService {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub async fn list(&self) -> TradeHistory {
        match load_json::<TradeHistory>(self.store.as_ref(), &self.key).await {
            Ok(history) => history.unwrap_or_default(),
            Err(e) => {
                tracing::error!(error = ?e, key = %self.key, "Failed to read trade history");
                TradeHistory::default()
            }
        }
    }

    pub async fn record(&self, req: RecordTradeRequest) -> Result<TradeEntry> {
        check_price("entry_price", Some(req.entry_price))?;
        check_price("exit_price", req.exit_price)?;
        check_price("stop_loss", req.stop_loss)?;
        check_price("size", Some(req.size))?;

        let entry = TradeEntry {
            id: Uuid::new_v4(),
            symbol: req.symbol.trim().to_uppercase(),
            direction: req.direction,
            entry_price: req.entry_price,
            exit_price: req.exit_price,
            size: req.size,
            stop_loss: req.stop_loss,
            emotion: req.emotion,
            notes: req.notes,
            created_at: Utc::now(),
        };

        let mut history = self.list().await;
        history.entries.insert(0, entry.clone());
        history.entries.truncate(MAX_ENTRIES);
        self.save(history).await;

        tracing::info!(trade_id = %entry.id, symbol = %entry.symbol, "Trade recorded");
        Ok(entry)
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        let mut history = self.list().await;
        let before = history.entries.len();
        history.entries.retain(|e| e.id != id);
        if history.entries.len() == before {
            return Err(Error::NotFound(format!("Trade {} not found", id)));
        }
        self.save(history).await;
        Ok(())
    }

    pub async fn clear(&self) {
        if let Err(e) = self.store.clear(&self.key).await {
            tracing::error!(error = ?e, key = %self.key, "Failed to clear trade history");
        }
    }

    async fn save(&self, mut history: TradeHistory) {
        history.last_saved = Some(Utc::now());
        if let Err(e) = save_json(self.store.as_ref(), &self.key, &history).await {
            tracing::error!(error = ?e, key = %self.key, "Failed to save trade history");
        }
    }
}

fn check_price(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(Error::BadRequest(format!(
            "{} must be a positive number",
            field
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::MockKeyValueStore;
    use crate::database::MemoryStore;
    use crate::models::trade::TradeDirection;

    fn request(symbol: &str) -> RecordTradeRequest {
        RecordTradeRequest {
            symbol: symbol.to_string(),
            direction: TradeDirection::Long,
            entry_price: 50.0,
            exit_price: None,
            size: 1.0,
            stop_loss: Some(49.0),
            emotion: Some("calm".into()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn history_is_newest_first_under_its_own_key() {
        let store = Arc::new(MemoryStore::new());
        let service = TradeHistoryService::new(store.clone(), TRADE_HISTORY_KEY);

        let first = service.record(request("es")).await.unwrap();
        let second = service.record(request("nq")).await.unwrap();
        assert_eq!(first.symbol, "ES");

        let history = service.list().await;
        assert_eq!(history.entries, vec![second.clone(), first.clone()]);
        assert!(history.last_saved.is_some());
        assert!(store.get(TRADE_HISTORY_KEY).await.unwrap().is_some());

        service.remove(second.id).await.unwrap();
        assert_eq!(service.list().await.entries, vec![first]);
        assert!(matches!(
            service.remove(second.id).await,
            Err(Error::NotFound(_))
        ));

        service.clear().await;
        assert!(service.list().await.entries.is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn history_is_capped() {
        let service = TradeHistoryService::new(Arc::new(MemoryStore::new()), TRADE_HISTORY_KEY);
        for _ in 0..MAX_ENTRIES + 3 {
            service.record(request("cl")).await.unwrap();
        }
        assert_eq!(service.list().await.entries.len(), MAX_ENTRIES);
    }

    #[tokio::test]
    async fn non_positive_prices_are_rejected() {
        let service = TradeHistoryService::new(Arc::new(MemoryStore::new()), TRADE_HISTORY_KEY);
        let bad = RecordTradeRequest {
            size: 0.0,
            ..request("es")
        };
        assert!(matches!(service.record(bad).await, Err(Error::BadRequest(_))));

        let bad = RecordTradeRequest {
            exit_price: Some(f64::NAN),
            ..request("es")
        };
        assert!(matches!(service.record(bad).await, Err(Error::BadRequest(_))));
    }

    #[tokio::test]
    async fn unreadable_history_reads_as_empty() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Ok(Some("[not json".to_string())));
        let service = TradeHistoryService::new(Arc::new(store), TRADE_HISTORY_KEY);
        assert_eq!(service.list().await, TradeHistory::default());
    }
}
