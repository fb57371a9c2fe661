use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::trade_dto::{RecordTradeRequest, TradeHistoryResponse};
use crate::error::Result;
use crate::models::trade::TradeEntry;
use crate::AppState;

use super::extract::ApiJson;

#[axum::debug_handler]
pub async fn list_history(State(state): State<AppState>) -> Json<TradeHistoryResponse> {
    let history = state.trade_history.list().await;
    Json(TradeHistoryResponse::new(history.entries))
}

#[axum::debug_handler]
pub async fn record_trade(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RecordTradeRequest>,
) -> Result<(StatusCode, Json<TradeEntry>)> {
    req.validate()?;
    let entry = state.trade_history.record(req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[axum::debug_handler]
pub async fn delete_trade(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.trade_history.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn clear_history(State(state): State<AppState>) -> StatusCode {
    state.trade_history.clear().await;
    StatusCode::NO_CONTENT
}
