//! JSON endpoints for charts and history.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use campaign_core::charts::generate_charts;
use campaign_core::HistoryEntry;
use serde::Serialize;
use serde_json::Value;

use super::page::MonthQuery;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ChartPayload {
    pub id: &'static str,
    pub figure: Value,
}

#[derive(Serialize)]
pub struct HistoryItem {
    pub number: usize,
    #[serde(flatten)]
    pub entry: HistoryEntry,
}

/// GET /api/charts - Plotly figures for the last analysis.
pub async fn get_charts(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<ChartPayload>>, (StatusCode, String)> {
    let range = query.range().map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let session = state.session.lock().await;
    let result = session
        .last()
        .ok_or_else(|| (StatusCode::NOT_FOUND, "No analysis yet".to_string()))?;

    let charts = generate_charts(
        result.params.budget,
        result.params.duration,
        result.params.goal,
        range,
    );
    Ok(Json(
        charts
            .iter()
            .map(|chart| ChartPayload {
                id: chart.id,
                figure: chart.to_plotly(),
            })
            .collect(),
    ))
}

/// GET /api/history - Session history, newest first.
pub async fn get_history(State(state): State<AppState>) -> Json<Vec<HistoryItem>> {
    let session = state.session.lock().await;
    Json(
        session
            .history_newest_first()
            .map(|(number, entry)| HistoryItem {
                number,
                entry: entry.clone(),
            })
            .collect(),
    )
}
