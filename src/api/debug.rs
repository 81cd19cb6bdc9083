/*
 * Responsibility
 * - GET /debug/env: 実行中の設定を表示する (production では mount しない)
 * - secret は EnvReport 側でマスク済み
 */
use axum::{Json, extract::State};

use crate::services::debug_env::EnvReport;
use crate::state::AppState;

pub async fn debug_env(State(state): State<AppState>) -> Json<EnvReport> {
    Json(state.env_report.as_ref().clone())
}
