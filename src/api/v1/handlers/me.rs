/*
 * Responsibility
 * - GET /me: 解決済みの user をそのまま返す
 * - user がいなければ AuthUser extractor が 401 を返す
 */
use axum::Json;

use crate::api::v1::{dto::me::MeResponse, extractors::AuthUser};

pub async fn me(AuthUser(user): AuthUser) -> Json<MeResponse> {
    Json(MeResponse { user })
}
