/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は user 解決を通さない, /me は current_user middleware の内側
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, me::me};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let resolved = Router::new().route("/me", get(me));
    let resolved = middleware::auth::current_user::apply(resolved, state);

    public.merge(resolved)
}
