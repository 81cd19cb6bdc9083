//! 現在の user を解決して `ResolvedUser` を extensions に入れる
//!
//! - 拒否はしない: user が必要な handler は `AuthUser` extractor で 401 を返す
//! - 解決の失敗 (token なし / 無効 / identity service 障害) はすべて `Absent` になる

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::state::AppState;

/// Resolve the user for every request routed through `router`.
///
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::current_user::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, current_user_middleware))
}

async fn current_user_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let resolved = state.resolver.resolve_server_user(req.headers()).await;

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(resolved);

    next.run(req).await
}
