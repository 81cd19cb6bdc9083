use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::{auth::ResolvedUser, identity::UserIdentity};
use crate::state::AppState;

/// Handler で、解決済みの user を受け取るための extractor
/// middleware が `ResolvedUser` を request.extensions() に insert 済みである前提
/// `Absent` または未設定 (middleware の外) なら 401 を返す
pub struct AuthUser(pub UserIdentity);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ResolvedUser>()
            .cloned()
            .and_then(ResolvedUser::into_option)
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}
