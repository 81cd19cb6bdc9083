use serde::Serialize;

use crate::services::identity::UserIdentity;

/// Identity exactly as the identity service returned it.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserIdentity,
}
