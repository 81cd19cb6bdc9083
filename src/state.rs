/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - resolver: identity service 経由で user を解決する
 *   - env_report: debug page 用の設定スナップショット
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::{auth::UserResolver, debug_env::EnvReport};

#[derive(Clone, Debug)]
pub struct AppState {
    pub resolver: Arc<UserResolver>,
    pub env_report: Arc<EnvReport>,
}

impl AppState {
    pub fn new(resolver: Arc<UserResolver>, env_report: Arc<EnvReport>) -> Self {
        Self {
            resolver,
            env_report,
        }
    }
}
