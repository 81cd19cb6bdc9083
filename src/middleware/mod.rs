/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: user 解決 (拒否はしない), cors / http / security_headers: 横断的な層
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
