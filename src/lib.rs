//! Sermon Q&A server: resolves the signed-in congregant through a hosted
//! identity service and serves the authenticated API.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
