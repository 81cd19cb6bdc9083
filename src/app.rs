/*
 * Responsibility
 * - tracing 初期化 → Config 読み込み → 依存生成 (identity client / resolver)
 * - Router 組み立て + Middleware の適用 (http / cors / security headers)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware;
use crate::services::{
    auth::UserResolver, debug_env::EnvReport, identity::build_identity_client,
};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins if set, e.g. RUST_LOG=info,sermon_qa=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting sermon-qa in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn build_state(config: &Config) -> AppState {
    // Incomplete identity config is logged by the factory, not fatal.
    let client = build_identity_client(config);
    let resolver = UserResolver::new(client, config.cookie_names.clone());

    tracing::debug!(?resolver, "user resolver ready");

    AppState::new(
        Arc::new(resolver),
        Arc::new(EnvReport::from_config(config)),
    )
}

fn build_router(state: AppState, config: &Config) -> Router {
    let mut router = Router::new().nest("/api/v1", api::v1::routes(state.clone()));

    if !config.app_env.is_production() {
        router = router.route("/debug/env", get(api::debug::debug_env));
    }

    let router = router
        .fallback(|| async { AppError::not_found("route") })
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}
