//! Webhook server the voice platform posts request envelopes to.

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use clap::Parser;
use serde_json::{Value, json};
use stayscore_core::{Skill, SkillConfig};
use stayscore_proto::{RequestEnvelope, ResponseEnvelope};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides server.bind)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,
}

#[derive(Clone)]
struct AppState {
    skill: Arc<Skill>,
}

pub async fn execute(config: SkillConfig, args: ServeArgs) -> Result<()> {
    for warning in config.validate() {
        warn!("{}", warning);
    }

    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let (skill, worker) = Skill::builder(config)
        .build()
        .context("Failed to build skill")?;
    info!("Loaded locales: {}", skill.locales().locales().join(", "));

    let app = create_router(AppState {
        skill: Arc::new(skill),
    });

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!("Starting server on {}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Waiting for pending staff alerts");
    worker.drain().await;
    info!("Server stopped");
    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handle_envelope))
        .route("/skill", post(handle_envelope))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn handle_envelope(
    State(state): State<AppState>,
    Json(envelope): Json<RequestEnvelope>,
) -> Result<Json<ResponseEnvelope>, (StatusCode, Json<Value>)> {
    match state.skill.invoke(envelope).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!("Unhandled skill error ({}): {}", e.kind(), e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.kind(), "message": e.to_string() })),
            ))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
