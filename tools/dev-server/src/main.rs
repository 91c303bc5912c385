//! SaleDesk dev server.
//!
//! Serves the static front end and forwards `POST /rpc` to a local node so
//! a page served from this origin can reach a node that does not answer
//! CORS preflights.

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

#[derive(Clone)]
struct AppState {
    rpc_url: String,
    http: reqwest::Client,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let addr: SocketAddr = env_or("SALEDESK_DEV_ADDR", "127.0.0.1:8080")
        .parse()
        .context("invalid SALEDESK_DEV_ADDR")?;
    let static_dir = env_or("SALEDESK_STATIC_DIR", "ui/sale-wasm/static");
    let state = AppState {
        rpc_url: env_or("SALEDESK_RPC_URL", "http://127.0.0.1:9545"),
        http: reqwest::Client::new(),
    };

    let app = Router::new()
        .route("/rpc", post(rpc_proxy))
        .fallback_service(ServeDir::new(&static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("dev-server listening on {addr}, serving {static_dir}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn rpc_proxy(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let response = state
        .http
        .post(&state.rpc_url)
        .json(&payload)
        .send()
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, format!("rpc proxy transport: {e}")))?;

    let status = response.status();
    let body: Value = response
        .json()
        .await
        .map_err(|e| (StatusCode::BAD_GATEWAY, format!("rpc proxy decode: {e}")))?;

    if !status.is_success() {
        return Err((StatusCode::BAD_GATEWAY, format!("rpc node HTTP {status}: {body}")));
    }

    Ok(Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_defaults_apply() {
        assert_eq!(env_or("SALEDESK_TEST_UNSET_VAR", "fallback"), "fallback");
        // Empty values fall back too.
        unsafe { std::env::set_var("SALEDESK_TEST_EMPTY_VAR", "  ") };
        assert_eq!(env_or("SALEDESK_TEST_EMPTY_VAR", "fallback"), "fallback");
    }
}
