use crate::config::ProxyConfig;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use nearby::ApiKey;
use nearby::client::{API_KEY_ENV, API_KEY_HEADER, FIELD_MASK_HEADER};
use nearby::place::FIELD_MASK;
use serde_json::{Value, json};
use thiserror::Error;
use tokio::net::TcpListener;

pub const NEARBY_ROUTE: &str = "/api/places/nearby";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct ProxyState {
    api_key: Option<ApiKey>,
    upstream: String,
    http: reqwest::Client,
}

impl ProxyState {
    pub fn new(upstream: impl Into<String>, api_key: Option<ApiKey>) -> Self {
        Self {
            api_key,
            upstream: upstream.into(),
            http: reqwest::Client::new(),
        }
    }
}

pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route(NEARBY_ROUTE, post(nearby))
        .with_state(state)
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn nearby(State(state): State<ProxyState>, Json(body): Json<Value>) -> Response {
    let Some(key) = &state.api_key else {
        return error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("{API_KEY_ENV} not configured"),
        );
    };

    let sent = state
        .http
        .post(&state.upstream)
        .header(API_KEY_HEADER, key.as_str())
        .header(FIELD_MASK_HEADER, FIELD_MASK)
        .json(&body)
        .send()
        .await;

    let upstream = match sent {
        Ok(r) => r,
        Err(e) => {
            log::error!("Places API proxy error: {}", e);
            return error_body(StatusCode::BAD_GATEWAY, "Failed to reach Google Places API");
        }
    };

    let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    match upstream.bytes().await {
        Ok(bytes) => {
            if !status.is_success() {
                log::warn!("Places API answered {}", status);
            }
            (status, [(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        Err(e) => {
            log::error!("Places API proxy error: {}", e);
            error_body(StatusCode::BAD_GATEWAY, "Failed to reach Google Places API")
        }
    }
}

pub async fn serve(listener: TcpListener, state: ProxyState) -> Result<(), ServerError> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub async fn run_server(config: &ProxyConfig, api_key: Option<ApiKey>) -> Result<(), ServerError> {
    if api_key.is_none() {
        log::warn!("{} is not set; every request will fail with 500", API_KEY_ENV);
    }

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    log::info!("Proxy server listening on {}", addr);
    serve(listener, ProxyState::new(config.upstream.clone(), api_key)).await
}
