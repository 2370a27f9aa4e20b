//! HTTP endpoints over the address pool
//!
//! | Method | Path                       | Success | Errors   |
//! |--------|----------------------------|---------|----------|
//! | GET    | `/addresses`               | 200     |          |
//! | POST   | `/addresses`               | 200     | 400      |
//! | GET    | `/addresses/:ip`           | 200     | 404      |
//! | POST   | `/addresses/:ip/acquire`   | 200     | 404, 409 |
//! | PUT    | `/addresses/:ip/release`   | 200     | 404      |

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use ipam_core::{Address, AddressPool};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

type SharedPool = Arc<AddressPool>;

/// Body of a range registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRangeRequest {
    #[serde(default)]
    pub range: Option<String>,
}

/// Pool error mapped to an HTTP status
#[derive(Debug)]
pub struct ApiError(ipam_core::Error);

impl From<ipam_core::Error> for ApiError {
    fn from(err: ipam_core::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ipam_core::Error::InvalidRange(_) | ipam_core::Error::RangeTooLarge { .. } => {
                StatusCode::BAD_REQUEST
            }
            ipam_core::Error::AddressNotFound(_) => StatusCode::NOT_FOUND,
            ipam_core::Error::Conflict(_) => StatusCode::CONFLICT,
            other => {
                tracing::error!("Request failed: {}", other);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Build the router serving `pool`
pub fn router(pool: SharedPool) -> Router {
    Router::new()
        .route("/addresses", get(list_addresses).post(register_range))
        .route("/addresses/:ip", get(get_address))
        .route("/addresses/:ip/acquire", post(acquire))
        .route("/addresses/:ip/release", put(release))
        .layer(TraceLayer::new_for_http())
        .with_state(pool)
}

async fn list_addresses(State(pool): State<SharedPool>) -> Result<Json<Vec<Address>>, ApiError> {
    Ok(Json(pool.list_all().await?))
}

async fn register_range(
    State(pool): State<SharedPool>,
    payload: Result<Json<RegisterRangeRequest>, JsonRejection>,
) -> Result<Json<Vec<Address>>, ApiError> {
    // Any unreadable body (bad JSON, non-string range) is a bad range request
    let Json(request) = payload
        .map_err(|rejection| ipam_core::Error::invalid_range(rejection.body_text()))?;
    let range = request.range.unwrap_or_default();
    Ok(Json(pool.register_range(&range).await?))
}

async fn get_address(
    State(pool): State<SharedPool>,
    Path(ip): Path<String>,
) -> Result<Json<Address>, ApiError> {
    Ok(Json(pool.get_address(&ip).await?))
}

async fn acquire(
    State(pool): State<SharedPool>,
    Path(ip): Path<String>,
) -> Result<Json<Address>, ApiError> {
    Ok(Json(pool.acquire(&ip).await?))
}

async fn release(
    State(pool): State<SharedPool>,
    Path(ip): Path<String>,
) -> Result<Json<Address>, ApiError> {
    Ok(Json(pool.release(&ip).await?))
}
