mod builder;
mod cart;
mod products;
mod summary;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use ringbuilder_core::{BuilderSettings, Product};
use ringbuilder_engine::EngineError;
use ringbuilder_storefront::{StorefrontClient, StorefrontError};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<[Product]>,
    pub settings: Arc<BuilderSettings>,
    pub storefront: Option<Arc<StorefrontClient>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    products: usize,
    storefront: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "cart_rejected" => StatusCode::UNPROCESSABLE_ENTITY,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_engine_error(request_id: String, error: &EngineError) -> ApiError {
    let code = match error {
        EngineError::ProductNotFound { .. } => "not_found",
        EngineError::WrongKind { .. } | EngineError::MissingVariant { .. } => "validation_error",
        EngineError::Deserialize { .. }
        | EngineError::MissingProductId { .. }
        | EngineError::CatalogIo { .. } => {
            tracing::error!(error = %error, "engine failure");
            "internal_error"
        }
    };
    ApiError::new(request_id, code, error.to_string())
}

pub(super) fn map_storefront_error(request_id: String, error: &StorefrontError) -> ApiError {
    match error {
        StorefrontError::CartRejected { description, .. } => {
            ApiError::new(request_id, "cart_rejected", description.clone())
        }
        _ => {
            tracing::warn!(error = %error, "storefront request failed");
            ApiError::new(request_id, "upstream_error", "storefront request failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/ring-builder", get(builder::ring_builder_page))
        .route(
            "/api/v1/products/{id}/variant",
            get(products::resolve_product_variant),
        )
        .route("/api/v1/pair-summary", get(summary::pair_summary_page))
        .route("/api/v1/cart/pair", post(cart::pair_cart_lines))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                ))
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse::new(
        req_id.0,
        HealthData {
            status: "ok",
            products: state.products.len(),
            storefront: if state.storefront.is_some() {
                "configured"
            } else {
                "disabled"
            },
        },
    ))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
