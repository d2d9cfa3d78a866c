use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use ringbuilder_engine::{cart_lines_for_pair, find_product, CartLine};

use crate::middleware::RequestId;

use super::{map_engine_error, map_storefront_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct PairRequest {
    pub gemstone_id: String,
    pub setting_id: String,
    /// Centre-stone weight to size the setting for. Defaults to the
    /// gemstone's own weight.
    #[serde(default)]
    pub carat: Option<f64>,
    /// Post the lines to the storefront cart instead of only returning them.
    #[serde(default)]
    pub submit: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct PairResponse {
    lines: Vec<CartLine>,
    submitted: bool,
}

/// Builds the "add both" cart lines for a gemstone and setting pair.
pub(super) async fn pair_cart_lines(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<PairRequest>,
) -> Result<Json<ApiResponse<PairResponse>>, ApiError> {
    let engine_error = |e| map_engine_error(req_id.0.clone(), &e);

    let gemstone = find_product(&state.products, &request.gemstone_id).map_err(engine_error)?;
    let setting = find_product(&state.products, &request.setting_id).map_err(engine_error)?;
    let lines = cart_lines_for_pair(gemstone, setting, request.carat).map_err(engine_error)?;

    if request.submit {
        let client = state.storefront.as_ref().ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                "no storefront is configured for cart submission",
            )
        })?;
        client
            .add_to_cart(&lines)
            .await
            .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    }

    tracing::info!(
        gemstone_id = %gemstone.id,
        setting_id = %setting.id,
        submitted = request.submit,
        "built pair cart lines"
    );

    Ok(Json(ApiResponse::new(
        req_id.0,
        PairResponse {
            lines,
            submitted: request.submit,
        },
    )))
}
