use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use ringbuilder_engine::{find_product, resolve_variant};

use crate::middleware::RequestId;

use super::{map_engine_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct VariantQuery {
    pub carat: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(super) struct VariantItem {
    product_id: String,
    variant_id: String,
    /// Whether a size span contained the carat; `false` means the default
    /// variant was returned.
    matched: bool,
    min_carat: Option<f64>,
    max_carat: Option<f64>,
    metal_type: Option<String>,
}

/// The setting variant sized for `carat`, or the product's default variant.
pub(super) async fn resolve_product_variant(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Query(query): Query<VariantQuery>,
) -> Result<Json<ApiResponse<VariantItem>>, ApiError> {
    let product =
        find_product(&state.products, &id).map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    if let Some(carat) = query.carat {
        if !carat.is_finite() || carat <= 0.0 {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                "carat must be a positive number",
            ));
        }
    }

    let item = match query.carat.and_then(|c| resolve_variant(product, c)) {
        Some(variant) => VariantItem {
            product_id: product.id.clone(),
            variant_id: variant.variant_id.clone(),
            matched: true,
            min_carat: Some(variant.min_carat),
            max_carat: Some(variant.max_carat),
            metal_type: variant.metal_type.clone(),
        },
        None => {
            let variant_id = product.fallback_variant_id().ok_or_else(|| {
                ApiError::new(
                    req_id.0.clone(),
                    "not_found",
                    format!("product {} has no variant", product.id),
                )
            })?;
            VariantItem {
                product_id: product.id.clone(),
                variant_id: variant_id.to_string(),
                matched: false,
                min_carat: None,
                max_carat: None,
                metal_type: None,
            }
        }
    };

    Ok(Json(ApiResponse::new(req_id.0, item)))
}
