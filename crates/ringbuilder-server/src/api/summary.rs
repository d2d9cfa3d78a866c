use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use ringbuilder_core::Product;
use ringbuilder_engine::{find_by_handle, pair_summary, PairSummary};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SummaryQuery {
    pub gemstone: Option<String>,
    pub setting: Option<String>,
    pub setting_variant: Option<String>,
}

fn lookup<'a>(
    state: &'a AppState,
    request_id: &str,
    param: &str,
    handle: Option<&str>,
) -> Result<&'a Product, ApiError> {
    let handle = handle.map(str::trim).filter(|h| !h.is_empty()).ok_or_else(|| {
        ApiError::new(
            request_id.to_owned(),
            "validation_error",
            format!("{param} is required"),
        )
    })?;
    find_by_handle(&state.products, handle).ok_or_else(|| {
        ApiError::new(
            request_id.to_owned(),
            "not_found",
            format!("no product with handle {handle}"),
        )
    })
}

/// Ring details for a chosen gemstone and setting pair.
pub(super) async fn pair_summary_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<ApiResponse<PairSummary>>, ApiError> {
    let gemstone = lookup(&state, &req_id.0, "gemstone", query.gemstone.as_deref())?;
    let setting = lookup(&state, &req_id.0, "setting", query.setting.as_deref())?;
    if !setting.is_setting() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("{} is not a setting", setting.handle),
        ));
    }

    let summary = pair_summary(gemstone, setting, query.setting_variant.as_deref());
    tracing::debug!(
        gemstone = %summary.gemstone_id,
        setting = %summary.setting_id,
        variant = ?summary.variant_id,
        "built pair summary"
    );
    Ok(Json(ApiResponse::new(req_id.0, summary)))
}
