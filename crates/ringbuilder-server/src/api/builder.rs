use std::collections::BTreeMap;

use axum::{
    extract::{RawQuery, State},
    Extension, Json,
};
use serde::Serialize;

use ringbuilder_core::is_ring_builder_collection;
use ringbuilder_engine::{BuilderState, OptionCount, QueryParams, SelectionContext, ViewSnapshot};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

const COLLECTION_PARAM: &str = "collection";

#[derive(Debug, Serialize)]
pub(super) struct RingBuilderPage<'a> {
    collection: Option<String>,
    context: &'a SelectionContext,
    #[serde(flatten)]
    view: ViewSnapshot<'a>,
    counts: BTreeMap<&'static str, Vec<OptionCount>>,
}

/// One page of the builder for a collection page's query string.
///
/// The query is the storefront's own: `collection`, the `gemstone` /
/// `setting` / `setting_variant` selection, `filter_*` parameters, `sort`
/// and `page`. Unknown parameters are carried through to the returned
/// `query` and page links.
pub(super) async fn ring_builder_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let raw = raw.unwrap_or_default();
    let params = QueryParams::parse(&raw);

    let collection = params.get_non_empty(COLLECTION_PARAM);
    if let Some(handle) = collection.as_deref() {
        if !is_ring_builder_collection(handle, &state.settings) {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                format!("collection '{handle}' does not use the ring builder"),
            ));
        }
    }

    let mut builder =
        BuilderState::from_query(state.products.clone(), &raw, state.settings.per_page);
    let missing = builder.infer_from_catalog();
    if let Some(client) = &state.storefront {
        if !missing.is_empty() {
            client.resolve_selections(&mut builder, &missing).await;
        }
    }

    let page = RingBuilderPage {
        collection,
        context: builder.context(),
        view: builder.snapshot(),
        counts: builder.all_facet_counts(),
    };
    let data = serde_json::to_value(&page).map_err(|e| {
        tracing::error!(error = %e, "failed to serialize builder page");
        ApiError::new(req_id.0.clone(), "internal_error", "failed to render page")
    })?;

    Ok(Json(ApiResponse::new(req_id.0, data)))
}
