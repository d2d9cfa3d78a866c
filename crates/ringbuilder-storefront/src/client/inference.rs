//! Selection inference backed by the storefront.
//!
//! The builder learns the shape and carat of the "other side" of a pairing
//! from the selected product's storefront record. Lookups try several
//! handle variants, and when all of them fail the handle text itself is
//! parsed. Inference never fails outright: the worst case is an empty
//! [`Inference`], which leaves the catalog unconstrained.

use ringbuilder_core::{CaratRange, Shape};
use ringbuilder_engine::context::Side;
use ringbuilder_engine::parse::{metafield_display_value, parse_variant_size};
use ringbuilder_engine::{infer_from_handle, lookup_handles, BuilderState, Inference};

use super::StorefrontClient;
use crate::error::StorefrontError;
use crate::types::StorefrontProduct;

fn first_number(value: &str) -> Option<f64> {
    value
        .split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()
        .filter(|c| c.is_finite() && *c > 0.0)
}

fn shape_metafield(product: &StorefrontProduct, key: &str) -> Option<Shape> {
    product
        .custom_metafield(key)
        .map(|raw| metafield_display_value(&raw))
        .and_then(|label| Shape::from_name(&label))
}

/// What a storefront product record says about a selection on `side`.
///
/// Gemstones read `gemstone_shape` and `gemstone_carat_weight` (or
/// `gemstone_weight`). Settings read `center_stone_shape` and the union of
/// the size ranges in their variants' `option2`.
#[must_use]
pub fn inference_from_product(product: &StorefrontProduct, side: Side) -> Inference {
    match side {
        Side::Gemstone => Inference {
            shape: shape_metafield(product, "gemstone_shape"),
            carat: product
                .custom_metafield("gemstone_carat_weight")
                .or_else(|| product.custom_metafield("gemstone_weight"))
                .and_then(|w| first_number(&w)),
            carat_range: None,
        },
        Side::Setting => Inference {
            shape: shape_metafield(product, "center_stone_shape"),
            carat: None,
            carat_range: product
                .variants
                .iter()
                .filter_map(|v| v.option2.as_deref())
                .filter_map(parse_variant_size)
                .filter(CaratRange::is_valid)
                .reduce(CaratRange::union),
        },
    }
}

/// Size span of one setting variant, read from its `option2`.
#[must_use]
pub fn variant_size_range(product: &StorefrontProduct, variant_id: &str) -> Option<CaratRange> {
    product
        .variant(variant_id)?
        .option2
        .as_deref()
        .filter(|size| size.contains("ct"))
        .and_then(parse_variant_size)
        .filter(CaratRange::is_valid)
}

impl StorefrontClient {
    /// Fetches the first of [`lookup_handles`] the storefront knows.
    ///
    /// Misses and failures on one candidate move on to the next; the error
    /// of the last candidate is returned when none succeeds.
    async fn fetch_candidates(&self, handle: &str) -> Result<StorefrontProduct, StorefrontError> {
        let mut last_error = None;
        for candidate in lookup_handles(handle) {
            match self.fetch_product(&candidate).await {
                Ok(product) => {
                    tracing::debug!(handle, candidate, "found selection on storefront");
                    return Ok(product);
                }
                Err(e @ StorefrontError::NotFound { .. }) => {
                    tracing::debug!(handle, candidate, "storefront lookup missed");
                    last_error = Some(e);
                }
                Err(e) => {
                    tracing::warn!(handle, candidate, error = %e, "storefront lookup failed");
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) => Err(e),
            None => Err(StorefrontError::NotFound {
                url: self.product_url(handle.trim())?,
            }),
        }
    }

    /// Looks the selected product up under each handle from
    /// [`lookup_handles`] and merges what its record says over what the
    /// handle text implies. When every lookup fails, only the handle text is
    /// used.
    pub async fn infer_selection(&self, handle: &str, side: Side) -> Inference {
        let mut parsed = infer_from_handle(handle);
        if side == Side::Setting {
            parsed.carat = None;
        }

        match self.fetch_candidates(handle).await {
            Ok(product) => {
                let fetched = inference_from_product(&product, side);
                tracing::debug!(handle, ?fetched, "inferred selection from storefront");
                fetched.or(parsed)
            }
            Err(e) => {
                tracing::warn!(
                    handle,
                    error = %e,
                    ?parsed,
                    "storefront inference failed, using handle patterns"
                );
                parsed
            }
        }
    }

    /// The size span of the selected setting variant, looked up under the
    /// same handle candidates as [`StorefrontClient::infer_selection`].
    ///
    /// # Errors
    ///
    /// Returns the last lookup error when no candidate handle resolves. A
    /// variant that is missing or has no size is `Ok(None)`.
    pub async fn setting_variant_range(
        &self,
        setting_handle: &str,
        variant_id: &str,
    ) -> Result<Option<CaratRange>, StorefrontError> {
        let product = self.fetch_candidates(setting_handle).await?;
        Ok(variant_size_range(&product, variant_id))
    }

    /// Looks each of `sides` up on the storefront and merges the results
    /// into `state`, including the selected setting variant's size span.
    ///
    /// Every lookup is ticketed when issued, so a result that arrives after
    /// the state has been mutated is dropped rather than applied.
    pub async fn resolve_selections(&self, state: &mut BuilderState, sides: &[Side]) {
        for &side in sides {
            let Some(handle) = state.context().handle(side).map(str::to_owned) else {
                continue;
            };
            let ticket = state.begin_inference(side);
            let inference = self.infer_selection(&handle, side).await;
            state.apply_inference(ticket, inference);

            if side != Side::Setting {
                continue;
            }
            let Some(variant_id) = state.context().setting_variant.clone() else {
                continue;
            };
            let ticket = state.begin_inference(side);
            match self.setting_variant_range(&handle, &variant_id).await {
                Ok(Some(range)) => {
                    state.apply_setting_variant_range(ticket, range);
                }
                Ok(None) => {
                    tracing::debug!(handle, variant_id, "setting variant has no size range");
                }
                Err(e) => {
                    tracing::warn!(handle, variant_id, error = %e, "setting variant lookup failed");
                }
            }
        }
    }
}
