//! Catalog files and product lookup.
//!
//! A catalog file is either a storefront export (`{"products": [...]}`) or
//! a JSON list of card attribute maps as scraped from a rendered
//! collection page.

use std::collections::BTreeMap;
use std::path::Path;

use ringbuilder_core::Product;

use crate::attributes::product_from_attributes;
use crate::error::EngineError;
use crate::normalize::parse_catalog;

/// Reads and normalizes a catalog file in either format.
///
/// # Errors
///
/// Returns [`EngineError::CatalogIo`] if the file cannot be read and
/// [`EngineError::Deserialize`] if it is neither format.
pub fn load_catalog(path: &Path) -> Result<Vec<Product>, EngineError> {
    let content = std::fs::read_to_string(path).map_err(|source| EngineError::CatalogIo {
        path: path.display().to_string(),
        source,
    })?;

    if content.trim_start().starts_with('[') {
        parse_attribute_catalog(&content)
    } else {
        parse_catalog(&content)
    }
}

/// Parses a JSON list of card attribute maps. Cards without a
/// `product-id` are skipped.
///
/// # Errors
///
/// Returns [`EngineError::Deserialize`] if `json` is not a list of
/// string maps.
pub fn parse_attribute_catalog(json: &str) -> Result<Vec<Product>, EngineError> {
    let cards: Vec<BTreeMap<String, String>> =
        serde_json::from_str(json).map_err(|source| EngineError::Deserialize {
            context: "attribute catalog".to_string(),
            source,
        })?;

    let total = cards.len();
    let products: Vec<Product> = cards
        .iter()
        .filter_map(|card| match product_from_attributes(card) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(error = %e, "skipping product card");
                None
            }
        })
        .collect();

    tracing::info!(total, loaded = products.len(), "attribute catalog loaded");
    Ok(products)
}

/// # Errors
///
/// Returns [`EngineError::ProductNotFound`] when no product has `id`.
pub fn find_product<'a>(products: &'a [Product], id: &str) -> Result<&'a Product, EngineError> {
    let id = id.trim();
    products
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| EngineError::ProductNotFound {
            product_id: id.to_string(),
        })
}

/// The product with this handle, compared case-insensitively.
#[must_use]
pub fn find_by_handle<'a>(products: &'a [Product], handle: &str) -> Option<&'a Product> {
    let handle = handle.trim();
    products
        .iter()
        .find(|p| !p.handle.is_empty() && p.handle.eq_ignore_ascii_case(handle))
}
