//! Builds a [`Product`] from the string-encoded `data-*` attributes a
//! rendered product card carries.
//!
//! Recognised keys (with or without the `data-` prefix): `product-id`,
//! `product-type`, `handle`, `title`, `shape`, `color`, `clarity`,
//! `diamond-type`, `gemstone-type`, `carat`, `treatment`, `cut`, `polish`,
//! `symmetry`, `fluorescence`, `metal`, `style`, `carat-min`, `carat-max`,
//! `price`, `certification`, `origin`, `variant-map`.
//!
//! `variant-map` is a JSON list of
//! `{"id", "min", "max", "metalType", "metalWeight", "centerStoneShape",
//! "image", "price"}` objects, the same shape the storefront theme embeds.
//! Variant prices are in minor units like the card's own `price`.

use std::collections::BTreeMap;

use serde::Deserialize;

use ringbuilder_core::{CaratRange, Facets, Product, ProductKind, SettingVariant};

use crate::error::EngineError;
use crate::parse_helpers::{non_empty, parse_leading_float};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantMapEntry {
    id: serde_json::Value,
    min: f64,
    max: f64,
    #[serde(default)]
    metal_type: String,
    #[serde(default)]
    metal_weight: String,
    #[serde(default)]
    center_stone_shape: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    price: Option<f64>,
}

/// Builds a product from card attributes.
///
/// Malformed numbers and an unreadable `variant-map` degrade to absent
/// values; only a missing `product-id` is an error.
///
/// # Errors
///
/// Returns [`EngineError::MissingProductId`] when `product-id` is absent or blank.
pub fn product_from_attributes(attrs: &BTreeMap<String, String>) -> Result<Product, EngineError> {
    let get = |key: &str| -> Option<String> {
        attrs
            .get(key)
            .or_else(|| attrs.get(&format!("data-{key}")))
            .and_then(|v| non_empty(v))
    };

    let id = get("product-id").ok_or_else(|| EngineError::MissingProductId {
        context: "card attributes".to_string(),
    })?;

    let kind = get("product-type")
        .map(|t| ProductKind::from_label(&t))
        .unwrap_or_default();

    let number = |key: &str| get(key).and_then(|v| parse_leading_float(&v));

    // Settings sometimes publish their span as `carat="1-2"` instead of
    // separate min/max attributes.
    let carat_attr = get("carat");
    let carat_range = match (number("carat-min"), number("carat-max")) {
        (Some(min), Some(max)) => Some(CaratRange::new(min, max)),
        _ if kind == ProductKind::Setting => carat_attr
            .as_deref()
            .and_then(crate::parse::parse_size_range),
        _ => None,
    };
    let carat_weight = if kind == ProductKind::Setting {
        None
    } else {
        carat_attr.as_deref().and_then(parse_leading_float)
    };

    #[allow(clippy::cast_possible_truncation)] // integer minor units
    let price = number("price").map_or(0, |p| p.trunc() as i64);

    let variants = get("variant-map")
        .map(|raw| parse_variant_map(&id, &raw))
        .unwrap_or_default();

    Ok(Product {
        handle: get("handle").unwrap_or_default(),
        title: get("title").unwrap_or_default(),
        kind,
        shape: get("shape"),
        carat_weight,
        carat_range,
        price,
        facets: Facets {
            color: get("color"),
            clarity: get("clarity"),
            diamond_type: get("diamond-type"),
            gemstone_type: get("gemstone-type"),
            treatment: get("treatment"),
            cut: get("cut"),
            polish: get("polish"),
            symmetry: get("symmetry"),
            fluorescence: get("fluorescence"),
            metal_type: get("metal"),
            style: get("style"),
            certification_lab: get("certification"),
            origin: get("origin"),
        },
        default_variant_id: variants.first().map(|v: &SettingVariant| v.variant_id.clone()),
        variants,
        image: get("image"),
        id,
    })
}

fn parse_variant_map(product_id: &str, raw: &str) -> Vec<SettingVariant> {
    match serde_json::from_str::<Vec<VariantMapEntry>>(raw) {
        Ok(entries) => entries
            .into_iter()
            .map(|e| SettingVariant {
                variant_id: match e.id {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                },
                min_carat: e.min,
                max_carat: e.max,
                metal_type: non_empty(&e.metal_type),
                metal_weight: non_empty(&e.metal_weight),
                center_stone_shape: non_empty(&e.center_stone_shape),
                image: e.image,
                #[allow(clippy::cast_possible_truncation)] // integer minor units
                price: e.price.filter(|p| p.is_finite()).map(|p| p.trunc() as i64),
            })
            .collect(),
        Err(e) => {
            tracing::warn!(product_id, error = %e, "ignoring unreadable variant map");
            Vec::new()
        }
    }
}
