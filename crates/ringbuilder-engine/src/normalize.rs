//! Normalization from raw storefront records ([`crate::types`]) to
//! [`ringbuilder_core::Product`].
//!
//! String parsing is delegated to [`crate::parse`]; this module focuses on
//! picking the right source field for each product attribute.

use std::collections::BTreeMap;

use ringbuilder_core::{CaratRange, Facets, Product, ProductKind, SettingVariant, Shape};

use crate::classify::classify;
use crate::error::EngineError;
use crate::parse::{
    certificate_lab, extract_metal, metafield_display_value, parse_carat_weight_range,
    parse_price_minor, parse_size_range,
};
use crate::parse_helpers::{non_empty, parse_leading_float};
use crate::types::{RawCatalog, RawProduct, RawVariant};

/// Parses a catalog export and normalizes every product in it.
///
/// Products without an ID are skipped with a warning; every other data
/// problem degrades to an absent attribute.
///
/// # Errors
///
/// Returns [`EngineError::Deserialize`] if `json` is not a valid catalog.
pub fn parse_catalog(json: &str) -> Result<Vec<Product>, EngineError> {
    let catalog: RawCatalog =
        serde_json::from_str(json).map_err(|source| EngineError::Deserialize {
            context: "catalog".to_string(),
            source,
        })?;

    let total = catalog.products.len();
    let products: Vec<Product> = catalog
        .products
        .into_iter()
        .filter_map(|raw| match normalize_product(raw) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(error = %e, "skipping catalog product");
                None
            }
        })
        .collect();

    tracing::info!(total, loaded = products.len(), "catalog normalized");
    Ok(products)
}

/// Normalizes a raw storefront product into a [`Product`].
///
/// # Errors
///
/// Returns [`EngineError::MissingProductId`] if the record has no ID.
pub fn normalize_product(raw: RawProduct) -> Result<Product, EngineError> {
    let id = raw
        .id
        .as_ref()
        .map(crate::types::RawId::short)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| EngineError::MissingProductId {
            context: format!("handle \"{}\"", raw.handle),
        })?;

    let kind = classify(raw.product_type.as_deref(), &raw.tags).kind();
    let meta = |key: &str| -> Option<String> {
        raw.metafields
            .get(key)
            .map(|v| metafield_display_value(v))
            .and_then(|v| non_empty(&v))
    };

    let shape = resolve_shape(kind, &raw.metafields, &raw.tags, &raw.title);
    tracing::debug!(product_id = %id, ?kind, shape = ?shape, "resolved product shape");

    let carat_weight = meta("stone_weight").and_then(|w| parse_leading_float(&w));

    let setting = (kind == ProductKind::Setting).then(|| setting_data(&raw.variants));

    let metal_type = match &setting {
        Some(data) if !data.metals.is_empty() => Some(data.metals.join(", ")),
        _ => meta("metal_type"),
    };

    let facets = Facets {
        color: meta("stone_color"),
        clarity: meta("stone_clarity"),
        diamond_type: meta("lab_diamond_type"),
        gemstone_type: meta("gemstone_type").or_else(|| meta("lab_diamond_type")),
        treatment: meta("treatment"),
        cut: meta("cut_grade"),
        polish: meta("polish_grade"),
        symmetry: meta("symmetry_grade"),
        fluorescence: meta("fluorescence"),
        metal_type,
        style: meta("ring_style"),
        certification_lab: raw
            .metafields
            .get("certificate")
            .and_then(|c| certificate_lab(c)),
        origin: meta("origin"),
    };

    let price = raw.price.as_deref().map_or_else(
        || {
            raw.variants
                .iter()
                .filter_map(|v| v.price.as_deref())
                .map(parse_price_minor)
                .min()
                .unwrap_or(0)
        },
        parse_price_minor,
    );

    let default_variant_id = raw.variants.first().map(|v| v.id.short());
    let (carat_range, variants) = match setting {
        Some(data) => (data.range, data.variants),
        None => (None, Vec::new()),
    };

    Ok(Product {
        id,
        handle: raw.handle,
        title: raw.title,
        kind,
        shape,
        carat_weight,
        carat_range,
        price,
        facets,
        variants,
        default_variant_id,
        image: raw.featured_image,
    })
}

/// Resolves a product's shape: the shape metafield first (stone shape for
/// gemstones, centre-stone shape otherwise), then a tag equal to a known
/// shape, then the known shape that occurs earliest in the title.
#[must_use]
pub fn resolve_shape<S: AsRef<str>>(
    kind: ProductKind,
    metafields: &BTreeMap<String, String>,
    tags: &[S],
    title: &str,
) -> Option<String> {
    let key = if kind == ProductKind::Gemstone {
        "stone_shape"
    } else {
        "center_stone_shape"
    };
    if let Some(shape) = metafields
        .get(key)
        .map(|v| metafield_display_value(v))
        .and_then(|v| non_empty(&v))
    {
        return Some(shape);
    }

    if let Some(shape) = tags.iter().find_map(|t| Shape::from_name(t.as_ref())) {
        return Some(shape.as_str().to_string());
    }

    let title = title.to_lowercase();
    Shape::ALL
        .into_iter()
        .filter_map(|s| {
            title
                .find(&s.as_str().to_lowercase())
                .map(|pos| (pos, s))
        })
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, s)| s.as_str().to_string())
}

struct SettingData {
    range: Option<CaratRange>,
    variants: Vec<SettingVariant>,
    metals: Vec<String>,
}

fn setting_data(raw_variants: &[RawVariant]) -> SettingData {
    let mut range: Option<CaratRange> = None;
    let mut variants = Vec::new();
    let mut metals: Vec<String> = Vec::new();

    for variant in raw_variants {
        let metal_label = variant
            .metafield("metal_type")
            .or_else(|| variant.option("Metal Type"));
        if let Some(metal) = metal_label.and_then(extract_metal) {
            if !metals.iter().any(|m| m == metal) {
                metals.push(metal.to_string());
            }
        }

        let size = match variant.metafield("center_stone_carat_weight") {
            Some(weight) => parse_carat_weight_range(weight),
            None => variant
                .option("Size")
                .filter(|s| s.contains("ct"))
                .and_then(parse_size_range),
        };

        if let Some(size) = size {
            range = Some(range.map_or(size, |r| r.union(size)));
            variants.push(SettingVariant {
                variant_id: variant.id.short(),
                min_carat: size.min,
                max_carat: size.max,
                metal_type: metal_label.and_then(non_empty),
                metal_weight: variant.metafield("metal_weight").and_then(non_empty),
                center_stone_shape: variant
                    .metafield("center_stone_shape")
                    .map(metafield_display_value)
                    .and_then(|v| non_empty(&v)),
                image: variant.image.clone(),
                price: variant.price.as_deref().map(parse_price_minor),
            });
        }
    }

    SettingData {
        range,
        variants,
        metals,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
