//! Maps a centre-stone weight to the setting variant sized for it.

use ringbuilder_core::{Product, SettingVariant};

/// The first variant, in list order, whose carat span contains `carat`
/// inclusively. Where spans share a boundary the earlier variant wins.
#[must_use]
pub fn resolve_variant(setting: &Product, carat: f64) -> Option<&SettingVariant> {
    if !carat.is_finite() {
        return None;
    }
    setting
        .variants
        .iter()
        .find(|v| v.carat_range().contains(carat))
}

/// Variant ID to use for `product`: the carat-resolved variant when a carat
/// is known and matches, otherwise the product's default variant.
#[must_use]
pub fn variant_id_for_carat_or_default(product: &Product, carat: Option<f64>) -> Option<&str> {
    carat
        .and_then(|c| resolve_variant(product, c))
        .map(|v| v.variant_id.as_str())
        .or_else(|| product.fallback_variant_id())
}
