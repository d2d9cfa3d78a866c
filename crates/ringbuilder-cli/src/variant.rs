//! `resolve-variant`: which setting variant a centre stone needs.

use std::path::Path;

use ringbuilder_engine::{find_product, load_catalog, resolve_variant};

/// Prints the variant sized for `carat`, or the default variant when none
/// of the setting's size spans contains it.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the product is not in
/// it, or the product has no variant at all.
pub(crate) fn run_resolve_variant(catalog: &Path, product_id: &str, carat: f64) -> anyhow::Result<()> {
    let products = load_catalog(catalog)?;
    let product = find_product(&products, product_id)?;

    if let Some(variant) = resolve_variant(product, carat) {
        println!(
            "{} ({}-{} ct{})",
            variant.variant_id,
            variant.min_carat,
            variant.max_carat,
            variant
                .metal_type
                .as_deref()
                .map(|m| format!(", {m}"))
                .unwrap_or_default()
        );
        return Ok(());
    }

    let fallback = product.fallback_variant_id().ok_or_else(|| {
        anyhow::anyhow!("product {product_id} has no variant to fall back to")
    })?;
    tracing::info!(product_id, carat, "no size span matches, using default variant");
    println!("{fallback} (default)");
    Ok(())
}
