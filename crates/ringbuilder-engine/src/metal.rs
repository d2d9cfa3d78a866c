//! Metal personalization for settings.
//!
//! For gemstones and other products the metal facet is an ordinary filter
//! applied in [`crate::facets`]. A setting is usually sold in several metals,
//! so a metal selection instead picks the variant to display (image, price
//! and select-link variant). A setting is hidden only when it offers none of
//! the selected metals.

use serde::Serialize;

use ringbuilder_core::{Product, SettingVariant};

use crate::facets::{Facet, FilterState};
use crate::parse::normalize_metal;

/// A product as it should be displayed, with the variant chosen for the
/// selected metal when one applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Personalized<'a> {
    pub product: &'a Product,
    pub variant: Option<&'a SettingVariant>,
}

impl<'a> Personalized<'a> {
    #[must_use]
    pub fn plain(product: &'a Product) -> Self {
        Self {
            product,
            variant: None,
        }
    }

    /// Image of the personalized variant, else the product image.
    #[must_use]
    pub fn image(&self) -> Option<&'a str> {
        self.variant
            .and_then(|v| v.image.as_deref())
            .or(self.product.image.as_deref())
    }

    /// Price of the personalized variant, else the product price.
    #[must_use]
    pub fn price(&self) -> i64 {
        self.variant
            .and_then(|v| v.price)
            .unwrap_or(self.product.price)
    }
}

/// Normalized metal of one variant.
pub(crate) fn variant_metal(variant: &SettingVariant) -> Option<String> {
    variant
        .metal_type
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .map(normalize_metal)
}

/// Whether the setting offers any of `metals`, either in its metal list or
/// on one of its variants.
#[must_use]
pub fn offers_metal<S: AsRef<str>>(product: &Product, metals: &[S]) -> bool {
    Facet::Metal
        .values(product)
        .iter()
        .any(|m| metals.iter().any(|w| w.as_ref() == m))
}

/// The first variant whose metal matches, trying `metals` in order.
#[must_use]
pub fn metal_variant<'a, S: AsRef<str>>(product: &'a Product, metals: &[S]) -> Option<&'a SettingVariant> {
    metals.iter().find_map(|metal| {
        product
            .variants
            .iter()
            .find(|v| variant_metal(v).is_some_and(|m| m == metal.as_ref()))
    })
}

fn selected_metals(filters: &FilterState) -> Vec<&str> {
    filters
        .selected(Facet::Metal)
        .map(|set| set.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Whether a product survives the metal selection. Only settings are
/// checked here; everything else was already filtered by facet.
#[must_use]
pub fn passes_metal_selection(product: &Product, filters: &FilterState) -> bool {
    let metals = selected_metals(filters);
    if metals.is_empty() || !product.is_setting() {
        return true;
    }
    offers_metal(product, &metals)
}

/// Attaches the variant matching the selected metals to each setting.
/// Products are expected to have passed [`passes_metal_selection`]
/// already. Order is preserved.
#[must_use]
pub fn personalize<'a, I>(products: I, filters: &FilterState) -> Vec<Personalized<'a>>
where
    I: IntoIterator<Item = &'a Product>,
{
    let metals = selected_metals(filters);
    products
        .into_iter()
        .map(|product| {
            let variant = if product.is_setting() && !metals.is_empty() {
                metal_variant(product, &metals)
            } else {
                None
            };
            Personalized { product, variant }
        })
        .collect()
}
