//! Raw storefront catalog records, as exported from the store before the
//! builder parses them into [`ringbuilder_core::Product`].
//!
//! ### IDs
//! Product and variant IDs arrive either as admin GIDs
//! (`"gid://shopify/Product/8123456789"`) or as bare numbers. Both deserialize
//! into [`RawId`]; normalization keeps only the trailing numeric segment.
//!
//! ### Metafields
//! Metafields are flattened to a `key -> value` map. Values are the raw
//! metafield strings: plain text (`"1.03"`), JSON lists
//! (`"[\"center_stone_shape.round\"]"`), reference slugs
//! (`"stone_color.d"`), or unresolved metaobject GIDs.
//!
//! Product metafield keys read by the builder: `stone_shape`, `stone_color`,
//! `stone_clarity`, `stone_weight`, `lab_diamond_type`, `gemstone_type`,
//! `treatment`, `cut_grade`, `polish_grade`, `symmetry_grade`,
//! `fluorescence`, `certificate`, `center_stone_shape`, `ring_style`,
//! `metal_type`, `origin`.
//!
//! Variant metafield keys: `metal_type`, `center_stone_carat_weight`,
//! `metal_weight`, `center_stone_shape`.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level catalog export.
#[derive(Debug, Deserialize)]
pub struct RawCatalog {
    pub products: Vec<RawProduct>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    /// The trailing segment of a GID, or the number rendered as text.
    #[must_use]
    pub fn short(&self) -> String {
        match self {
            RawId::Text(s) => crate::parse::extract_id(s).to_string(),
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    #[serde(default)]
    pub id: Option<RawId>,

    #[serde(default)]
    pub handle: String,

    #[serde(default)]
    pub title: String,

    /// Declared product type, e.g. `"Lab Diamond"` or `"Ring Setting"`.
    #[serde(default)]
    pub product_type: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Minimum variant price as a decimal string, e.g. `"1250.00"`. Falls back
    /// to the cheapest variant price when absent.
    #[serde(default)]
    pub price: Option<String>,

    #[serde(default)]
    pub featured_image: Option<String>,

    #[serde(default)]
    pub metafields: BTreeMap<String, String>,

    #[serde(default)]
    pub variants: Vec<RawVariant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVariant {
    pub id: RawId,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub price: Option<String>,

    /// Selected options in display order, e.g. `Metal Type` then `Size`.
    #[serde(default)]
    pub options: Vec<RawOption>,

    #[serde(default)]
    pub metafields: BTreeMap<String, String>,

    #[serde(default)]
    pub image: Option<String>,
}

impl RawVariant {
    /// Value of the option with exactly this name.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.value.as_str())
    }

    #[must_use]
    pub fn metafield(&self, key: &str) -> Option<&str> {
        self.metafields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOption {
    pub name: String,
    pub value: String,
}
