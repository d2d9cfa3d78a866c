//! Storefront AJAX API shapes.
//!
//! ### `GET /products/{handle}.js`
//! IDs are bare numbers and variant options are flattened into `option1`,
//! `option2`, `option3` in the product's option order. Ring settings put the
//! centre-stone size in `option2`, e.g. `"1.00 - 1.49 ct"`.
//!
//! The AJAX endpoint only includes metafields when the theme exposes them,
//! under `metafields.custom`. Values may be strings or numbers, so they are
//! kept as raw JSON and coerced on read.
//!
//! ### `POST /cart/add.js`
//! Body `{"items": [{"id": <variant id>, "quantity": n}]}`. Failures come back
//! as 4xx with a `description` field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ringbuilder_engine::CartLine;

#[derive(Debug, Clone, Deserialize)]
pub struct StorefrontProduct {
    pub id: u64,

    #[serde(default)]
    pub handle: String,

    #[serde(default)]
    pub title: String,

    #[serde(rename = "type", default)]
    pub product_type: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub variants: Vec<StorefrontVariant>,

    #[serde(default)]
    pub metafields: Option<StorefrontMetafields>,
}

impl StorefrontProduct {
    /// A `custom` metafield as text. Numbers are rendered, blanks are `None`.
    #[must_use]
    pub fn custom_metafield(&self, key: &str) -> Option<String> {
        let value = self.metafields.as_ref()?.custom.get(key)?;
        let text = match value {
            serde_json::Value::String(s) => s.trim().to_owned(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    #[must_use]
    pub fn variant(&self, variant_id: &str) -> Option<&StorefrontVariant> {
        self.variants
            .iter()
            .find(|v| v.id.to_string() == variant_id.trim())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorefrontMetafields {
    #[serde(default)]
    pub custom: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorefrontVariant {
    pub id: u64,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub option1: Option<String>,

    /// Centre-stone size for ring settings.
    #[serde(default)]
    pub option2: Option<String>,

    #[serde(default)]
    pub option3: Option<String>,

    /// Price in minor units.
    #[serde(default)]
    pub price: Option<i64>,
}

/// Request body for `POST /cart/add.js`.
#[derive(Debug, Serialize)]
pub struct AddToCartRequest {
    pub items: Vec<CartItem>,
}

#[derive(Debug, Serialize)]
pub struct CartItem {
    /// Numeric variant IDs are sent as numbers, anything else as text.
    pub id: serde_json::Value,
    pub quantity: u32,
}

impl AddToCartRequest {
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        Self {
            items: lines
                .iter()
                .map(|line| CartItem {
                    id: line
                        .id
                        .trim()
                        .parse::<u64>()
                        .map_or_else(|_| serde_json::Value::from(line.id.clone()), serde_json::Value::from),
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

/// Error body returned by the cart endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct CartErrorBody {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
