use serde::{Deserialize, Serialize};

use ringbuilder_core::Product;

use crate::error::EngineError;
use crate::variant::variant_id_for_carat_or_default;

/// One line item for the storefront cart endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn new(id: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }
}

/// Cart lines for "add both": the gemstone's default variant and the
/// setting variant sized for `target_carat` (or, failing that, for the
/// gemstone's own weight), falling back to the setting's default variant.
///
/// # Errors
///
/// Returns [`EngineError::WrongKind`] when either product is on the wrong
/// side and [`EngineError::MissingVariant`] when a product has no variant
/// at all.
pub fn cart_lines_for_pair(
    gemstone: &Product,
    setting: &Product,
    target_carat: Option<f64>,
) -> Result<Vec<CartLine>, EngineError> {
    if !gemstone.is_gemstone() {
        return Err(EngineError::WrongKind {
            product_id: gemstone.id.clone(),
            expected: "gemstone",
        });
    }
    if !setting.is_setting() {
        return Err(EngineError::WrongKind {
            product_id: setting.id.clone(),
            expected: "setting",
        });
    }

    let gemstone_variant =
        gemstone
            .fallback_variant_id()
            .ok_or_else(|| EngineError::MissingVariant {
                product_id: gemstone.id.clone(),
            })?;
    let carat = target_carat.or_else(|| gemstone.carat());
    let setting_variant = variant_id_for_carat_or_default(setting, carat).ok_or_else(|| {
        EngineError::MissingVariant {
            product_id: setting.id.clone(),
        }
    })?;

    Ok(vec![
        CartLine::new(gemstone_variant, 1),
        CartLine::new(setting_variant, 1),
    ])
}
