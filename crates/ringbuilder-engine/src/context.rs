//! The selection context: what the shopper already picked on the other side
//! of the ring-builder pairing, and what that implies for this page.

use serde::Serialize;

use ringbuilder_core::{CaratRange, Shape};

use crate::infer::{infer_from_handle, Inference};
use crate::query::QueryParams;

pub const GEMSTONE_PARAM: &str = "gemstone";
pub const SETTING_PARAM: &str = "setting";
pub const SETTING_VARIANT_PARAM: &str = "setting_variant";

/// Which side of the pairing a selection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Gemstone,
    Setting,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionContext {
    pub gemstone_handle: Option<String>,
    pub setting_handle: Option<String>,
    /// Variant of the selected setting, only kept alongside `setting_handle`.
    pub setting_variant: Option<String>,
    /// Shape of the selected gemstone. Constrains settings.
    pub implied_shape: Option<Shape>,
    /// Weight of the selected gemstone. Constrains settings.
    pub implied_carat: Option<f64>,
    /// Centre-stone shape of the selected setting. Constrains gemstones.
    pub setting_shape: Option<Shape>,
    /// Size span of the selected setting variant. Constrains gemstones.
    pub setting_carat_range: Option<CaratRange>,
}

impl SelectionContext {
    /// Reads the `gemstone`, `setting` and `setting_variant` parameters and
    /// applies handle-pattern inference to each selected handle.
    ///
    /// Handle inference is only the fallback: anything learned later from
    /// the storefront is merged in with [`SelectionContext::absorb`].
    #[must_use]
    pub fn from_params(params: &QueryParams) -> Self {
        let gemstone_handle = params.get_non_empty(GEMSTONE_PARAM).map(|h| h.trim().to_string());
        let setting_handle = params.get_non_empty(SETTING_PARAM).map(|h| h.trim().to_string());
        let setting_variant = setting_handle
            .as_ref()
            .and(params.get_non_empty(SETTING_VARIANT_PARAM))
            .map(|v| v.trim().to_string());

        let mut context = SelectionContext {
            gemstone_handle,
            setting_handle,
            setting_variant,
            ..SelectionContext::default()
        };

        context.absorb_handle(Side::Gemstone);
        context.absorb_handle(Side::Setting);
        context
    }

    fn absorb_handle(&mut self, side: Side) {
        let Some(handle) = self.handle(side) else {
            return;
        };
        let mut inference = infer_from_handle(handle);
        if side == Side::Setting {
            // A setting handle's carat digits describe the setting, not a stone.
            inference.carat = None;
        }
        self.absorb(side, inference);
    }

    /// Replaces the handle on `side` and forgets everything inferred from
    /// the previous one. A new setting also drops the selected variant.
    pub fn reselect(&mut self, side: Side, handle: Option<&str>) {
        let handle = handle
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string);
        match side {
            Side::Gemstone => {
                self.gemstone_handle = handle;
                self.implied_shape = None;
                self.implied_carat = None;
            }
            Side::Setting => {
                self.setting_handle = handle;
                self.setting_variant = None;
                self.setting_shape = None;
                self.setting_carat_range = None;
            }
        }
        self.absorb_handle(side);
    }

    /// Merges an inference for one side. Fields the inference carries replace
    /// what is already known; absent fields leave it untouched.
    pub fn absorb(&mut self, side: Side, inference: Inference) {
        match side {
            Side::Gemstone => {
                self.implied_shape = inference.shape.or(self.implied_shape);
                self.implied_carat = inference
                    .carat
                    .filter(|c| c.is_finite() && *c > 0.0)
                    .or(self.implied_carat);
            }
            Side::Setting => {
                self.setting_shape = inference.shape.or(self.setting_shape);
            }
        }
    }

    /// Records the span of the selected setting variant's size option.
    pub fn set_setting_variant_range(&mut self, range: CaratRange) {
        if range.is_valid() {
            self.setting_carat_range = Some(range);
        }
    }

    /// Handle of the selection on `side`, if any.
    #[must_use]
    pub fn handle(&self, side: Side) -> Option<&str> {
        match side {
            Side::Gemstone => self.gemstone_handle.as_deref(),
            Side::Setting => self.setting_handle.as_deref(),
        }
    }

    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.gemstone_handle.is_some() || self.setting_handle.is_some()
    }

    /// Whether any compatibility rule currently narrows the catalog.
    #[must_use]
    pub fn is_constrained(&self) -> bool {
        (self.gemstone_handle.is_some() && self.implied_shape.is_some())
            || self.implied_carat.is_some()
            || (self.setting_handle.is_some() && self.setting_shape.is_some())
            || self.setting_carat_range.is_some()
    }

    /// The selection parameters to carry on outgoing product links.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::default();
        if let Some(handle) = &self.gemstone_handle {
            params.append(GEMSTONE_PARAM, handle);
        }
        if let Some(handle) = &self.setting_handle {
            params.append(SETTING_PARAM, handle);
            if let Some(variant) = &self.setting_variant {
                params.append(SETTING_VARIANT_PARAM, variant);
            }
        }
        params
    }
}
