//! Compatibility filter: narrows one side of the catalog by what the
//! selection on the other side implies.
//!
//! Every rule is an independent AND and every rule is permissive about
//! missing data. A setting with no shape or no usable carat range is never
//! excluded by the rule that would need it.

use ringbuilder_core::{Product, ProductKind, Shape};

use crate::context::SelectionContext;

fn shape_conflicts(product: &Product, shape: Shape) -> bool {
    product
        .shape_label()
        .is_some_and(|label| !label.eq_ignore_ascii_case(shape.as_str()))
}

/// Whether `product` survives every compatibility rule that applies to it.
/// Products classified as neither gemstone nor setting are never shown.
#[must_use]
pub fn is_compatible(product: &Product, context: &SelectionContext) -> bool {
    match product.kind {
        ProductKind::Setting => {
            if context.gemstone_handle.is_some() {
                if let Some(shape) = context.implied_shape {
                    if shape_conflicts(product, shape) {
                        return false;
                    }
                }
            }
            if let Some(carat) = context.implied_carat {
                if let Some(range) = product.valid_carat_range() {
                    if !range.contains(carat) {
                        return false;
                    }
                }
            }
            true
        }
        ProductKind::Gemstone => {
            if context.setting_handle.is_some() {
                if let Some(shape) = context.setting_shape {
                    if shape_conflicts(product, shape) {
                        return false;
                    }
                }
            }
            if let Some(range) = context.setting_carat_range {
                if let Some(carat) = product.carat() {
                    if !range.contains(carat) {
                        return false;
                    }
                }
            }
            true
        }
        ProductKind::Other => false,
    }
}

/// Products compatible with the selection, in catalog order.
pub fn compatible_set<'a, I>(products: I, context: &SelectionContext) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    products
        .into_iter()
        .filter(|p| is_compatible(p, context))
        .collect()
}

#[cfg(test)]
mod tests {
    use ringbuilder_core::{CaratRange, Facets};

    use super::*;

    fn product(id: &str, kind: ProductKind, shape: &str) -> Product {
        Product {
            id: id.to_string(),
            handle: id.to_string(),
            title: String::new(),
            kind,
            shape: Some(shape.to_string()),
            carat_weight: None,
            carat_range: None,
            price: 0,
            facets: Facets::default(),
            variants: vec![],
            default_variant_id: None,
            image: None,
        }
    }

    fn setting(id: &str, shape: &str, min: f64, max: f64) -> Product {
        Product {
            carat_range: Some(CaratRange::new(min, max)),
            ..product(id, ProductKind::Setting, shape)
        }
    }

    fn gemstone(id: &str, shape: &str, carat: Option<f64>) -> Product {
        Product {
            carat_weight: carat,
            ..product(id, ProductKind::Gemstone, shape)
        }
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.clone()).collect()
    }

    fn gemstone_context(shape: Option<Shape>, carat: Option<f64>) -> SelectionContext {
        SelectionContext {
            gemstone_handle: Some("chosen-stone".to_string()),
            implied_shape: shape,
            implied_carat: carat,
            ..SelectionContext::default()
        }
    }

    #[test]
    fn empty_context_keeps_gemstones_and_settings() {
        let items = [
            gemstone("g", "Round", Some(1.0)),
            setting("s", "Oval", 1.0, 2.0),
            product("o", ProductKind::Other, ""),
        ];
        assert_eq!(
            ids(&compatible_set(&items, &SelectionContext::default())),
            ["g", "s"]
        );
    }

    #[test]
    fn shape_rule_skips_shapeless_settings() {
        let context = gemstone_context(Some(Shape::Round), None);
        assert!(is_compatible(&setting("a", "", 1.0, 2.0), &context));
        assert!(!is_compatible(&setting("b", "Oval", 1.0, 2.0), &context));
        assert!(is_compatible(&setting("c", "round", 1.0, 2.0), &context));
    }

    #[test]
    fn shape_rule_needs_gemstone_selection() {
        let context = SelectionContext {
            implied_shape: Some(Shape::Round),
            ..SelectionContext::default()
        };
        assert!(is_compatible(&setting("b", "Oval", 1.0, 2.0), &context));
    }

    #[test]
    fn carat_rule_only_applies_to_valid_ranges() {
        let context = gemstone_context(None, Some(1.5));
        assert!(is_compatible(&setting("in", "", 1.0, 2.0), &context));
        assert!(!is_compatible(&setting("out", "", 5.0, 6.0), &context));
        assert!(is_compatible(&setting("zero", "", 0.0, 0.0), &context));
        assert!(is_compatible(&product("none", ProductKind::Setting, ""), &context));
    }

    #[test]
    fn setting_selection_narrows_gemstones() {
        let context = SelectionContext {
            setting_handle: Some("oval-halo".to_string()),
            setting_shape: Some(Shape::Oval),
            setting_carat_range: Some(CaratRange::new(1.0, 1.49)),
            ..SelectionContext::default()
        };
        assert!(is_compatible(&gemstone("fits", "Oval", Some(1.2)), &context));
        assert!(!is_compatible(&gemstone("heavy", "Oval", Some(2.0)), &context));
        assert!(!is_compatible(&gemstone("round", "Round", Some(1.2)), &context));
        assert!(is_compatible(&gemstone("unknown", "", None), &context));
    }

    #[test]
    fn gemstone_driven_scenario() {
        let items = [
            setting("1", "Round", 1.0, 2.0),
            setting("2", "Oval", 1.0, 2.0),
            setting("3", "", 5.0, 6.0),
        ];
        let context = gemstone_context(Some(Shape::Round), Some(1.5));
        assert_eq!(ids(&compatible_set(&items, &context)), ["1"]);
    }
}
