//! Text and link outputs derived from the current view.

use serde::Serialize;

use ringbuilder_core::Product;

use crate::context::SelectionContext;
use crate::metal::Personalized;
use crate::pagination::PageWindow;
use crate::query::{encode_component, QueryParams};
use crate::variant::resolve_variant;

/// `"Showing 1-24 of 130 products"`, with `filtered ` before `products`
/// when a filter or compatibility rule narrows the list.
#[must_use]
pub fn results_summary(start: usize, end: usize, total: usize, filtered: bool) -> String {
    if total == 0 {
        return "No products found".to_string();
    }
    let filtered = if filtered { "filtered " } else { "" };
    format!("Showing {start}-{end} of {total} {filtered}products")
}

fn handle_words(handle: &str) -> String {
    handle.replace('-', " ")
}

fn format_carat(carat: f64) -> String {
    let rounded = (carat * 100.0).round() / 100.0;
    rounded.to_string()
}

/// The banner shown above the grid when one side of the pairing is
/// already chosen. `None` when nothing or both sides are chosen.
#[must_use]
pub fn context_banner(context: &SelectionContext) -> Option<String> {
    match (&context.gemstone_handle, &context.setting_handle) {
        (Some(gemstone), None) => {
            let mut parts = Vec::new();
            if let Some(shape) = context.implied_shape {
                parts.push(format!("{shape} shape"));
            }
            if let Some(carat) = context.implied_carat {
                parts.push(format!("{} ct", format_carat(carat)));
            }
            if parts.is_empty() {
                Some(format!("Selecting a setting for your {}", handle_words(gemstone)))
            } else {
                Some(format!(
                    "Showing settings compatible with your {} diamond",
                    parts.join(", ")
                ))
            }
        }
        (None, Some(setting)) => Some(match context.setting_shape {
            Some(shape) => format!("Showing {shape} diamonds compatible with your setting"),
            None => format!("Selecting a diamond for your {}", handle_words(setting)),
        }),
        _ => None,
    }
}

/// Product page link carrying the selection so the pairing survives the
/// navigation. Settings also carry the `variant` sized for the selected
/// gemstone when one matches.
#[must_use]
pub fn select_url(product: &Product, context: &SelectionContext, variant: Option<&str>) -> String {
    let mut params = context.to_params();

    let carat_variant = if product.is_setting() {
        context
            .implied_carat
            .and_then(|carat| resolve_variant(product, carat))
            .map(|v| v.variant_id.as_str())
    } else {
        None
    };
    if let Some(variant) = carat_variant.or(variant) {
        params.append("variant", variant);
    }

    let path = format!("/products/{}", encode_component(&product.handle));
    if params.is_empty() {
        path
    } else {
        format!("{path}?{params}")
    }
}

/// Query string for another page of the same view.
#[must_use]
pub fn page_query(base: &QueryParams, page: usize) -> String {
    let mut params = base.clone();
    params.retain_keys(|k| k != "page");
    if page > 1 {
        params.append("page", &page.to_string());
    }
    params.to_query_string()
}

/// One displayed card with its select link, and the price and image after
/// metal personalization.
#[derive(Debug, Clone, Serialize)]
pub struct ViewItem<'a> {
    #[serde(flatten)]
    pub item: Personalized<'a>,
    pub url: String,
    pub price: i64,
    pub image: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub page: usize,
    pub query: String,
}

/// Everything a renderer needs for one page of the builder.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot<'a> {
    pub items: Vec<ViewItem<'a>>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub summary: String,
    pub banner: Option<String>,
    pub query: String,
    pub window: PageWindow,
    pub page_links: Vec<PageLink>,
}

#[cfg(test)]
mod tests {
    use ringbuilder_core::{Facets, ProductKind, SettingVariant, Shape};

    use super::*;

    fn gemstone_context(shape: Option<Shape>, carat: Option<f64>) -> SelectionContext {
        SelectionContext {
            gemstone_handle: Some("oval-lab-diamond".to_string()),
            implied_shape: shape,
            implied_carat: carat,
            ..SelectionContext::default()
        }
    }

    fn setting() -> Product {
        Product {
            id: "9".to_string(),
            handle: "halo-setting".to_string(),
            title: String::new(),
            kind: ProductKind::Setting,
            shape: None,
            carat_weight: None,
            carat_range: None,
            price: 0,
            facets: Facets::default(),
            variants: vec![SettingVariant {
                variant_id: "71".to_string(),
                min_carat: 1.0,
                max_carat: 1.99,
                metal_type: None,
                metal_weight: None,
                center_stone_shape: None,
                image: None,
                price: None,
            }],
            default_variant_id: None,
            image: None,
        }
    }

    // ---- summary

    #[test]
    fn summary_counts() {
        assert_eq!(results_summary(1, 24, 130, false), "Showing 1-24 of 130 products");
        assert_eq!(
            results_summary(25, 30, 30, true),
            "Showing 25-30 of 30 filtered products"
        );
        assert_eq!(results_summary(0, 0, 0, true), "No products found");
    }

    // ---- banner

    #[test]
    fn banner_for_gemstone_with_shape_and_carat() {
        let banner = context_banner(&gemstone_context(Some(Shape::Oval), Some(1.5)));
        assert_eq!(
            banner.as_deref(),
            Some("Showing settings compatible with your Oval shape, 1.5 ct diamond")
        );
    }

    #[test]
    fn banner_for_gemstone_without_inference() {
        let banner = context_banner(&gemstone_context(None, None));
        assert_eq!(banner.as_deref(), Some("Selecting a setting for your oval lab diamond"));
    }

    #[test]
    fn banner_for_setting() {
        let mut context = SelectionContext {
            setting_handle: Some("pear-halo".to_string()),
            ..SelectionContext::default()
        };
        assert_eq!(
            context_banner(&context).as_deref(),
            Some("Selecting a diamond for your pear halo")
        );
        context.setting_shape = Some(Shape::Pear);
        assert_eq!(
            context_banner(&context).as_deref(),
            Some("Showing Pear diamonds compatible with your setting")
        );
    }

    #[test]
    fn no_banner_when_both_or_neither_selected() {
        assert_eq!(context_banner(&SelectionContext::default()), None);
        let both = SelectionContext {
            gemstone_handle: Some("a".to_string()),
            setting_handle: Some("b".to_string()),
            ..SelectionContext::default()
        };
        assert_eq!(context_banner(&both), None);
    }

    // ---- links

    #[test]
    fn select_url_adds_carat_variant_for_settings() {
        let url = select_url(&setting(), &gemstone_context(None, Some(1.5)), None);
        assert_eq!(url, "/products/halo-setting?gemstone=oval-lab-diamond&variant=71");
    }

    #[test]
    fn carat_variant_beats_metal_variant() {
        let url = select_url(&setting(), &gemstone_context(None, Some(1.5)), Some("88"));
        assert!(url.ends_with("variant=71"));
        let url = select_url(&setting(), &gemstone_context(None, Some(4.0)), Some("88"));
        assert!(url.ends_with("variant=88"));
    }

    #[test]
    fn select_url_without_context_is_bare() {
        assert_eq!(
            select_url(&setting(), &SelectionContext::default(), None),
            "/products/halo-setting"
        );
    }

    #[test]
    fn page_query_replaces_page() {
        let base = QueryParams::parse("filter_color=D&page=3");
        assert_eq!(page_query(&base, 2), "filter_color=D&page=2");
        assert_eq!(page_query(&base, 1), "filter_color=D");
    }
}
