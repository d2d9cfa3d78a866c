//! Best-effort inference of shape and carat from a product handle.
//!
//! Handles are slugs such as `"oval-lab-diamond-8-02-ct-f-vs1"`. They were
//! never meant to carry structured data, so every extractor here returns
//! `None` rather than guessing when the pattern is not present.

use std::sync::LazyLock;

use regex::Regex;

use ringbuilder_core::{CaratRange, Product, Shape};

static HANDLE_CARAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)[-_](\d+)[-_]?ct").expect("valid carat regex"));

static SHAPE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)(\w+)-cut").expect("valid cut regex"),
        Regex::new(r"(?i)(\w+)-shape").expect("valid shape regex"),
        Regex::new(r"(?i)(\w+)-(stone|ring|setting|pendant|sapphire|ruby|emerald|diamond)")
            .expect("valid noun regex"),
    ]
});

static LEADING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+-").expect("valid leading digits regex"));

/// What could be learned about a selected product.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Inference {
    pub shape: Option<Shape>,
    /// Weight of a selected gemstone.
    pub carat: Option<f64>,
    /// Centre-stone span of a selected setting.
    pub carat_range: Option<CaratRange>,
}

impl Inference {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shape.is_none() && self.carat.is_none() && self.carat_range.is_none()
    }

    /// Fills fields that `self` lacks from `other`.
    #[must_use]
    pub fn or(self, other: Inference) -> Inference {
        Inference {
            shape: self.shape.or(other.shape),
            carat: self.carat.or(other.carat),
            carat_range: self.carat_range.or(other.carat_range),
        }
    }
}

/// Reads a carat weight encoded as `"<whole>-<fraction>ct"`, so `8-02-ct`
/// and `8_02ct` both yield `8.02`. Non-positive values are ignored.
#[must_use]
pub fn carat_from_handle(handle: &str) -> Option<f64> {
    let caps = HANDLE_CARAT.captures(handle)?;
    let value = format!("{}.{}", &caps[1], &caps[2]).parse::<f64>().ok()?;
    (value > 0.0).then_some(value)
}

/// Returns the first shape, in [`Shape::ALL`] order, whose name occurs
/// anywhere in the lowercased handle.
///
/// When several shape names occur the table order decides, not their
/// position in the handle.
#[must_use]
pub fn shape_from_handle(handle: &str) -> Option<Shape> {
    let lower = handle.to_lowercase();
    Shape::ALL
        .into_iter()
        .find(|s| lower.contains(&s.as_str().to_lowercase()))
}

/// Tries the `<word>-cut`, `<word>-shape` and `<word>-<noun>` patterns,
/// accepting a capture only when it names a known shape.
#[must_use]
pub fn shape_from_patterns(handle: &str) -> Option<Shape> {
    SHAPE_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(handle)
            .and_then(|caps| Shape::from_name(&caps[1]))
    })
}

/// Handle-only inference: table scan then secondary patterns for the shape,
/// plus the encoded carat weight.
#[must_use]
pub fn infer_from_handle(handle: &str) -> Inference {
    let inference = Inference {
        shape: shape_from_handle(handle).or_else(|| shape_from_patterns(handle)),
        carat: carat_from_handle(handle),
        carat_range: None,
    };
    tracing::debug!(handle, ?inference, "inferred selection from handle");
    inference
}

/// Inference from a product already present in the catalog.
#[must_use]
pub fn infer_from_product(product: &Product) -> Inference {
    Inference {
        shape: product.shape_label().and_then(Shape::from_name),
        carat: product.carat(),
        carat_range: product.valid_carat_range(),
    }
}

/// Handles worth trying when looking a selection up on the storefront, in
/// order: the handle itself, the handle without a leading numeric prefix,
/// and its last three dash-separated segments. Duplicates are dropped.
#[must_use]
pub fn lookup_handles(handle: &str) -> Vec<String> {
    let handle = handle.trim().to_lowercase();
    let stripped = LEADING_DIGITS.replace(&handle, "").into_owned();
    let segments: Vec<&str> = handle.split('-').collect();
    let tail = segments[segments.len().saturating_sub(3)..].join("-");

    let mut candidates: Vec<String> = Vec::with_capacity(3);
    for candidate in [handle, stripped, tail] {
        if !candidate.is_empty() && !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- carat

    #[test]
    fn carat_from_dash_handle() {
        assert_eq!(carat_from_handle("oval-lab-diamond-8-02-ct-f-vs1"), Some(8.02));
    }

    #[test]
    fn carat_from_underscore_handle() {
        assert_eq!(carat_from_handle("round_1_5ct"), Some(1.5));
    }

    #[test]
    fn carat_absent_without_pattern() {
        assert_eq!(carat_from_handle("classic-solitaire"), None);
        assert_eq!(carat_from_handle("stone-0-00-ct"), None);
    }

    // ---- shape

    #[test]
    fn shape_uses_table_order_not_position() {
        assert_eq!(shape_from_handle("oval-or-round-diamond"), Some(Shape::Round));
    }

    #[test]
    fn shape_matches_inside_words() {
        assert_eq!(shape_from_handle("PEARSHAPED-gem"), Some(Shape::Pear));
    }

    #[test]
    fn shape_patterns_require_known_shape() {
        assert_eq!(shape_from_patterns("fancy-cut-stone"), None);
        assert_eq!(shape_from_patterns("heart-shape"), Some(Shape::Heart));
    }

    #[test]
    fn infer_from_handle_combines_fields() {
        let inference = infer_from_handle("cushion-lab-diamond-2-10-ct");
        assert_eq!(inference.shape, Some(Shape::Cushion));
        assert_eq!(inference.carat, Some(2.1));
        assert_eq!(inference.carat_range, None);
    }

    #[test]
    fn infer_from_handle_may_find_nothing() {
        assert!(infer_from_handle("signature-setting").is_empty());
    }

    #[test]
    fn inference_or_fills_gaps() {
        let fetched = Inference {
            shape: None,
            carat: Some(1.2),
            carat_range: None,
        };
        let parsed = Inference {
            shape: Some(Shape::Oval),
            carat: Some(9.9),
            carat_range: None,
        };
        let merged = fetched.or(parsed);
        assert_eq!(merged.shape, Some(Shape::Oval));
        assert_eq!(merged.carat, Some(1.2));
    }

    // ---- lookup handles

    #[test]
    fn lookup_handles_strategies() {
        assert_eq!(
            lookup_handles("123-oval-lab-diamond-2-ct"),
            [
                "123-oval-lab-diamond-2-ct",
                "oval-lab-diamond-2-ct",
                "diamond-2-ct"
            ]
        );
    }

    #[test]
    fn lookup_handles_dedupes_short_handles() {
        assert_eq!(lookup_handles("Halo-Setting"), ["halo-setting"]);
    }
}
