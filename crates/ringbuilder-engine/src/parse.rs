//! String parsing for storefront values: IDs, prices, carat ranges, metal
//! labels, metafield references, and certificates.
//!
//! Every parser is lenient. Malformed input yields `None` (or the documented
//! neutral value) and never an error, so a single bad attribute cannot stop a
//! catalog from loading.

use std::sync::LazyLock;

use regex::Regex;

use ringbuilder_core::CaratRange;

use crate::parse_helpers::{humanize_slug, parse_leading_float};

static FROM_TO_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)from\s+([\d.]+)\s+to\s+([\d.]+)").expect("valid from-to regex")
});

static VARIANT_SIZE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*[-–—]\s*(\d+(?:\.\d+)?)\s*ct").expect("valid size regex")
});

static METAL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(White & Yellow Gold|White & Rose Gold|Yellow & Rose Gold|White Gold|Yellow Gold|Rose Gold|Platinum)",
    )
    .expect("valid metal regex")
});

/// Returns the trailing segment of a `gid://shopify/Product/123` style ID.
/// Plain IDs are returned unchanged.
#[must_use]
pub fn extract_id(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// Converts a decimal amount like `"1250.50"` to minor units (`125050`).
/// Unparseable amounts are `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // catalog prices are far below i64::MAX cents
pub fn parse_price_minor(amount: &str) -> i64 {
    parse_leading_float(amount).map_or(0, |value| (value * 100.0).round() as i64)
}

/// Parses a centre-stone carat metafield such as `"From 5 to 7.99 ct"`,
/// falling back to the `"X-Y ct"` form.
#[must_use]
pub fn parse_carat_weight_range(value: &str) -> Option<CaratRange> {
    if let Some(caps) = FROM_TO_RANGE.captures(value) {
        let min = parse_leading_float(&caps[1]);
        let max = parse_leading_float(&caps[2]);
        if let (Some(min), Some(max)) = (min, max) {
            let range = CaratRange::new(min, max);
            if range.is_valid() {
                return Some(range);
            }
        }
    }
    parse_size_range(value)
}

/// Parses a `"1-1.49 ct"` style size label.
#[must_use]
pub fn parse_size_range(value: &str) -> Option<CaratRange> {
    let cleaned = value.replace(" ct", "");
    let mut parts = cleaned.split('-');
    let min = parse_leading_float(parts.next()?)?;
    let max = parse_leading_float(parts.next()?)?;
    let range = CaratRange::new(min, max);
    range.is_valid().then_some(range)
}

/// Parses a variant size option such as `"1.00 - 1.49 ct"`, accepting
/// hyphen, en dash, or em dash as the separator.
#[must_use]
pub fn parse_variant_size(value: &str) -> Option<CaratRange> {
    let caps = VARIANT_SIZE_RANGE.captures(value)?;
    let min = caps[1].parse::<f64>().ok()?;
    let max = caps[2].parse::<f64>().ok()?;
    Some(CaratRange::new(min, max))
}

/// Finds a known metal name inside a label like `"18k White Gold"`, returning
/// the matched text as written.
#[must_use]
pub fn extract_metal(value: &str) -> Option<&str> {
    METAL_NAME.find(value).map(|m| m.as_str())
}

/// Strips karat prefixes and other decoration from a metal label so that
/// `"18k White Gold"` and `"14k White Gold"` compare equal. Labels without a
/// known metal name are returned trimmed.
#[must_use]
pub fn normalize_metal(value: &str) -> String {
    extract_metal(value)
        .unwrap_or_else(|| value.trim())
        .to_string()
}

/// Resolves a raw metafield string to its display value.
///
/// - JSON lists use their first element.
/// - Unresolved metaobject GIDs resolve to `""`.
/// - Reference slugs like `"center_stone_shape.round"` become `"Round"`.
/// - Anything else is returned as-is, so `"7.5 ct"` stays intact.
#[must_use]
pub fn metafield_display_value(raw: &str) -> String {
    let mut value = raw.trim().to_string();

    if value.starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<serde_json::Value>>(&value) {
            if let Some(first) = list.first() {
                value = match first {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
            }
        }
    }

    if value.contains("gid://shopify") {
        return String::new();
    }

    if value.contains('.') && !value.contains("://") && value.contains('_') {
        let last = value.rsplit('.').next().unwrap_or_default();
        return humanize_slug(last);
    }

    value
}

/// Extracts the laboratory from a certificate string like `"IGI - LG737512445"`.
#[must_use]
pub fn certificate_lab(certificate: &str) -> Option<String> {
    let lab = certificate.split(" - ").next().unwrap_or_default().trim();
    (!lab.is_empty()).then(|| lab.to_string())
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
