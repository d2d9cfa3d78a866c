//! URL query string handling and view sync.
//!
//! [`QueryParams`] keeps pairs exactly as they appeared (still
//! percent-encoded) so that parameters the builder does not own survive a
//! rewrite byte for byte. Builder-owned parameters are:
//!
//! - `filter_<facet>=v1,v2` for every active facet, with each value encoded
//!   separately and joined by a literal comma
//! - `filter_price-range=<bracket slug>,...` and `filter_price=<min>-<max>`
//!   (major currency units, either side optional)
//! - `filter_carat-range=<min>-<max>,...` where a max of `999` is open-ended
//! - `sort=<key>` when a sort is chosen
//! - `page=<n>` when past the first page

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use ringbuilder_core::CaratRange;

use crate::facets::{Facet, FilterState};
use crate::parse_helpers::parse_leading_float;
use crate::price::{PriceBounds, PriceBracket};
use crate::sort::SortKey;

const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const FILTER_PREFIX: &str = "filter_";
const PRICE_RANGE_KEY: &str = "price-range";
const MANUAL_PRICE_KEY: &str = "price";
const CARAT_RANGE_KEY: &str = "carat-range";

/// Ordered, still-encoded query pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Splits a query string (with or without the leading `?`) into pairs.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let pairs = query
            .trim_start_matches('?')
            .split('&')
            .filter(|piece| !piece.is_empty())
            .map(|piece| match piece.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (piece.to_string(), String::new()),
            })
            .collect();
        Self { pairs }
    }

    /// Decoded value of the first pair named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.raw(key).map(decode_component)
    }

    /// Decoded, non-empty value of the first pair named `key`.
    #[must_use]
    pub fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    /// Comma-separated list value, each element decoded on its own.
    #[must_use]
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.raw(key)
            .map(|raw| {
                raw.split(',')
                    .map(decode_component)
                    .filter(|v| !v.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn raw(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| decode_component(k) == key)
            .map(|(_, v)| v.as_str())
    }

    /// Decoded `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.pairs
            .iter()
            .map(|(k, v)| (decode_component(k), decode_component(v)))
    }

    /// Appends a pair, encoding the value.
    pub fn append(&mut self, key: &str, value: &str) {
        self.pairs
            .push((encode_component(key), encode_component(value)));
    }

    /// Appends a list value: each element encoded, joined with `,`.
    pub fn append_list<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = values
            .into_iter()
            .map(|v| encode_component(v.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        self.pairs.push((encode_component(key), joined));
    }

    /// Keeps only the pairs whose decoded key satisfies `keep`.
    pub fn retain_keys<F: Fn(&str) -> bool>(&mut self, keep: F) {
        self.pairs.retain(|(k, _)| keep(&decode_component(k)));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serializes back to `k=v&k=v` without a leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl std::fmt::Display for QueryParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Decodes a query component, treating `+` as a space.
#[must_use]
pub fn decode_component(value: &str) -> String {
    let spaced = value.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Whether `key` is one the builder rewrites on every state change.
#[must_use]
pub fn is_view_key(key: &str) -> bool {
    key.starts_with(FILTER_PREFIX) || key == "page" || key == "sort"
}

/// Reconstructs the filter state and requested page from a query string.
///
/// Unknown facets, bracket slugs, and malformed ranges are ignored. A
/// missing or unparseable page is page 1.
#[must_use]
pub fn read_view(params: &QueryParams) -> (FilterState, usize) {
    let mut filters = FilterState::default();

    for facet in Facet::ALL {
        for value in params.get_list(&filter_key(facet.key())) {
            filters.select(facet, &value);
        }
    }

    for slug in params.get_list(&filter_key(PRICE_RANGE_KEY)) {
        if let Some(bracket) = PriceBracket::from_slug(&slug) {
            filters.price_brackets.insert(bracket);
        }
    }

    filters.manual_price = params
        .get_non_empty(&filter_key(MANUAL_PRICE_KEY))
        .and_then(|v| PriceBounds::parse_major(&v));

    for range in params.get_list(&filter_key(CARAT_RANGE_KEY)) {
        if let Some(range) = parse_carat_filter(&range) {
            filters.add_carat_range(range);
        }
    }

    filters.sort = params
        .get("sort")
        .map(|s| SortKey::parse(&s))
        .unwrap_or_default();

    let page = params
        .get("page")
        .and_then(|p| p.trim().parse::<usize>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);

    (filters, page)
}

/// Rewrites `base` with the current view: builder-owned keys are dropped and
/// re-added from `filters` and `page`, everything else keeps its position.
#[must_use]
pub fn write_view(base: &QueryParams, filters: &FilterState, page: usize) -> QueryParams {
    let mut params = base.clone();
    params.retain_keys(|k| !is_view_key(k));

    for (facet, values) in &filters.selections {
        if !values.is_empty() {
            params.append_list(&filter_key(facet.key()), values);
        }
    }

    if !filters.price_brackets.is_empty() {
        params.append_list(
            &filter_key(PRICE_RANGE_KEY),
            filters.price_brackets.iter().map(|b| b.slug()),
        );
    }

    if let Some(bounds) = filters.manual_price {
        params.append(&filter_key(MANUAL_PRICE_KEY), &bounds.to_major_string());
    }

    if !filters.carat_ranges.is_empty() {
        params.append_list(
            &filter_key(CARAT_RANGE_KEY),
            filters.carat_ranges.iter().map(format_carat_filter),
        );
    }

    if filters.sort != SortKey::None {
        params.append("sort", filters.sort.as_str());
    }

    if page > 1 {
        params.append("page", &page.to_string());
    }

    params
}

fn filter_key(name: &str) -> String {
    format!("{FILTER_PREFIX}{name}")
}

/// Parses a `"min-max"` carat filter. A missing or zero max is open-ended
/// and stored as `999`.
#[must_use]
pub fn parse_carat_filter(value: &str) -> Option<CaratRange> {
    let (min, max) = value.split_once('-').unwrap_or((value, ""));
    let min = parse_leading_float(min)?;
    let max = parse_leading_float(max)
        .filter(|m| *m > 0.0)
        .unwrap_or(crate::facets::OPEN_CARAT_MAX);
    Some(CaratRange::new(min, max))
}

#[must_use]
pub fn format_carat_filter(range: &CaratRange) -> String {
    format!("{}-{}", range.min, range.max)
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
