//! Facet filtering: the user-toggled filter dimensions and their
//! intersection over the compatible set.
//!
//! Every active dimension is an independent AND. Within a dimension a
//! product needs to match only one selected value.

use std::collections::{BTreeMap, BTreeSet};

use ringbuilder_core::{CaratRange, Product};

use crate::compat::is_compatible;
use crate::context::SelectionContext;
use crate::metal::{passes_metal_selection, variant_metal};
use crate::parse::normalize_metal;
use crate::price::{price_matches, PriceBounds, PriceBracket};
use crate::sort::SortKey;

/// Carat filter maximum that stands for "and above".
pub const OPEN_CARAT_MAX: f64 = 999.0;

/// Standard carat buckets offered in the filter menu.
pub const CARAT_BUCKETS: [(&str, CaratRange); 4] = [
    ("1-1.99", CaratRange { min: 1.0, max: 1.99 }),
    ("2-2.99", CaratRange { min: 2.0, max: 2.99 }),
    ("3-4.99", CaratRange { min: 3.0, max: 4.99 }),
    ("5ct +", CaratRange { min: 5.0, max: OPEN_CARAT_MAX }),
];

/// String-valued facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facet {
    Shape,
    Color,
    Metal,
    Style,
    Treatment,
    GemstoneType,
    Certification,
    Origin,
}

impl Facet {
    pub const ALL: [Facet; 8] = [
        Facet::Shape,
        Facet::Color,
        Facet::Metal,
        Facet::Style,
        Facet::Treatment,
        Facet::GemstoneType,
        Facet::Certification,
        Facet::Origin,
    ];

    /// Name used in `filter_<key>` query parameters.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Facet::Shape => "shape",
            Facet::Color => "color",
            Facet::Metal => "metal",
            Facet::Style => "style",
            Facet::Treatment => "treatment",
            Facet::GemstoneType => "gemstone-type",
            Facet::Certification => "certification",
            Facet::Origin => "origin",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// The product's values for this facet. Metals are normalized, and a
    /// setting offers both its listed metals and its variants' metals;
    /// every other facet has at most one value.
    #[must_use]
    pub fn values(self, product: &Product) -> Vec<String> {
        let single = |v: Option<&String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .into_iter()
                .collect()
        };
        let facets = &product.facets;
        match self {
            Facet::Shape => product
                .shape_label()
                .map(str::to_string)
                .into_iter()
                .collect(),
            Facet::Color => single(facets.color.as_ref()),
            Facet::Metal => {
                let variant_metals = product
                    .is_setting()
                    .then(|| product.variants.iter().filter_map(variant_metal))
                    .into_iter()
                    .flatten();
                let mut metals: Vec<String> = Vec::new();
                for metal in product.metals().map(normalize_metal).chain(variant_metals) {
                    if !metals.contains(&metal) {
                        metals.push(metal);
                    }
                }
                metals
            }
            Facet::Style => single(facets.style.as_ref()),
            Facet::Treatment => single(facets.treatment.as_ref()),
            Facet::GemstoneType => single(facets.gemstone_type.as_ref()),
            Facet::Certification => single(facets.certification_lab.as_ref()),
            Facet::Origin => single(facets.origin.as_ref()),
        }
    }
}

/// A filter dimension, used to leave one out when counting options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Facet(Facet),
    Price,
    Carat,
}

impl Dimension {
    /// Every facet in [`Facet::ALL`] order, then price, then carat.
    pub fn all() -> impl Iterator<Item = Dimension> {
        Facet::ALL
            .into_iter()
            .map(Dimension::Facet)
            .chain([Dimension::Price, Dimension::Carat])
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Facet(facet) => facet.key(),
            Dimension::Price => "price",
            Dimension::Carat => "carat",
        }
    }
}

/// The user's current filter and sort choices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub selections: BTreeMap<Facet, BTreeSet<String>>,
    /// Selected carat ranges, in selection order, without duplicates.
    pub carat_ranges: Vec<CaratRange>,
    pub price_brackets: BTreeSet<PriceBracket>,
    /// Manual price entry. Takes precedence over `price_brackets`.
    pub manual_price: Option<PriceBounds>,
    pub sort: SortKey,
}

impl FilterState {
    pub fn select(&mut self, facet: Facet, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.selections
                .entry(facet)
                .or_default()
                .insert(value.to_string());
        }
    }

    pub fn deselect(&mut self, facet: Facet, value: &str) {
        if let Some(values) = self.selections.get_mut(&facet) {
            values.remove(value.trim());
            if values.is_empty() {
                self.selections.remove(&facet);
            }
        }
    }

    /// Flips `value` in `facet`. Returns whether it is now selected.
    pub fn toggle(&mut self, facet: Facet, value: &str) -> bool {
        if self.is_selected(facet, value) {
            self.deselect(facet, value);
            false
        } else {
            self.select(facet, value);
            true
        }
    }

    #[must_use]
    pub fn is_selected(&self, facet: Facet, value: &str) -> bool {
        self.selections
            .get(&facet)
            .is_some_and(|values| values.contains(value.trim()))
    }

    /// Selected values for `facet`, if any.
    #[must_use]
    pub fn selected(&self, facet: Facet) -> Option<&BTreeSet<String>> {
        self.selections.get(&facet).filter(|v| !v.is_empty())
    }

    pub fn add_carat_range(&mut self, range: CaratRange) {
        if !self.carat_ranges.contains(&range) {
            self.carat_ranges.push(range);
        }
    }

    pub fn toggle_carat_range(&mut self, range: CaratRange) -> bool {
        if let Some(pos) = self.carat_ranges.iter().position(|r| *r == range) {
            self.carat_ranges.remove(pos);
            false
        } else {
            self.carat_ranges.push(range);
            true
        }
    }

    pub fn toggle_price_bracket(&mut self, bracket: PriceBracket) -> bool {
        if self.price_brackets.remove(&bracket) {
            false
        } else {
            self.price_brackets.insert(bracket);
            true
        }
    }

    /// Clears every filter but keeps the sort.
    pub fn clear_filters(&mut self) {
        self.selections.clear();
        self.carat_ranges.clear();
        self.price_brackets.clear();
        self.manual_price = None;
    }

    /// Whether any filter (not sort) constrains the result.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.selections.values().any(|v| !v.is_empty())
            || !self.carat_ranges.is_empty()
            || !self.price_brackets.is_empty()
            || self.manual_price.is_some()
    }
}

/// Whether a product's carat data matches at least one selected range.
///
/// Settings match when their span overlaps a selection; anything else
/// matches when its own weight falls inside one. Products without carat
/// data never match an active carat filter.
#[must_use]
pub fn carat_matches(product: &Product, ranges: &[CaratRange]) -> bool {
    if ranges.is_empty() {
        return true;
    }
    if product.is_setting() {
        return product
            .carat_range
            .filter(|r| r.min.is_finite() && r.max.is_finite())
            .is_some_and(|span| ranges.iter().any(|r| span.overlaps(r)));
    }
    product
        .carat()
        .is_some_and(|carat| ranges.iter().any(|r| r.contains(carat)))
}

fn facet_matches(product: &Product, facet: Facet, accepted: &BTreeSet<String>) -> bool {
    if accepted.is_empty() {
        return true;
    }
    facet
        .values(product)
        .iter()
        .any(|value| accepted.contains(value))
}

/// Whether a product passes every active dimension except `skip`.
///
/// The metal facet is not applied to settings here; it is handled by
/// [`crate::metal`] as a personalization step.
#[must_use]
pub fn matches_filters(product: &Product, filters: &FilterState, skip: Option<Dimension>) -> bool {
    let facets_ok = filters.selections.iter().all(|(facet, accepted)| {
        if skip == Some(Dimension::Facet(*facet)) {
            return true;
        }
        if *facet == Facet::Metal && product.is_setting() {
            return true;
        }
        facet_matches(product, *facet, accepted)
    });

    facets_ok
        && (skip == Some(Dimension::Price)
            || price_matches(product.price, &filters.price_brackets, filters.manual_price))
        && (skip == Some(Dimension::Carat) || carat_matches(product, &filters.carat_ranges))
}

/// Intersects `products` with every active facet, price, and carat filter.
/// Order is preserved.
pub fn apply_facets<'a, I>(products: I, filters: &FilterState) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    products
        .into_iter()
        .filter(|p| matches_filters(p, filters, None))
        .collect()
}

/// One filter-menu option and how many products it would show.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OptionCount {
    pub value: String,
    pub count: usize,
}

/// Option counts for one dimension: for each value present among the
/// compatible products, how many would match if it were selected alongside
/// every other active filter.
///
/// Facet values are ordered alphabetically, price brackets and carat buckets
/// in their natural order. Options with no products are omitted.
#[must_use]
pub fn facet_counts(
    products: &[Product],
    context: &SelectionContext,
    filters: &FilterState,
    dimension: Dimension,
) -> Vec<OptionCount> {
    let candidates: Vec<&Product> = products
        .iter()
        .filter(|p| is_compatible(p, context))
        .filter(|p| matches_filters(p, filters, Some(dimension)))
        .filter(|p| dimension == Dimension::Facet(Facet::Metal) || passes_metal_selection(p, filters))
        .collect();

    match dimension {
        Dimension::Facet(facet) => {
            let mut counts: BTreeMap<String, usize> = BTreeMap::new();
            for product in &candidates {
                for value in facet.values(product) {
                    *counts.entry(value).or_default() += 1;
                }
            }
            counts
                .into_iter()
                .map(|(value, count)| OptionCount { value, count })
                .collect()
        }
        Dimension::Price => PriceBracket::ALL
            .into_iter()
            .map(|bracket| OptionCount {
                value: bracket.slug().to_string(),
                count: candidates
                    .iter()
                    .filter(|p| bracket.contains(p.price))
                    .count(),
            })
            .filter(|c| c.count > 0)
            .collect(),
        Dimension::Carat => CARAT_BUCKETS
            .iter()
            .map(|(label, range)| OptionCount {
                value: (*label).to_string(),
                count: candidates
                    .iter()
                    .filter(|p| carat_matches(p, std::slice::from_ref(range)))
                    .count(),
            })
            .filter(|c| c.count > 0)
            .collect(),
    }
}

#[cfg(test)]
#[path = "facets_test.rs"]
mod tests;
