use std::cmp::Ordering;

use ringbuilder_core::Product;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    None,
    PriceAsc,
    PriceDesc,
    CaratAsc,
    CaratDesc,
}

impl SortKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::None => "",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::CaratAsc => "carat-asc",
            SortKey::CaratDesc => "carat-desc",
        }
    }

    /// Unknown keys mean no sorting.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "price-asc" => SortKey::PriceAsc,
            "price-desc" => SortKey::PriceDesc,
            "carat-asc" => SortKey::CaratAsc,
            "carat-desc" => SortKey::CaratDesc,
            _ => SortKey::None,
        }
    }
}

/// Carat used when sorting ascending: a setting's smallest supported stone,
/// otherwise the stone's own weight. Absent values sort as `0`.
fn ascending_carat(product: &Product) -> f64 {
    if product.is_setting() {
        if let Some(range) = product.carat_range.filter(|r| r.min.is_finite()) {
            return range.min;
        }
    }
    product.carat().unwrap_or(0.0)
}

/// Carat used when sorting descending: a setting's largest supported stone,
/// otherwise the stone's own weight.
fn descending_carat(product: &Product) -> f64 {
    if product.is_setting() {
        if let Some(range) = product.carat_range.filter(|r| r.max.is_finite()) {
            return range.max;
        }
    }
    product.carat().unwrap_or(0.0)
}

fn compare(key: SortKey, a: &Product, b: &Product) -> Ordering {
    match key {
        SortKey::None => Ordering::Equal,
        SortKey::PriceAsc => a.price.cmp(&b.price),
        SortKey::PriceDesc => b.price.cmp(&a.price),
        SortKey::CaratAsc => ascending_carat(a).total_cmp(&ascending_carat(b)),
        SortKey::CaratDesc => descending_carat(b).total_cmp(&descending_carat(a)),
    }
}

/// Sorts in place. The sort is stable, so ties keep their incoming order and
/// [`SortKey::None`] leaves the slice untouched.
pub fn sort_entries<'p, T, F>(items: &mut [T], key: SortKey, product: F)
where
    F: Fn(&T) -> &'p Product,
{
    if key == SortKey::None {
        return;
    }
    items.sort_by(|a, b| compare(key, product(a), product(b)));
}

/// Sorts product references in place.
pub fn sort_products(products: &mut [&Product], key: SortKey) {
    sort_entries(products, key, |p| *p);
}
