//! Price brackets and manually entered price bounds.

use crate::parse_helpers::parse_leading_float;

/// Quick-select price brackets, half-open `[min, max)` in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriceBracket {
    Under1000,
    From1000To2000,
    From2000To5000,
    From5000To10000,
    Over10000,
}

impl PriceBracket {
    pub const ALL: [PriceBracket; 5] = [
        PriceBracket::Under1000,
        PriceBracket::From1000To2000,
        PriceBracket::From2000To5000,
        PriceBracket::From5000To10000,
        PriceBracket::Over10000,
    ];

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            PriceBracket::Under1000 => "under-1000",
            PriceBracket::From1000To2000 => "1000-2000",
            PriceBracket::From2000To5000 => "2000-5000",
            PriceBracket::From5000To10000 => "5000-10000",
            PriceBracket::Over10000 => "over-10000",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PriceBracket::Under1000 => "Under $1,000",
            PriceBracket::From1000To2000 => "$1,000-$2,000",
            PriceBracket::From2000To5000 => "$2,000-$5,000",
            PriceBracket::From5000To10000 => "$5,000-$10,000",
            PriceBracket::Over10000 => "Over $10,000",
        }
    }

    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim();
        Self::ALL.into_iter().find(|b| b.slug() == slug)
    }

    /// Lower (inclusive) and upper (exclusive) bounds in minor units.
    #[must_use]
    pub fn bounds(self) -> (i64, Option<i64>) {
        match self {
            PriceBracket::Under1000 => (0, Some(100_000)),
            PriceBracket::From1000To2000 => (100_000, Some(200_000)),
            PriceBracket::From2000To5000 => (200_000, Some(500_000)),
            PriceBracket::From5000To10000 => (500_000, Some(1_000_000)),
            PriceBracket::Over10000 => (1_000_000, None),
        }
    }

    #[must_use]
    pub fn contains(self, price: i64) -> bool {
        let (min, max) = self.bounds();
        price >= min && max.is_none_or(|max| price < max)
    }

    /// The bracket a price falls in. Prices below zero count as the lowest
    /// bracket.
    #[must_use]
    pub fn for_price(price: i64) -> Self {
        Self::ALL
            .into_iter()
            .find(|b| b.contains(price))
            .unwrap_or(PriceBracket::Under1000)
    }
}

/// Manually entered price bounds, inclusive, stored in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceBounds {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl PriceBounds {
    #[must_use]
    pub fn contains(&self, price: i64) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }

    /// Parses `"min-max"` in major units; either side may be blank. Returns
    /// `None` when neither side holds a number.
    #[must_use]
    pub fn parse_major(value: &str) -> Option<Self> {
        let (min, max) = value.split_once('-').unwrap_or((value, ""));
        let bounds = PriceBounds {
            min: parse_leading_float(min).map(major_to_minor),
            max: parse_leading_float(max).map(major_to_minor),
        };
        (bounds.min.is_some() || bounds.max.is_some()).then_some(bounds)
    }

    #[must_use]
    pub fn to_major_string(&self) -> String {
        let side = |v: Option<i64>| v.map(format_major).unwrap_or_default();
        format!("{}-{}", side(self.min), side(self.max))
    }
}

#[allow(clippy::cast_possible_truncation)] // prices are far below i64::MAX cents
fn major_to_minor(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

fn format_major(minor: i64) -> String {
    let whole = minor / 100;
    let cents = (minor % 100).abs();
    if cents == 0 {
        whole.to_string()
    } else if cents % 10 == 0 {
        format!("{whole}.{}", cents / 10)
    } else {
        format!("{whole}.{cents:02}")
    }
}

/// Whether `price` passes the price filters. Manual bounds win over brackets
/// when present; with neither, every price passes.
#[must_use]
pub fn price_matches(
    price: i64,
    brackets: &std::collections::BTreeSet<PriceBracket>,
    manual: Option<PriceBounds>,
) -> bool {
    match manual {
        Some(bounds) => bounds.contains(price),
        None if brackets.is_empty() => true,
        None => brackets.iter().any(|b| b.contains(price)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn brackets_are_half_open() {
        assert!(PriceBracket::Under1000.contains(99_999));
        assert!(!PriceBracket::Under1000.contains(100_000));
        assert!(PriceBracket::From1000To2000.contains(100_000));
        assert!(PriceBracket::Over10000.contains(5_000_000));
    }

    #[test]
    fn for_price_picks_bracket() {
        assert_eq!(PriceBracket::for_price(250_000), PriceBracket::From2000To5000);
        assert_eq!(PriceBracket::for_price(1_000_000), PriceBracket::Over10000);
        assert_eq!(PriceBracket::for_price(-5), PriceBracket::Under1000);
    }

    #[test]
    fn slugs_round_trip() {
        for bracket in PriceBracket::ALL {
            assert_eq!(PriceBracket::from_slug(bracket.slug()), Some(bracket));
        }
        assert_eq!(PriceBracket::from_slug("cheap"), None);
    }

    #[test]
    fn manual_bounds_are_inclusive_major_units() {
        let bounds = PriceBounds::parse_major("1000-2000").unwrap();
        assert_eq!(bounds.min, Some(100_000));
        assert_eq!(bounds.max, Some(200_000));
        assert!(bounds.contains(200_000));
        assert!(!bounds.contains(200_001));
    }

    #[test]
    fn manual_bounds_allow_open_side() {
        let bounds = PriceBounds::parse_major("500-").unwrap();
        assert_eq!(bounds.max, None);
        assert!(bounds.contains(10_000_000));
        assert_eq!(PriceBounds::parse_major("-"), None);
    }

    #[test]
    fn manual_bounds_format_major_units() {
        let bounds = PriceBounds {
            min: Some(150_050),
            max: Some(200_005),
        };
        assert_eq!(bounds.to_major_string(), "1500.5-2000.05");
        let open = PriceBounds {
            min: None,
            max: Some(90_000),
        };
        assert_eq!(open.to_major_string(), "-900");
    }

    #[test]
    fn manual_entry_takes_precedence() {
        let brackets: BTreeSet<_> = [PriceBracket::Under1000].into_iter().collect();
        let manual = PriceBounds {
            min: Some(500_000),
            max: None,
        };
        assert!(price_matches(600_000, &brackets, Some(manual)));
        assert!(!price_matches(50_000, &brackets, Some(manual)));
        assert!(price_matches(50_000, &brackets, None));
        assert!(!price_matches(600_000, &brackets, None));
        assert!(price_matches(600_000, &BTreeSet::new(), None));
    }
}
