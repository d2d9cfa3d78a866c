use serde::{Deserialize, Serialize};

/// Which side of a ring-builder pairing a product belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Gemstone,
    Setting,
    #[default]
    Other,
}

impl ProductKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProductKind::Gemstone => "gemstone",
            ProductKind::Setting => "setting",
            ProductKind::Other => "other",
        }
    }

    /// Parses a kind label case-insensitively. Unknown labels map to
    /// [`ProductKind::Other`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "gemstone" | "gem" | "diamond" => ProductKind::Gemstone,
            "setting" | "settings" => ProductKind::Setting,
            _ => ProductKind::Other,
        }
    }
}

impl std::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known cut shapes, in the fixed order used to break ties when more than
/// one shape name appears in a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Shape {
    Round,
    Oval,
    Pear,
    Emerald,
    Cushion,
    Princess,
    Marquise,
    Radiant,
    Asscher,
    Heart,
}

impl Shape {
    pub const ALL: [Shape; 10] = [
        Shape::Round,
        Shape::Oval,
        Shape::Pear,
        Shape::Emerald,
        Shape::Cushion,
        Shape::Princess,
        Shape::Marquise,
        Shape::Radiant,
        Shape::Asscher,
        Shape::Heart,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Round => "Round",
            Shape::Oval => "Oval",
            Shape::Pear => "Pear",
            Shape::Emerald => "Emerald",
            Shape::Cushion => "Cushion",
            Shape::Princess => "Princess",
            Shape::Marquise => "Marquise",
            Shape::Radiant => "Radiant",
            Shape::Asscher => "Asscher",
            Shape::Heart => "Heart",
        }
    }

    /// Looks up a shape by exact name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inclusive span of carat weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaratRange {
    pub min: f64,
    pub max: f64,
}

impl CaratRange {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range is usable for matching only when both bounds are positive.
    /// `NaN` bounds are never valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min > 0.0 && self.max > 0.0
    }

    #[must_use]
    pub fn contains(&self, carat: f64) -> bool {
        self.min <= carat && carat <= self.max
    }

    /// Two ranges overlap when each starts no later than the other ends.
    #[must_use]
    pub fn overlaps(&self, other: &CaratRange) -> bool {
        self.max >= other.min && self.min <= other.max
    }

    /// Smallest range covering both `self` and `other`.
    #[must_use]
    pub fn union(self, other: CaratRange) -> CaratRange {
        CaratRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// A purchasable setting variant sized for a span of centre-stone weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingVariant {
    /// Numeric storefront variant ID, kept as a string.
    pub variant_id: String,
    pub min_carat: f64,
    pub max_carat: f64,
    /// Raw metal label, e.g. `"18k White Gold"`.
    #[serde(default)]
    pub metal_type: Option<String>,
    #[serde(default)]
    pub metal_weight: Option<String>,
    #[serde(default)]
    pub center_stone_shape: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Variant price in minor units, when it differs per variant.
    #[serde(default)]
    pub price: Option<i64>,
}

impl SettingVariant {
    #[must_use]
    pub fn carat_range(&self) -> CaratRange {
        CaratRange::new(self.min_carat, self.max_carat)
    }
}

/// Descriptive attributes used for faceted filtering. Every field is optional;
/// a product lacking a value never matches a selection on that facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Facets {
    pub color: Option<String>,
    pub clarity: Option<String>,
    pub diamond_type: Option<String>,
    pub gemstone_type: Option<String>,
    pub treatment: Option<String>,
    pub cut: Option<String>,
    pub polish: Option<String>,
    pub symmetry: Option<String>,
    pub fluorescence: Option<String>,
    /// One or more metals joined with `", "`, e.g. `"White Gold, Platinum"`.
    pub metal_type: Option<String>,
    pub style: Option<String>,
    pub certification_lab: Option<String>,
    pub origin: Option<String>,
}

/// A catalog entry as the builder sees it: one gemstone, setting, or other
/// product with its compatibility and facet attributes already parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub kind: ProductKind,
    /// Shape label as published by the store. Usually one of [`Shape`], but
    /// store-defined labels are kept verbatim.
    #[serde(default)]
    pub shape: Option<String>,
    /// Weight of the stone itself (gemstones).
    #[serde(default)]
    pub carat_weight: Option<f64>,
    /// Centre-stone weights the setting accommodates (settings).
    #[serde(default)]
    pub carat_range: Option<CaratRange>,
    /// Price in minor currency units.
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub facets: Facets,
    #[serde(default)]
    pub variants: Vec<SettingVariant>,
    #[serde(default)]
    pub default_variant_id: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    #[must_use]
    pub fn is_gemstone(&self) -> bool {
        self.kind == ProductKind::Gemstone
    }

    #[must_use]
    pub fn is_setting(&self) -> bool {
        self.kind == ProductKind::Setting
    }

    /// Shape label with empty strings treated as absent.
    #[must_use]
    pub fn shape_label(&self) -> Option<&str> {
        self.shape.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// The setting's carat range, only when both bounds are positive.
    #[must_use]
    pub fn valid_carat_range(&self) -> Option<CaratRange> {
        self.carat_range.filter(CaratRange::is_valid)
    }

    /// Carat weight with non-finite values treated as absent.
    #[must_use]
    pub fn carat(&self) -> Option<f64> {
        self.carat_weight.filter(|c| c.is_finite())
    }

    /// The variant added to cart when no carat-specific variant applies.
    #[must_use]
    pub fn fallback_variant_id(&self) -> Option<&str> {
        self.default_variant_id
            .as_deref()
            .or_else(|| self.variants.first().map(|v| v.variant_id.as_str()))
    }

    /// Individual metals offered, split from the joined facet value.
    pub fn metals(&self) -> impl Iterator<Item = &str> {
        self.facets
            .metal_type
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}
