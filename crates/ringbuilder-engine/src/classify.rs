//! Gemstone / setting classification from a product's declared type and tags.

use ringbuilder_core::ProductKind;

const GEMSTONE_TYPES: &[&str] = &[
    "precious stone",
    "diamond",
    "loose diamond",
    "lab diamond",
    "lab-grown diamond",
];

const GEMSTONE_TAGS: &[&str] = &[
    "gemstone",
    "diamond",
    "loose-diamond",
    "loose diamond",
    "lab-grown",
];

const SETTING_TYPES: &[&str] = &[
    "ring",
    "pendant",
    "setting",
    "settings",
    "mounting",
    "ring setting",
    "engagement ring",
];

const SETTING_TAGS: &[&str] = &[
    "setting",
    "settings",
    "ring",
    "pendant",
    "mounting",
    "engagement",
    "setting_ring",
    "setting_pendant",
];

/// Result of [`classify`]. Both flags may be false; a well-formed catalog
/// never sets both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub is_gemstone: bool,
    pub is_setting: bool,
}

impl Classification {
    /// Collapses the flags into a single kind. Gemstone wins when both are set.
    #[must_use]
    pub fn kind(self) -> ProductKind {
        if self.is_gemstone {
            ProductKind::Gemstone
        } else if self.is_setting {
            ProductKind::Setting
        } else {
            ProductKind::Other
        }
    }
}

/// Classifies a product from its declared type and tags, case-insensitively.
///
/// A type or tag matches either by equality with a known keyword or, for
/// the broad stems (`diamond`, `stone`, `setting`, `mounting`), by substring.
#[must_use]
pub fn classify<S: AsRef<str>>(product_type: Option<&str>, tags: &[S]) -> Classification {
    let product_type = product_type.unwrap_or_default().trim().to_lowercase();
    let tags: Vec<String> = tags
        .iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .collect();

    let gem_type = GEMSTONE_TYPES.contains(&product_type.as_str())
        || product_type.contains("diamond")
        || product_type.contains("stone");
    let gem_tag = tags
        .iter()
        .any(|t| GEMSTONE_TAGS.contains(&t.as_str()) || t.contains("diamond"));

    let setting_type = SETTING_TYPES.contains(&product_type.as_str())
        || product_type.contains("setting")
        || product_type.contains("mounting");
    let setting_tag = tags.iter().any(|t| {
        SETTING_TAGS.contains(&t.as_str()) || t.contains("setting") || t.contains("mounting")
    });

    Classification {
        is_gemstone: gem_type || gem_tag,
        is_setting: setting_type || setting_tag,
    }
}
