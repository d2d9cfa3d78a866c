//! The "Ring Details" summary shown once both sides of a pairing are chosen.

use serde::Serialize;

use ringbuilder_core::{Product, SettingVariant};

/// Metal label when neither the variant nor the setting names one.
pub const UNSPECIFIED_METAL: &str = "Not specified";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

/// Combined details of a gemstone and the setting it goes into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairSummary {
    pub gemstone_id: String,
    pub setting_id: String,
    /// The setting variant the metal rows were read from, if any.
    pub variant_id: Option<String>,
    pub rows: Vec<SummaryRow>,
}

impl PairSummary {
    #[must_use]
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }
}

fn summary_variant<'a>(setting: &'a Product, setting_variant: Option<&str>) -> Option<&'a SettingVariant> {
    let selected = setting_variant
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .and_then(|id| setting.variants.iter().find(|v| v.variant_id == id));
    selected.or_else(|| setting.variants.first())
}

fn present(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Stone rows from the gemstone, then metal rows from the setting.
///
/// Metal and metal weight come from the selected setting variant, or from
/// the first variant when none is selected or the selection is unknown. The
/// setting's own metal list is the last resort for the metal row. Stone rows
/// without a value are left out.
#[must_use]
pub fn pair_summary(gemstone: &Product, setting: &Product, setting_variant: Option<&str>) -> PairSummary {
    let facets = &gemstone.facets;
    let stone_rows = [
        ("Shape", gemstone.shape_label().map(str::to_string)),
        ("Carat", gemstone.carat().map(|c| c.to_string())),
        ("Color", present(facets.color.as_ref())),
        ("Clarity", present(facets.clarity.as_ref())),
        ("Cut", present(facets.cut.as_ref())),
        ("Certificate", present(facets.certification_lab.as_ref())),
    ];
    let mut rows: Vec<SummaryRow> = stone_rows
        .into_iter()
        .filter_map(|(label, value)| value.map(|value| SummaryRow { label, value }))
        .collect();

    let variant = summary_variant(setting, setting_variant);
    let metal = variant
        .and_then(|v| present(v.metal_type.as_ref()))
        .or_else(|| setting.metals().next().map(str::to_string))
        .unwrap_or_else(|| UNSPECIFIED_METAL.to_string());
    rows.push(SummaryRow {
        label: "Metal",
        value: metal,
    });
    if let Some(weight) = variant.and_then(|v| present(v.metal_weight.as_ref())) {
        rows.push(SummaryRow {
            label: "Metal Weight",
            value: weight,
        });
    }

    PairSummary {
        gemstone_id: gemstone.id.clone(),
        setting_id: setting.id.clone(),
        variant_id: variant.map(|v| v.variant_id.clone()),
        rows,
    }
}
