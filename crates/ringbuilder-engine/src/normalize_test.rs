use serde_json::json;

use super::*;

fn raw(value: serde_json::Value) -> RawProduct {
    serde_json::from_value(value).expect("valid raw product")
}

fn diamond_json() -> serde_json::Value {
    json!({
        "id": "gid://shopify/Product/1001",
        "handle": "round-1-03-ct-d-vs1",
        "title": "1.03ct D VS1 Round Lab Diamond",
        "product_type": "Lab Diamond",
        "tags": ["lab-grown"],
        "price": "1250.00",
        "metafields": {
            "stone_shape": "[\"stone_shape.round\"]",
            "stone_weight": "1.03",
            "stone_color": "D",
            "stone_clarity": "VS1",
            "lab_diamond_type": "CVD",
            "certificate": "IGI - LG737512445"
        },
        "variants": [{ "id": "gid://shopify/ProductVariant/5001", "price": "1250.00" }]
    })
}

fn setting_json() -> serde_json::Value {
    json!({
        "id": 2002,
        "handle": "classic-solitaire-oval-setting",
        "title": "Classic Solitaire Setting",
        "product_type": "Ring Setting",
        "tags": ["Oval", "setting_ring"],
        "metafields": { "ring_style": "Solitaire" },
        "variants": [
            {
                "id": 6001,
                "price": "900.00",
                "options": [
                    { "name": "Metal Type", "value": "14k White Gold" },
                    { "name": "Size", "value": "1-1.49 ct" }
                ]
            },
            {
                "id": 6002,
                "price": "950.00",
                "metafields": {
                    "metal_type": "18k Yellow Gold",
                    "center_stone_carat_weight": "From 1.5 to 2.99 ct",
                    "metal_weight": "3.2g"
                },
                "image": "https://cdn.example.com/yellow.jpg"
            },
            {
                "id": 6003,
                "price": "990.00",
                "options": [{ "name": "Metal Type", "value": "Platinum" }]
            }
        ]
    })
}

// ---- gemstones

#[test]
fn diamond_normalizes_core_fields() {
    let product = normalize_product(raw(diamond_json())).unwrap();
    assert_eq!(product.id, "1001");
    assert_eq!(product.kind, ProductKind::Gemstone);
    assert_eq!(product.shape.as_deref(), Some("Round"));
    assert_eq!(product.carat_weight, Some(1.03));
    assert_eq!(product.price, 125_000);
    assert_eq!(product.default_variant_id.as_deref(), Some("5001"));
    assert!(product.variants.is_empty());
    assert_eq!(product.carat_range, None);
}

#[test]
fn diamond_facets_come_from_metafields() {
    let product = normalize_product(raw(diamond_json())).unwrap();
    assert_eq!(product.facets.color.as_deref(), Some("D"));
    assert_eq!(product.facets.clarity.as_deref(), Some("VS1"));
    assert_eq!(product.facets.diamond_type.as_deref(), Some("CVD"));
    assert_eq!(product.facets.gemstone_type.as_deref(), Some("CVD"));
    assert_eq!(product.facets.certification_lab.as_deref(), Some("IGI"));
    assert_eq!(product.facets.metal_type, None);
}

#[test]
fn missing_id_is_an_error() {
    let mut value = diamond_json();
    value.as_object_mut().unwrap().remove("id");
    let err = normalize_product(raw(value)).unwrap_err();
    assert!(matches!(err, EngineError::MissingProductId { .. }));
}

#[test]
fn unparseable_weight_is_absent() {
    let mut value = diamond_json();
    value["metafields"]["stone_weight"] = json!("unknown");
    let product = normalize_product(raw(value)).unwrap();
    assert_eq!(product.carat_weight, None);
}

#[test]
fn price_falls_back_to_cheapest_variant() {
    let product = normalize_product(raw(setting_json())).unwrap();
    assert_eq!(product.price, 90_000);
}

// ---- settings

#[test]
fn setting_carat_range_is_union_of_variants() {
    let product = normalize_product(raw(setting_json())).unwrap();
    assert_eq!(product.kind, ProductKind::Setting);
    assert_eq!(product.carat_range, Some(CaratRange::new(1.0, 2.99)));
}

#[test]
fn only_sized_variants_become_setting_variants() {
    let product = normalize_product(raw(setting_json())).unwrap();
    let ids: Vec<&str> = product
        .variants
        .iter()
        .map(|v| v.variant_id.as_str())
        .collect();
    assert_eq!(ids, ["6001", "6002"]);
    assert_eq!(product.variants[1].metal_weight.as_deref(), Some("3.2g"));
    assert_eq!(
        product.variants[1].image.as_deref(),
        Some("https://cdn.example.com/yellow.jpg")
    );
    assert_eq!(product.default_variant_id.as_deref(), Some("6001"));
}

#[test]
fn setting_variants_keep_their_price() {
    let product = normalize_product(raw(setting_json())).unwrap();
    let prices: Vec<Option<i64>> = product.variants.iter().map(|v| v.price).collect();
    assert_eq!(prices, [Some(90_000), Some(95_000)]);
}

#[test]
fn setting_metals_are_collected_in_order() {
    let product = normalize_product(raw(setting_json())).unwrap();
    assert_eq!(
        product.facets.metal_type.as_deref(),
        Some("White Gold, Yellow Gold, Platinum")
    );
    assert_eq!(product.facets.style.as_deref(), Some("Solitaire"));
}

#[test]
fn setting_shape_falls_back_to_tag() {
    let product = normalize_product(raw(setting_json())).unwrap();
    assert_eq!(product.shape.as_deref(), Some("Oval"));
}

// ---- shape resolution

#[test]
fn shape_prefers_metafield() {
    let mut meta = BTreeMap::new();
    meta.insert(
        "center_stone_shape".to_string(),
        "center_stone_shape.pear".to_string(),
    );
    let shape = resolve_shape(ProductKind::Setting, &meta, &["Oval"], "Round Halo");
    assert_eq!(shape.as_deref(), Some("Pear"));
}

#[test]
fn shape_uses_earliest_title_occurrence() {
    let meta = BTreeMap::new();
    let tags: &[&str] = &[];
    let shape = resolve_shape(
        ProductKind::Setting,
        &meta,
        tags,
        "Halo Oval Setting for Round Stones",
    );
    assert_eq!(shape.as_deref(), Some("Oval"));
}

#[test]
fn shape_absent_when_nothing_matches() {
    let meta = BTreeMap::new();
    let tags: &[&str] = &[];
    assert_eq!(
        resolve_shape(ProductKind::Gemstone, &meta, tags, "Mystery Stone"),
        None
    );
}

// ---- catalog

#[test]
fn parse_catalog_skips_products_without_id() {
    let mut no_id = diamond_json();
    no_id.as_object_mut().unwrap().remove("id");
    let catalog = json!({ "products": [diamond_json(), no_id, setting_json()] });
    let products = parse_catalog(&catalog.to_string()).unwrap();
    let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["1001", "2002"]);
}

#[test]
fn parse_catalog_rejects_malformed_json() {
    let err = parse_catalog("{ not json").unwrap_err();
    assert!(matches!(err, EngineError::Deserialize { .. }));
}

#[test]
fn bundled_catalog_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("catalog.json");
    let json = std::fs::read_to_string(&path).expect("catalog.json readable");
    let products = parse_catalog(&json).unwrap();
    assert!(products.iter().any(ringbuilder_core::Product::is_gemstone));
    assert!(products.iter().any(ringbuilder_core::Product::is_setting));
}
