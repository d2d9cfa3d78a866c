//! Integration tests for `StorefrontClient` against a `wiremock` server.
//!
//! Covers product lookups, the handle fallback used for selection
//! inference, setting-variant sizes, and cart submission.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ringbuilder_core::{CaratRange, Shape};
use ringbuilder_engine::{parse_attribute_catalog, BuilderState, CartLine, Side};
use ringbuilder_storefront::{StorefrontClient, StorefrontError};

fn test_client(server: &MockServer) -> StorefrontClient {
    StorefrontClient::new(&server.uri(), 5, "ringbuilder-test/0.1", 0, 0)
        .expect("failed to build test StorefrontClient")
}

fn gemstone_json() -> serde_json::Value {
    json!({
        "id": 8_100_000_002_u64,
        "handle": "oval-sapphire-2-01-ct",
        "title": "Oval Sapphire 2.01 ct",
        "type": "Gemstone",
        "tags": ["gemstone"],
        "variants": [{ "id": 4_400_000_021_u64, "title": "Default Title", "price": 189_000 }],
        "metafields": { "custom": {
            "gemstone_shape": "Oval",
            "gemstone_carat_weight": "2.01"
        }}
    })
}

fn setting_json() -> serde_json::Value {
    json!({
        "id": 8_200_000_002_u64,
        "handle": "oval-halo-setting",
        "title": "Oval Halo Setting",
        "type": "Setting",
        "variants": [
            { "id": 501, "option1": "Yellow Gold", "option2": "1.00 - 1.99 ct" },
            { "id": 502, "option1": "Yellow Gold", "option2": "2.00 - 2.99 ct" }
        ],
        "metafields": { "custom": { "center_stone_shape": "Oval" }}
    })
}

// ---------------------------------------------------------------------------
// fetch_product
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_product_reads_handle_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/oval-sapphire-2-01-ct.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemstone_json()))
        .mount(&server)
        .await;

    let product = test_client(&server)
        .fetch_product("oval-sapphire-2-01-ct")
        .await
        .expect("product");
    assert_eq!(product.id, 8_100_000_002);
    assert_eq!(product.product_type.as_deref(), Some("Gemstone"));
    assert_eq!(product.custom_metafield("gemstone_carat_weight").as_deref(), Some("2.01"));
}

#[tokio::test]
async fn fetch_product_reports_missing_handle() {
    let server = MockServer::start().await;
    let result = test_client(&server).fetch_product("nope").await;
    assert!(
        matches!(result, Err(StorefrontError::NotFound { .. })),
        "expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_product_rejects_non_product_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/broken.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_product("broken").await;
    assert!(
        matches!(result, Err(StorefrontError::Deserialize { .. })),
        "expected Deserialize, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_product_surfaces_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/flaky.js"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_product("flaky").await;
    assert!(
        matches!(result, Err(StorefrontError::UnexpectedStatus { status: 503, .. })),
        "expected 503, got: {result:?}"
    );
}

#[tokio::test]
async fn throttling_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/oval-sapphire-2-01-ct.js"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/oval-sapphire-2-01-ct.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemstone_json()))
        .mount(&server)
        .await;

    let client = StorefrontClient::new(&server.uri(), 5, "ringbuilder-test/0.1", 2, 0)
        .expect("client");
    let result = client.fetch_product("oval-sapphire-2-01-ct").await;
    assert!(result.is_ok(), "expected Ok after retry, got: {result:?}");
}

#[tokio::test]
async fn access_token_is_sent_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/oval-halo-setting.js"))
        .and(header("X-Shopify-Storefront-Access-Token", "secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(setting_json()))
        .mount(&server)
        .await;

    let client = test_client(&server).with_access_token(Some("secret-token".to_owned()));
    let result = client.fetch_product("oval-halo-setting").await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

// ---------------------------------------------------------------------------
// infer_selection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn infer_selection_reads_gemstone_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/oval-sapphire-2-01-ct.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemstone_json()))
        .mount(&server)
        .await;

    let inference = test_client(&server)
        .infer_selection("oval-sapphire-2-01-ct", Side::Gemstone)
        .await;
    assert_eq!(inference.shape, Some(Shape::Oval));
    assert_eq!(inference.carat, Some(2.01));
}

#[tokio::test]
async fn infer_selection_falls_back_to_stripped_handle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/oval-halo-setting.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(setting_json()))
        .expect(1)
        .mount(&server)
        .await;

    let inference = test_client(&server)
        .infer_selection("123-oval-halo-setting", Side::Setting)
        .await;
    assert_eq!(inference.shape, Some(Shape::Oval));
    assert_eq!(inference.carat_range, Some(CaratRange::new(1.0, 2.99)));
    assert_eq!(inference.carat, None);
}

#[tokio::test]
async fn infer_selection_uses_handle_when_storefront_misses() {
    let server = MockServer::start().await;

    let inference = test_client(&server)
        .infer_selection("pear-lab-diamond-1-52-ct", Side::Gemstone)
        .await;
    assert_eq!(inference.shape, Some(Shape::Pear));
    assert_eq!(inference.carat, Some(1.52));
}

#[tokio::test]
async fn setting_handle_carat_digits_are_ignored() {
    let server = MockServer::start().await;

    let inference = test_client(&server)
        .infer_selection("round-solitaire-1-50-ct", Side::Setting)
        .await;
    assert_eq!(inference.shape, Some(Shape::Round));
    assert_eq!(inference.carat, None);
}

// ---------------------------------------------------------------------------
// setting_variant_range
// ---------------------------------------------------------------------------

#[tokio::test]
async fn setting_variant_range_reads_option2() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/oval-halo-setting.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(setting_json()))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let range = client
        .setting_variant_range("oval-halo-setting", "502")
        .await
        .expect("lookup succeeds");
    assert_eq!(range, Some(CaratRange::new(2.0, 2.99)));

    let missing = client
        .setting_variant_range("oval-halo-setting", "999")
        .await
        .expect("lookup succeeds");
    assert_eq!(missing, None);
}

#[tokio::test]
async fn setting_variant_range_tries_stripped_handle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/oval-halo-setting.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(setting_json()))
        .expect(1)
        .mount(&server)
        .await;

    let range = test_client(&server)
        .setting_variant_range("123-oval-halo-setting", "501")
        .await
        .expect("lookup succeeds");
    assert_eq!(range, Some(CaratRange::new(1.0, 1.99)));
}

#[tokio::test]
async fn setting_variant_range_reports_unknown_setting() {
    let server = MockServer::start().await;

    let result = test_client(&server)
        .setting_variant_range("9-missing-halo", "501")
        .await;
    assert!(
        matches!(result, Err(StorefrontError::NotFound { .. })),
        "expected NotFound, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// resolve_selections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolve_selections_narrows_gemstones_by_variant_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/mystery-halo.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(setting_json()))
        .mount(&server)
        .await;

    let products = parse_attribute_catalog(
        &json!([
            { "product-id": "1", "product-type": "gemstone", "shape": "Oval", "carat": "1.50" },
            { "product-id": "2", "product-type": "gemstone", "shape": "Oval", "carat": "2.40" },
            { "product-id": "3", "product-type": "gemstone", "shape": "Round", "carat": "1.20" }
        ])
        .to_string(),
    )
    .expect("valid cards");

    let mut state = BuilderState::from_query(
        products.into(),
        "setting=mystery-halo&setting_variant=501",
        24,
    );
    // The handle gives nothing away, so only the storefront can narrow.
    assert_eq!(state.total(), 3);

    test_client(&server)
        .resolve_selections(&mut state, &[Side::Setting])
        .await;

    assert_eq!(state.context().setting_shape, Some(Shape::Oval));
    assert_eq!(
        state.context().setting_carat_range,
        Some(CaratRange::new(1.0, 1.99))
    );
    let ids: Vec<&str> = state.ordered().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["1"]);
}

// ---------------------------------------------------------------------------
// add_to_cart
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_to_cart_posts_items() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({
            "items": [
                { "id": 4_400_000_021_u64, "quantity": 1 },
                { "id": 502, "quantity": 1 }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let lines = [CartLine::new("4400000021", 1), CartLine::new("502", 1)];
    let result = test_client(&server).add_to_cart(&lines).await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn add_to_cart_reports_store_description() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": 422,
            "message": "Cart Error",
            "description": "The product 'Oval Halo Setting' is already sold out."
        })))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .add_to_cart(&[CartLine::new("502", 1)])
        .await;
    match result {
        Err(StorefrontError::CartRejected {
            status,
            description,
        }) => {
            assert_eq!(status, 422);
            assert!(description.contains("sold out"), "got: {description}");
        }
        other => panic!("expected CartRejected, got: {other:?}"),
    }
}
