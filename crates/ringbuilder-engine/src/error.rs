use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("product is missing an id ({context})")]
    MissingProductId { context: String },

    #[error("product {product_id} not found in catalog")]
    ProductNotFound { product_id: String },

    #[error("product {product_id} is not a {expected}")]
    WrongKind {
        product_id: String,
        expected: &'static str,
    },

    #[error("product {product_id} has no purchasable variant")]
    MissingVariant { product_id: String },
}
