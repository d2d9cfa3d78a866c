pub mod client;
pub mod error;
mod rate_limit;
pub mod types;

pub use client::{extract_store_origin, StorefrontClient};
pub use error::StorefrontError;
pub use types::{StorefrontProduct, StorefrontVariant};
