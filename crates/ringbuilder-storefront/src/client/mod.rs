//! HTTP client for the storefront AJAX endpoints the builder depends on.

mod inference;

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use ringbuilder_core::AppConfig;
use ringbuilder_engine::CartLine;

use crate::error::StorefrontError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{AddToCartRequest, CartErrorBody, StorefrontProduct};

pub use inference::{inference_from_product, variant_size_range};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Scheme and host of a configured storefront URL, so product and cart
/// endpoints hang off the store root whatever page was configured.
/// Unparseable input is used as-is, minus trailing slashes.
#[must_use]
pub fn extract_store_origin(base_url: &str) -> String {
    match reqwest::Url::parse(base_url) {
        Ok(url) => url.origin().ascii_serialization(),
        Err(e) => {
            tracing::warn!(base_url, error = %e, "storefront URL does not parse");
            base_url.trim_end_matches('/').to_owned()
        }
    }
}

fn store_host(origin: &str) -> String {
    match reqwest::Url::parse(origin) {
        Ok(url) => url.host_str().unwrap_or(origin).to_owned(),
        Err(_) => origin.to_owned(),
    }
}

/// Client for `GET /products/{handle}.js` and `POST /cart/add.js`.
///
/// Throttling (429) and network failures are retried with exponential
/// backoff up to `max_retries` extra attempts. A 404 is reported as
/// [`StorefrontError::NotFound`] so callers can try another handle.
pub struct StorefrontClient {
    client: Client,
    origin: String,
    access_token: Option<String>,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl StorefrontClient {
    /// # Errors
    ///
    /// Returns [`StorefrontError::InvalidBaseUrl`] if `base_url` has no usable
    /// origin and [`StorefrontError::Http`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, StorefrontError> {
        let origin = extract_store_origin(base_url);
        reqwest::Url::parse(&origin).map_err(|e| StorefrontError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            origin,
            access_token: None,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Client for the configured storefront, or `None` when no storefront URL
    /// is set.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Option<Self>, StorefrontError> {
        let Some(base_url) = config.storefront_url.as_deref() else {
            return Ok(None);
        };
        let client = Self::new(
            base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )?
        .with_access_token(config.storefront_token.clone());
        Ok(Some(client))
    }

    /// Sends the storefront access token with every request.
    #[must_use]
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn endpoint(&self, segments: &[&str]) -> Result<String, StorefrontError> {
        let invalid = |reason: String| StorefrontError::InvalidBaseUrl {
            base_url: self.origin.clone(),
            reason,
        };
        let mut url = reqwest::Url::parse(&self.origin).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("URL cannot be a base".to_owned()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.to_string())
    }

    fn product_url(&self, handle: &str) -> Result<String, StorefrontError> {
        self.endpoint(&["products", &format!("{handle}.js")])
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header(reqwest::header::ACCEPT, "application/json");
        match &self.access_token {
            Some(token) => builder.header(ACCESS_TOKEN_HEADER, token),
            None => builder,
        }
    }

    fn throttled(&self, response: &Response) -> StorefrontError {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(2);
        StorefrontError::RateLimited {
            domain: store_host(&self.origin),
            retry_after_secs,
        }
    }

    /// Fetches one product by handle.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::NotFound`] when the handle does not exist (not retried).
    /// - [`StorefrontError::RateLimited`] after retries are exhausted.
    /// - [`StorefrontError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`StorefrontError::Deserialize`] when the body is not a product.
    pub async fn fetch_product(&self, handle: &str) -> Result<StorefrontProduct, StorefrontError> {
        let url = self.product_url(handle.trim())?;

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.request(self.client.get(&url)).send().await?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    return Err(self.throttled(&response));
                }
                if status == StatusCode::NOT_FOUND {
                    return Err(StorefrontError::NotFound { url });
                }
                if !status.is_success() {
                    return Err(StorefrontError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<StorefrontProduct>(&body).map_err(|source| {
                    StorefrontError::Deserialize {
                        context: format!("product from {url}"),
                        source,
                    }
                })
            }
        })
        .await
    }

    /// Adds `lines` to the shopper's cart. Only success or failure matters;
    /// the cart body is not read.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::CartRejected`] for a 4xx answer such as a sold-out
    ///   variant, with the store's description.
    /// - [`StorefrontError::RateLimited`] after retries are exhausted.
    /// - [`StorefrontError::UnexpectedStatus`] for any other non-2xx status.
    pub async fn add_to_cart(&self, lines: &[CartLine]) -> Result<(), StorefrontError> {
        let url = self.endpoint(&["cart", "add.js"])?;
        let body = AddToCartRequest::from_lines(lines);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            let body = &body;
            async move {
                let response = self
                    .request(self.client.post(&url))
                    .json(body)
                    .send()
                    .await?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    return Err(self.throttled(&response));
                }
                if status.is_client_error() {
                    let text = response.text().await.unwrap_or_default();
                    let description = serde_json::from_str::<CartErrorBody>(&text)
                        .ok()
                        .and_then(|b| b.description.or(b.message))
                        .unwrap_or(text);
                    return Err(StorefrontError::CartRejected {
                        status: status.as_u16(),
                        description,
                    });
                }
                if !status.is_success() {
                    return Err(StorefrontError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }
                Ok(())
            }
        })
        .await?;

        tracing::info!(lines = lines.len(), "added items to cart");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
