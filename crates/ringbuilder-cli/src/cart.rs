//! `add-to-cart`: post variant lines to the storefront cart.

use ringbuilder_core::AppConfig;
use ringbuilder_engine::CartLine;
use ringbuilder_storefront::StorefrontClient;

/// # Errors
///
/// Returns an error if no storefront is configured or the store rejects
/// the items.
pub(crate) async fn run_add_to_cart(config: &AppConfig, lines: &[CartLine]) -> anyhow::Result<()> {
    let client = StorefrontClient::from_app_config(config)?
        .ok_or_else(|| anyhow::anyhow!("add-to-cart needs RINGBUILDER_STOREFRONT_URL to be set"))?;

    client.add_to_cart(lines).await?;
    let total: u32 = lines.iter().map(|l| l.quantity).sum();
    println!("added {total} item(s) to the cart at {}", client.origin());
    Ok(())
}
