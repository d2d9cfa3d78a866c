//! `browse`: render one page of the builder as text or JSON.

use std::path::PathBuf;
use std::sync::Arc;

use ringbuilder_core::{AppConfig, Product};
use ringbuilder_engine::{load_catalog, BuilderState, ViewSnapshot};
use ringbuilder_storefront::StorefrontClient;

pub(crate) struct BrowseOptions {
    pub catalog: PathBuf,
    pub query: String,
    pub page_size: usize,
    pub fetch: bool,
    pub counts: bool,
    pub json: bool,
}

/// Loads the catalog, restores the view from the query string, resolves the
/// selection context, and prints the current page.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the page size is zero,
/// or `--fetch` is given without a configured storefront.
pub(crate) async fn run_browse(config: &AppConfig, options: &BrowseOptions) -> anyhow::Result<()> {
    if options.page_size == 0 {
        anyhow::bail!("page size must be at least 1");
    }

    let products: Arc<[Product]> = load_catalog(&options.catalog)?.into();
    let mut state = BuilderState::from_query(products, &options.query, options.page_size);

    let missing = state.infer_from_catalog();
    if options.fetch && !missing.is_empty() {
        let client = StorefrontClient::from_app_config(config)?.ok_or_else(|| {
            anyhow::anyhow!("--fetch needs RINGBUILDER_STOREFRONT_URL to be set")
        })?;
        client.resolve_selections(&mut state, &missing).await;
    }

    let snapshot = state.snapshot();
    if options.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_page(&snapshot);
    if options.counts {
        print_counts(&state);
    }
    Ok(())
}

fn format_price(minor: i64) -> String {
    format!("${}.{:02}", minor / 100, (minor % 100).abs())
}

fn print_page(snapshot: &ViewSnapshot<'_>) {
    if let Some(banner) = &snapshot.banner {
        println!("{banner}");
    }
    println!("{}", snapshot.summary);
    if snapshot.items.is_empty() {
        return;
    }

    println!();
    println!(
        "{:<14}{:<10}{:<10}{:<12}{:<12}LINK",
        "ID", "KIND", "SHAPE", "CARAT", "PRICE"
    );
    for view in &snapshot.items {
        let product = view.item.product;
        let carat = product.carat().map_or_else(
            || {
                product
                    .valid_carat_range()
                    .map(|r| format!("{}-{}", r.min, r.max))
                    .unwrap_or_default()
            },
            |c| c.to_string(),
        );
        println!(
            "{:<14}{:<10}{:<10}{:<12}{:<12}{}",
            product.id,
            product.kind.as_str(),
            product.shape_label().unwrap_or(""),
            carat,
            format_price(view.price),
            view.url
        );
    }

    if snapshot.total_pages > 1 {
        let pages: Vec<String> = snapshot
            .window
            .pages
            .iter()
            .map(|&p| {
                if p == snapshot.page {
                    format!("[{p}]")
                } else {
                    p.to_string()
                }
            })
            .collect();
        println!();
        println!("pages: {} of {}", pages.join(" "), snapshot.total_pages);
    }
    if !snapshot.query.is_empty() {
        println!("query: {}", snapshot.query);
    }
}

fn print_counts(state: &BuilderState) {
    println!();
    for (key, counts) in state.all_facet_counts() {
        let options: Vec<String> = counts
            .iter()
            .map(|c| format!("{} ({})", c.value, c.count))
            .collect();
        println!("{key}: {}", options.join(", "));
    }
}
