mod browse;
mod cart;
mod infer;
mod variant;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use ringbuilder_engine::{CartLine, Side};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ringbuilder-cli")]
#[command(about = "Ring builder command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show one page of the builder for a collection query string
    Browse {
        /// Catalog file (storefront export or card attribute list)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Page query string, e.g. "gemstone=oval-2-01-ct&filter_metal=Platinum"
        #[arg(long, default_value = "")]
        query: String,
        /// Products per page (defaults to RINGBUILDER_PAGE_SIZE)
        #[arg(long)]
        page_size: Option<usize>,
        /// Look selections missing from the catalog up on the storefront
        #[arg(long)]
        fetch: bool,
        /// Print facet option counts below the page
        #[arg(long)]
        counts: bool,
        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve the setting variant sized for a centre-stone weight
    ResolveVariant {
        #[arg(long)]
        catalog: Option<PathBuf>,
        #[arg(long)]
        product_id: String,
        #[arg(long)]
        carat: f64,
    },
    /// Infer shape and carat for a selected product handle
    Infer {
        #[arg(long)]
        handle: String,
        #[arg(long, value_enum)]
        kind: SideArg,
        /// Use the storefront record instead of the handle alone
        #[arg(long)]
        fetch: bool,
    },
    /// Add variants to the storefront cart
    AddToCart {
        /// Variant to add as ID or ID:QTY; repeatable
        #[arg(long = "variant", required = true, value_parser = parse_cart_line)]
        variants: Vec<CartLine>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SideArg {
    Gemstone,
    Setting,
}

impl From<SideArg> for Side {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::Gemstone => Side::Gemstone,
            SideArg::Setting => Side::Setting,
        }
    }
}

/// Parses `ID` or `ID:QTY` into a cart line. Quantity defaults to 1 and
/// must be positive.
fn parse_cart_line(value: &str) -> Result<CartLine, String> {
    let (id, quantity) = match value.split_once(':') {
        Some((id, qty)) => {
            let qty = qty
                .trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid quantity \"{qty}\": {e}"))?;
            (id, qty)
        }
        None => (value, 1),
    };
    let id = id.trim();
    if id.is_empty() {
        return Err("variant id must not be empty".to_string());
    }
    if quantity == 0 {
        return Err("quantity must be at least 1".to_string());
    }
    Ok(CartLine::new(id, quantity))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ringbuilder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Browse {
            catalog,
            query,
            page_size,
            fetch,
            counts,
            json,
        } => {
            let options = browse::BrowseOptions {
                catalog: catalog.unwrap_or_else(|| config.catalog_path.clone()),
                query,
                page_size: page_size.unwrap_or(config.page_size),
                fetch,
                counts,
                json,
            };
            browse::run_browse(&config, &options).await?;
        }
        Commands::ResolveVariant {
            catalog,
            product_id,
            carat,
        } => {
            let catalog = catalog.unwrap_or_else(|| config.catalog_path.clone());
            variant::run_resolve_variant(&catalog, &product_id, carat)?;
        }
        Commands::Infer {
            handle,
            kind,
            fetch,
        } => infer::run_infer(&config, &handle, kind.into(), fetch).await?,
        Commands::AddToCart { variants } => cart::run_add_to_cart(&config, &variants).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
