//! `infer`: what a selected handle says about the other side.

use ringbuilder_core::AppConfig;
use ringbuilder_engine::{infer_from_handle, Inference, Side};
use ringbuilder_storefront::StorefrontClient;

/// Prints the inferred shape and carat for `handle`.
///
/// With `fetch` the storefront record is consulted first, falling back to
/// the handle patterns; without it only the handle is read.
///
/// # Errors
///
/// Returns an error if `fetch` is set but no storefront is configured or
/// the client cannot be built.
pub(crate) async fn run_infer(
    config: &AppConfig,
    handle: &str,
    side: Side,
    fetch: bool,
) -> anyhow::Result<()> {
    let inference = if fetch {
        let client = StorefrontClient::from_app_config(config)?.ok_or_else(|| {
            anyhow::anyhow!("--fetch needs RINGBUILDER_STOREFRONT_URL to be set")
        })?;
        client.infer_selection(handle, side).await
    } else {
        handle_only(handle, side)
    };

    print_inference(&inference);
    Ok(())
}

fn handle_only(handle: &str, side: Side) -> Inference {
    let inference = infer_from_handle(handle);
    match side {
        Side::Gemstone => inference,
        // Digits in a setting handle describe the setting, not a stone.
        Side::Setting => Inference {
            carat: None,
            ..inference
        },
    }
}

fn print_inference(inference: &Inference) {
    if inference.is_empty() {
        println!("nothing inferred; the catalog stays unconstrained");
        return;
    }
    if let Some(shape) = inference.shape {
        println!("shape: {shape}");
    }
    if let Some(carat) = inference.carat {
        println!("carat: {carat}");
    }
    if let Some(range) = inference.carat_range {
        println!("carat range: {}-{}", range.min, range.max);
    }
}
