pub mod attributes;
pub mod cart;
pub mod catalog;
pub mod classify;
pub mod compat;
pub mod context;
pub mod error;
pub mod facets;
pub mod infer;
pub mod metal;
pub mod normalize;
pub mod pagination;
pub mod parse;
mod parse_helpers;
pub mod price;
pub mod query;
pub mod sort;
pub mod state;
pub mod summary;
pub mod types;
pub mod variant;
pub mod view;

pub use attributes::product_from_attributes;
pub use cart::{cart_lines_for_pair, CartLine};
pub use catalog::{find_by_handle, find_product, load_catalog, parse_attribute_catalog};
pub use classify::{classify, Classification};
pub use compat::{compatible_set, is_compatible};
pub use context::{SelectionContext, Side};
pub use error::EngineError;
pub use facets::{apply_facets, facet_counts, Dimension, Facet, FilterState, OptionCount};
pub use infer::{infer_from_handle, infer_from_product, lookup_handles, Inference};
pub use metal::{personalize, Personalized};
pub use normalize::{normalize_product, parse_catalog};
pub use pagination::{page_window, paginate, Page, PageWindow};
pub use price::{PriceBounds, PriceBracket};
pub use query::{read_view, write_view, QueryParams};
pub use sort::{sort_products, SortKey};
pub use state::{derive_view, is_visible, BuilderState, InferenceTicket};
pub use summary::{pair_summary, PairSummary, SummaryRow};
pub use types::{RawCatalog, RawProduct, RawVariant};
pub use variant::{resolve_variant, variant_id_for_carat_or_default};
pub use view::{PageLink, ViewItem, ViewSnapshot};
