//! The owned builder state and its single recompute entry point.
//!
//! The catalog is loaded once and shared behind an `Arc`. Every filter
//! mutation goes through [`BuilderState::mutate`], which resets the page,
//! bumps the generation, and recomputes the ordered list from scratch.
//! Changing page only re-slices that list.
//!
//! Async inferences are ticketed against the selection generation, which
//! moves only when a selected handle changes. Filter and sort changes leave
//! an in-flight inference valid.

use std::collections::BTreeMap;
use std::sync::Arc;

use ringbuilder_core::{CaratRange, Product, SettingVariant};

use crate::catalog::find_by_handle;

use crate::compat::is_compatible;
use crate::context::{SelectionContext, Side, GEMSTONE_PARAM, SETTING_PARAM, SETTING_VARIANT_PARAM};
use crate::facets::{facet_counts, matches_filters, Dimension, Facet, FilterState, OptionCount};
use crate::infer::{infer_from_product, Inference};
use crate::metal::{passes_metal_selection, personalize, Personalized};
use crate::pagination::{clamp_page, page_window, paginate, total_pages, PageWindow};
use crate::price::{PriceBounds, PriceBracket};
use crate::query::{read_view, write_view, QueryParams};
use crate::sort::{sort_entries, SortKey};
use crate::view::{
    context_banner, page_query, results_summary, select_url, PageLink, ViewItem, ViewSnapshot,
};

/// Whether `product` is shown for `(context, filters)`: compatible, inside
/// every facet, and offering a selected metal if it is a setting.
#[must_use]
pub fn is_visible(product: &Product, context: &SelectionContext, filters: &FilterState) -> bool {
    is_compatible(product, context)
        && matches_filters(product, filters, None)
        && passes_metal_selection(product, filters)
}

/// The displayed order for `(products, context, filters)` as indices into
/// `products`: visible products, stably sorted by `filters.sort`.
#[must_use]
pub fn derive_view(products: &[Product], context: &SelectionContext, filters: &FilterState) -> Vec<usize> {
    let mut ordered: Vec<usize> = products
        .iter()
        .enumerate()
        .filter(|(_, p)| is_visible(p, context, filters))
        .map(|(i, _)| i)
        .collect();
    sort_entries(&mut ordered, filters.sort, |i| &products[*i]);
    ordered
}

/// Proof that an async inference was issued against a particular state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferenceTicket {
    generation: u64,
    side: Side,
}

impl InferenceTicket {
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Selection generation the inference was issued against.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone)]
pub struct BuilderState {
    products: Arc<[Product]>,
    context: SelectionContext,
    filters: FilterState,
    /// The query the view was loaded from, kept so unrelated parameters
    /// survive view sync.
    base_params: QueryParams,
    page: usize,
    page_size: usize,
    generation: u64,
    /// Bumped when a selected handle changes; checked by inference tickets.
    selection_generation: u64,
    /// Indices into `products`, in display order.
    ordered: Vec<usize>,
}

impl BuilderState {
    #[must_use]
    pub fn new(products: Arc<[Product]>, context: SelectionContext, page_size: usize) -> Self {
        Self::with_view(
            products,
            context,
            FilterState::default(),
            QueryParams::default(),
            1,
            page_size,
        )
    }

    /// Restores a view from a page query string: selection context,
    /// filters, sort, and page.
    #[must_use]
    pub fn from_query(products: Arc<[Product]>, query: &str, page_size: usize) -> Self {
        let params = QueryParams::parse(query);
        let context = SelectionContext::from_params(&params);
        let (filters, page) = read_view(&params);
        Self::with_view(products, context, filters, params, page, page_size)
    }

    fn with_view(
        products: Arc<[Product]>,
        context: SelectionContext,
        filters: FilterState,
        base_params: QueryParams,
        page: usize,
        page_size: usize,
    ) -> Self {
        let mut state = Self {
            products,
            context,
            filters,
            base_params,
            page,
            page_size: page_size.max(1),
            generation: 0,
            selection_generation: 0,
            ordered: Vec::new(),
        };
        state.recompute();
        state
    }

    // ---- accessors

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn context(&self) -> &SelectionContext {
        &self.context
    }

    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn selection_generation(&self) -> u64 {
        self.selection_generation
    }

    /// Number of products in the filtered, ordered list.
    #[must_use]
    pub fn total(&self) -> usize {
        self.ordered.len()
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        total_pages(self.ordered.len(), self.page_size)
    }

    /// The full ordered list, not just the current page.
    pub fn ordered(&self) -> impl Iterator<Item = &Product> + '_ {
        self.ordered.iter().map(|i| &self.products[*i])
    }

    // ---- recompute

    fn recompute(&mut self) {
        self.ordered = derive_view(&self.products, &self.context, &self.filters);
        self.page = clamp_page(self.page, self.total_pages());

        tracing::info!(
            generation = self.generation,
            selection = self.selection_generation,
            catalog = self.products.len(),
            visible = self.ordered.len(),
            page = self.page,
            "recomputed builder view"
        );
    }

    /// Applies a user mutation to the filters, then resets to page 1,
    /// advances the generation, and recomputes.
    pub fn mutate<R>(&mut self, change: impl FnOnce(&mut FilterState) -> R) -> R {
        let result = change(&mut self.filters);
        self.generation += 1;
        self.page = 1;
        self.recompute();
        result
    }

    pub fn toggle_facet(&mut self, facet: Facet, value: &str) -> bool {
        self.mutate(|f| f.toggle(facet, value))
    }

    pub fn toggle_carat_range(&mut self, range: CaratRange) -> bool {
        self.mutate(|f| f.toggle_carat_range(range))
    }

    pub fn toggle_price_bracket(&mut self, bracket: PriceBracket) -> bool {
        self.mutate(|f| f.toggle_price_bracket(bracket))
    }

    pub fn set_manual_price(&mut self, bounds: Option<PriceBounds>) {
        self.mutate(|f| f.manual_price = bounds);
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.mutate(|f| f.sort = sort);
    }

    pub fn clear_filters(&mut self) {
        self.mutate(FilterState::clear_filters);
    }

    /// Replaces the selection on `side` (or clears it with `None`) and
    /// re-derives what its handle implies. Inferences issued for the old
    /// selection become stale.
    pub fn select(&mut self, side: Side, handle: Option<&str>) {
        self.context.reselect(side, handle);
        self.base_params.retain_keys(|k| {
            !matches!(k, GEMSTONE_PARAM | SETTING_PARAM | SETTING_VARIANT_PARAM)
        });
        for (key, value) in self.context.to_params().iter() {
            self.base_params.append(&key, &value);
        }
        self.selection_generation += 1;
        self.page = 1;
        self.recompute();
    }

    /// Moves to `page` without recomputing. Out-of-range pages show page 1.
    pub fn go_to_page(&mut self, page: usize) {
        self.page = clamp_page(page, self.total_pages());
    }

    // ---- async inference

    /// Tags an inference about to be fetched for `side`.
    #[must_use]
    pub fn begin_inference(&self, side: Side) -> InferenceTicket {
        InferenceTicket {
            generation: self.selection_generation,
            side,
        }
    }

    /// Merges a fetched inference if the selection it was issued for is
    /// still current. Returns whether it was applied.
    pub fn apply_inference(&mut self, ticket: InferenceTicket, inference: Inference) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.context.absorb(ticket.side, inference);
        self.recompute();
        true
    }

    /// Merges the selected setting variant's size span, with the same
    /// staleness check as [`BuilderState::apply_inference`].
    pub fn apply_setting_variant_range(&mut self, ticket: InferenceTicket, range: CaratRange) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.context.set_setting_variant_range(range);
        self.recompute();
        true
    }

    /// Fills the selection context from the catalog's own records of the
    /// selected products, including the selected setting variant's size.
    /// Returns the sides whose handle is not in the catalog, so the caller
    /// can look them up elsewhere.
    pub fn infer_from_catalog(&mut self) -> Vec<Side> {
        let mut missing = Vec::new();
        let mut changed = false;

        for side in [Side::Gemstone, Side::Setting] {
            let Some(handle) = self.context.handle(side) else {
                continue;
            };
            let Some(product) = find_by_handle(&self.products, handle) else {
                missing.push(side);
                continue;
            };

            let inference = infer_from_product(product);
            let variant_range = match (side, self.context.setting_variant.as_deref()) {
                (Side::Setting, Some(id)) => product
                    .variants
                    .iter()
                    .find(|v| v.variant_id == id)
                    .map(SettingVariant::carat_range),
                _ => None,
            };
            tracing::debug!(
                product_id = %product.id,
                ?side,
                ?inference,
                "inferred selection from catalog"
            );

            self.context.absorb(side, inference);
            if let Some(range) = variant_range {
                self.context.set_setting_variant_range(range);
            }
            changed = true;
        }

        if changed {
            self.recompute();
        }
        missing
    }

    fn is_current(&self, ticket: InferenceTicket) -> bool {
        if ticket.generation == self.selection_generation {
            return true;
        }
        tracing::debug!(
            issued = ticket.generation,
            current = self.selection_generation,
            "discarding stale inference"
        );
        false
    }

    // ---- outputs

    /// Items on the current page, with metal personalization applied.
    #[must_use]
    pub fn page_items(&self) -> Vec<Personalized<'_>> {
        let page = paginate(&self.ordered, self.page_size, self.page);
        personalize(page.items.iter().map(|i| &self.products[*i]), &self.filters)
    }

    /// Whether any filter or compatibility rule narrows the list.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        self.filters.has_active_filters() || self.context.is_constrained()
    }

    #[must_use]
    pub fn summary(&self) -> String {
        let page = paginate(&self.ordered, self.page_size, self.page);
        results_summary(page.start, page.end, page.total, self.is_filtered())
    }

    #[must_use]
    pub fn banner(&self) -> Option<String> {
        context_banner(&self.context)
    }

    #[must_use]
    pub fn page_window(&self) -> PageWindow {
        page_window(self.page, self.total_pages())
    }

    /// The query string reflecting the current view.
    #[must_use]
    pub fn query_string(&self) -> String {
        write_view(&self.base_params, &self.filters, self.page).to_query_string()
    }

    /// Link for selecting a displayed item.
    #[must_use]
    pub fn select_url(&self, item: &Personalized<'_>) -> String {
        select_url(
            item.product,
            &self.context,
            item.variant.map(|v| v.variant_id.as_str()),
        )
    }

    /// The current page with its links and summary text.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot<'_> {
        let window = self.page_window();
        let base = QueryParams::parse(&self.query_string());
        let page_links = window
            .pages
            .iter()
            .map(|&page| PageLink {
                page,
                query: page_query(&base, page),
            })
            .collect();

        ViewSnapshot {
            items: self
                .page_items()
                .into_iter()
                .map(|item| ViewItem {
                    url: self.select_url(&item),
                    price: item.price(),
                    image: item.image(),
                    item,
                })
                .collect(),
            page: self.page,
            total_pages: self.total_pages(),
            total: self.total(),
            summary: self.summary(),
            banner: self.banner(),
            query: self.query_string(),
            window,
            page_links,
        }
    }

    #[must_use]
    pub fn facet_counts(&self, dimension: Dimension) -> Vec<OptionCount> {
        facet_counts(&self.products, &self.context, &self.filters, dimension)
    }

    /// Option counts for every dimension that has at least one option,
    /// keyed by [`Dimension::key`].
    #[must_use]
    pub fn all_facet_counts(&self) -> BTreeMap<&'static str, Vec<OptionCount>> {
        Dimension::all()
            .map(|d| (d.key(), self.facet_counts(d)))
            .filter(|(_, counts)| !counts.is_empty())
            .collect()
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
