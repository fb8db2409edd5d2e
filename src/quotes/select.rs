//! Category index, filtering and random selection.
//!
//! All functions here are read-only views of a [`QuoteStore`]; nothing is
//! cached, so the category list always reflects the latest merge.

use rand::Rng;
use std::collections::BTreeSet;

use super::QuoteStore;
use crate::storage::{normalize_category, Quote};

/// Filter value meaning "no filter".
pub const ALL_CATEGORIES: &str = "all";

/// Returns the distinct categories in the store, sorted.
pub fn categories_of(store: &QuoteStore) -> BTreeSet<String> {
    store
        .iter()
        .map(|q| normalize_category(Some(&q.category)))
        .collect()
}

/// Returns true if `category` selects every quote.
pub fn is_all_filter(category: Option<&str>) -> bool {
    match category.map(str::trim) {
        None => true,
        Some(c) => c.is_empty() || c.eq_ignore_ascii_case(ALL_CATEGORIES),
    }
}

/// Returns the quotes matching `category`.
///
/// `None`, blank or `"all"` return everything. Otherwise the category is
/// normalized the same way quotes are at ingestion and matched exactly.
pub fn filter(store: &QuoteStore, category: Option<&str>) -> Vec<Quote> {
    if is_all_filter(category) {
        return store.all();
    }
    let wanted = normalize_category(category);
    store
        .iter()
        .filter(|q| q.category == wanted)
        .cloned()
        .collect()
}

/// Picks one quote uniformly at random.
///
/// Returns `None` for an empty slice.
pub fn pick_random<'a, R: Rng + ?Sized>(quotes: &'a [Quote], rng: &mut R) -> Option<&'a Quote> {
    if quotes.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..quotes.len());
    quotes.get(index)
}
