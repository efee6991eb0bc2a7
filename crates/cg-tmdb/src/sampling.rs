//! Random selection from the popular-people listing.
//!
//! The listing is treated as a fixed population of [`POPULAR_POPULATION`]
//! entries spread over pages of [`POPULAR_PAGE_SIZE`]. An [`IndexSource`]
//! picks a position; [`PagePosition`] maps it to a page and an offset.

use rand::Rng;

/// Number of popular people sampled from.
pub const POPULAR_POPULATION: u32 = 500;
/// Upstream page size of the popular-people listing.
pub const POPULAR_PAGE_SIZE: u32 = 20;

/// Source of uniformly distributed indices in `0..population`.
pub trait IndexSource: Send + Sync {
    fn next_index(&self, population: u32) -> u32;
}

/// [`IndexSource`] backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngIndex;

impl IndexSource for ThreadRngIndex {
    fn next_index(&self, population: u32) -> u32 {
        if population == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..population)
    }
}

/// [`IndexSource`] that always returns the same index.
#[derive(Debug, Clone, Copy)]
pub struct FixedIndex(pub u32);

impl IndexSource for FixedIndex {
    fn next_index(&self, _population: u32) -> u32 {
        self.0
    }
}

/// Location of a population index within paged results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePosition {
    /// 1-based page number.
    pub page: u32,
    /// 0-based offset within the page.
    pub offset: usize,
}

impl PagePosition {
    pub fn for_index(index: u32, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        Self {
            page: index / page_size + 1,
            offset: (index % page_size) as usize,
        }
    }
}

/// Take the item at `offset`, or the last item when the page is shorter.
/// Returns `None` only for an empty page.
pub fn pick_clamped<T>(mut items: Vec<T>, offset: usize) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    let index = offset.min(items.len() - 1);
    Some(items.swap_remove(index))
}
