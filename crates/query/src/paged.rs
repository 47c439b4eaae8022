//! Paginated result container.

/// An ordered, countable, sliceable data source.
///
/// Implementations backed by storage are expected to push the count and the
/// slice down to the store. Count and slice are separate calls, so a source
/// over a store that is being written to may observe different snapshots for
/// each.
pub trait PageSource {
    type Item;

    /// Number of items in the full (filtered, sorted, un-paged) source.
    fn count(&self) -> usize;

    /// Up to `limit` items starting at `offset`. Out-of-range offsets yield
    /// an empty vector.
    fn slice(&self, offset: usize, limit: usize) -> Vec<Self::Item>;
}

impl<T: Clone> PageSource for [T] {
    type Item = T;

    fn count(&self) -> usize {
        self.len()
    }

    fn slice(&self, offset: usize, limit: usize) -> Vec<T> {
        self.iter().skip(offset).take(limit).cloned().collect()
    }
}

impl<T: Clone> PageSource for Vec<T> {
    type Item = T;

    fn count(&self) -> usize {
        self.len()
    }

    fn slice(&self, offset: usize, limit: usize) -> Vec<T> {
        self.as_slice().slice(offset, limit)
    }
}

/// One page of results plus the counts that locate it in the full set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedResult<T> {
    items: Vec<T>,
    total_count: usize,
    page_size: usize,
    current_page: usize,
    total_pages: usize,
}

impl<T> PagedResult<T> {
    /// Counts `source` and slices page `page_number` of `page_size` items.
    ///
    /// Both arguments must be at least 1; the request layer clamps them
    /// before they get here. A page past the end yields no items.
    ///
    /// # Panics
    ///
    /// Panics if `page_size` is zero.
    pub fn create<S>(source: &S, page_number: usize, page_size: usize) -> Self
    where
        S: PageSource<Item = T> + ?Sized,
    {
        debug_assert!(page_number >= 1, "page_number must be at least 1");
        debug_assert!(page_size >= 1, "page_size must be at least 1");

        let total_count = source.count();
        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        let items = source.slice(offset, page_size);

        Self::new(items, total_count, page_number, page_size)
    }

    /// Wraps an already-sliced page.
    pub fn new(items: Vec<T>, total_count: usize, current_page: usize, page_size: usize) -> Self {
        Self {
            items,
            total_count,
            page_size,
            current_page,
            total_pages: total_count.div_ceil(page_size),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for PagedResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PagedResult<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
