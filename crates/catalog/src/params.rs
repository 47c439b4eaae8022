//! Request parameters for the authors collection.

use query::CollectionParameters;

/// Sort clause applied when the client sends none.
pub const DEFAULT_AUTHORS_ORDER_BY: &str = "name";

/// Collection parameters plus the author-specific filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorsResourceParameters {
    pub collection: CollectionParameters,

    /// Exact main category to keep, compared case-insensitively.
    pub main_category: Option<String>,

    /// Text to look for in main category, first name or last name.
    pub search_query: Option<String>,
}

impl AuthorsResourceParameters {
    /// Default paging, sorted by name, no filters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(mut self, collection: CollectionParameters) -> Self {
        self.collection = collection;
        self
    }

    pub fn main_category(mut self, main_category: impl Into<String>) -> Self {
        self.main_category = Some(main_category.into());
        self
    }

    pub fn search_query(mut self, search_query: impl Into<String>) -> Self {
        self.search_query = Some(search_query.into());
        self
    }

    /// The main category filter, trimmed, if it is not blank.
    pub fn main_category_filter(&self) -> Option<&str> {
        non_blank(self.main_category.as_deref())
    }

    /// The search filter, trimmed, if it is not blank.
    pub fn search_query_filter(&self) -> Option<&str> {
        non_blank(self.search_query.as_deref())
    }
}

impl Default for AuthorsResourceParameters {
    fn default() -> Self {
        Self {
            collection: CollectionParameters::new().order_by(DEFAULT_AUTHORS_ORDER_BY),
            main_category: None,
            search_query: None,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sort_by_name() {
        let params = AuthorsResourceParameters::new();
        assert_eq!(params.collection.order_by, "name");
        assert_eq!(params.collection.page_size, query::DEFAULT_PAGE_SIZE);
        assert!(params.main_category_filter().is_none());
    }

    #[test]
    fn filters_are_trimmed_and_blank_ones_ignored() {
        let params = AuthorsResourceParameters::new()
            .main_category("  Rum ")
            .search_query("   ");
        assert_eq!(params.main_category_filter(), Some("Rum"));
        assert!(params.search_query_filter().is_none());
    }
}
