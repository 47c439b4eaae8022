//! The collection query pipeline.
//!
//! A request is validated and compiled by [`CollectionQuery::prepare`]
//! before any data is touched. The caller then fetches the filtered, sorted
//! source from its store, pages it, and hands the page back to
//! [`PreparedQuery::finish`] for conversion and shaping.

use std::marker::PhantomData;

use serde::Serialize;

use crate::mapping::PropertyMappingRegistry;
use crate::paged::{PageSource, PagedResult};
use crate::params::CollectionParameters;
use crate::shape::{FieldSelection, Shaped, ShapedRecord, missing_field};
use crate::sort::{SortKey, compile_sort};
use crate::{QueryError, Result};

/// Builds links to other pages of the same collection request.
pub trait PageLinks {
    /// Link to `page_number` with every other parameter unchanged, or
    /// `None` when no link can be built.
    fn page_link(&self, params: &CollectionParameters, page_number: usize) -> Option<String>;
}

/// Produces no links.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLinks;

impl PageLinks for NoLinks {
    fn page_link(&self, _params: &CollectionParameters, _page_number: usize) -> Option<String> {
        None
    }
}

/// Pagination metadata returned alongside a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_count: usize,
    pub page_size: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub previous_page_link: Option<String>,
    pub next_page_link: Option<String>,
}

impl PaginationMetadata {
    /// Builds metadata for `page`, with links only where a neighbour exists.
    pub fn for_page<T>(
        page: &PagedResult<T>,
        params: &CollectionParameters,
        links: &dyn PageLinks,
    ) -> Self {
        let previous_page_link = page
            .has_previous()
            .then(|| links.page_link(params, page.current_page() - 1))
            .flatten();
        let next_page_link = page
            .has_next()
            .then(|| links.page_link(params, page.current_page() + 1))
            .flatten();

        Self {
            total_count: page.total_count(),
            page_size: page.page_size(),
            current_page: page.current_page(),
            total_pages: page.total_pages(),
            previous_page_link,
            next_page_link,
        }
    }
}

/// Shaped items of one page plus its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedPage {
    pub items: Vec<ShapedRecord>,
    pub metadata: PaginationMetadata,
}

/// Entry point for running collection requests against a registry.
#[derive(Debug, Clone, Copy)]
pub struct CollectionQuery<'r> {
    registry: &'r PropertyMappingRegistry,
}

impl<'r> CollectionQuery<'r> {
    pub fn new(registry: &'r PropertyMappingRegistry) -> Self {
        Self { registry }
    }

    /// Validates a request for view `V` over model `M` and compiles its sort.
    ///
    /// Fails before any data access if the sort clause names an unmapped
    /// field, the field list names a field `V` does not have, or the
    /// registry has no mapping for the pair.
    pub fn prepare<V: Shaped, M: Shaped>(
        &self,
        params: &CollectionParameters,
    ) -> Result<PreparedQuery<V, M>> {
        metrics::counter!("collection_queries_total").increment(1);

        self.check::<V, M>(params).inspect_err(|err| {
            metrics::counter!("collection_queries_rejected_total", "reason" => err.reason())
                .increment(1);
            if err.is_client_error() {
                tracing::warn!(error = %err, "rejected collection request");
            } else {
                tracing::error!(error = %err, "collection query misconfigured");
            }
        })
    }

    fn check<V: Shaped, M: Shaped>(
        &self,
        params: &CollectionParameters,
    ) -> Result<PreparedQuery<V, M>> {
        let mapping = self.registry.mapping::<V, M>()?;

        if !self
            .registry
            .valid_mapping_exists_for::<V, M>(&params.order_by)?
        {
            let field = mapping.first_unmapped(&params.order_by).unwrap_or_default();
            return Err(QueryError::UnknownSortField {
                field: field.to_string(),
            });
        }

        if let Some(field) = missing_field::<V>(&params.fields) {
            return Err(QueryError::UnknownProjectionField {
                field: field.to_string(),
                type_name: V::type_name(),
            });
        }

        let sort = compile_sort(&params.order_by, mapping)?;
        let selection = FieldSelection::<V>::parse(&params.fields)?;

        Ok(PreparedQuery {
            params: params.clone(),
            sort,
            selection,
            _model: PhantomData,
        })
    }
}

/// A validated request: compiled sort keys and a resolved field selection.
#[derive(Debug)]
pub struct PreparedQuery<V: 'static, M> {
    params: CollectionParameters,
    sort: Vec<SortKey>,
    selection: FieldSelection<V>,
    _model: PhantomData<fn() -> M>,
}

impl<V: Shaped, M> PreparedQuery<V, M> {
    /// Model-level sort keys for the store.
    pub fn sort(&self) -> &[SortKey] {
        &self.sort
    }

    /// Pages a filtered, sorted source using the requested page parameters.
    pub fn paginate<S>(&self, source: &S) -> PagedResult<M>
    where
        S: PageSource<Item = M> + ?Sized,
    {
        PagedResult::create(source, self.params.page_number, self.params.page_size)
    }

    /// Converts a page of models into views and shapes them.
    pub fn finish(&self, page: PagedResult<M>, links: &dyn PageLinks) -> ShapedPage
    where
        V: for<'a> From<&'a M>,
    {
        let metadata = PaginationMetadata::for_page(&page, &self.params, links);
        metrics::histogram!("collection_page_size").record(page.len() as f64);

        let items = page
            .iter()
            .map(|model| self.selection.project(&V::from(model)))
            .collect();

        ShapedPage { items, metadata }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PathLinks;

    impl PageLinks for PathLinks {
        fn page_link(&self, _params: &CollectionParameters, page_number: usize) -> Option<String> {
            Some(format!("/items?pageNumber={page_number}"))
        }
    }

    fn middle_page() -> PagedResult<usize> {
        PagedResult::create(&(1..=25).collect::<Vec<usize>>(), 2, 10)
    }

    #[test]
    fn no_links_leaves_both_links_null() {
        let metadata =
            PaginationMetadata::for_page(&middle_page(), &CollectionParameters::new(), &NoLinks);

        assert!(metadata.previous_page_link.is_none());
        assert!(metadata.next_page_link.is_none());

        let json = serde_json::to_value(&metadata).unwrap();
        assert!(json["previousPageLink"].is_null());
        assert!(json["nextPageLink"].is_null());
        assert_eq!(json["totalPages"], 3);
    }

    #[test]
    fn links_only_point_at_existing_neighbours() {
        let params = CollectionParameters::new();

        let metadata = PaginationMetadata::for_page(&middle_page(), &params, &PathLinks);
        assert_eq!(metadata.previous_page_link.as_deref(), Some("/items?pageNumber=1"));
        assert_eq!(metadata.next_page_link.as_deref(), Some("/items?pageNumber=3"));

        let first = PagedResult::create(&(1..=25).collect::<Vec<usize>>(), 1, 10);
        let metadata = PaginationMetadata::for_page(&first, &params, &PathLinks);
        assert!(metadata.previous_page_link.is_none());
        assert!(metadata.next_page_link.is_some());
    }
}
