//! Collection query engine.
//!
//! Turns an untyped client request (sort clause, field list, page
//! parameters) into typed query operations:
//! - [`PropertyMappingRegistry`] maps public view fields to model fields
//! - [`compile_sort`] turns a free-text sort clause into [`SortKey`]s
//! - [`PagedResult`] slices one page out of a [`PageSource`]
//! - [`shape`] / [`shape_one`] project typed values into [`ShapedRecord`]s
//! - [`CollectionQuery`] composes all of the above for a single request

pub mod error;
pub mod mapping;
pub mod paged;
pub mod params;
pub mod pipeline;
pub mod shape;
pub mod sort;

pub use error::{QueryError, Result};
pub use mapping::{MappingValue, PropertyMapping, PropertyMappingRegistry, RegistryBuilder};
pub use paged::{PageSource, PagedResult};
pub use params::{CollectionParameters, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use pipeline::{
    CollectionQuery, NoLinks, PageLinks, PaginationMetadata, PreparedQuery, ShapedPage,
};
pub use shape::{
    FieldDescriptor, FieldSelection, Shaped, ShapedRecord, missing_field, shape, shape_one,
    type_has_properties,
};
pub use sort::{SortClause, SortDirection, SortKey, SortTerm, apply_sort, compile_sort};
