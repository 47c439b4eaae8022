//! Author catalog: the storage model, its public view, the property mapping
//! between them, and an in-memory repository.

pub mod author;
pub mod error;
pub mod mapping;
pub mod params;
pub mod repository;
pub mod seed;

pub use author::{Author, AuthorDto};
pub use error::{CatalogError, Result};
pub use mapping::{author_property_mapping, property_mapping_registry, register_mappings};
pub use params::AuthorsResourceParameters;
pub use repository::{AuthorRepository, InMemoryAuthorRepository};
