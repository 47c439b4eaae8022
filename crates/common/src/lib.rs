//! Shared value types for the collection query service.

pub mod types;
pub mod value;

pub use types::EntityId;
pub use value::FieldValue;
