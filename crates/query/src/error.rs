//! Query error types.

use thiserror::Error;

/// Errors that can occur while validating, sorting or shaping a query.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// A sort clause names a field that has no mapping.
    #[error("Key mapping for {field} is missing")]
    UnknownSortField { field: String },

    /// A requested projection field is not a public field of the type.
    #[error("Property {field} wasn't found on {type_name}")]
    UnknownProjectionField {
        field: String,
        type_name: &'static str,
    },

    /// No mapping has been registered for the view/model pair.
    #[error("Cannot find exact property mapping instance for <{view},{model}>")]
    MappingNotFound {
        view: &'static str,
        model: &'static str,
    },

    /// A mapping entry exists but maps to no target fields.
    #[error("Mapping for {field} has no target fields")]
    MissingMappingValue { field: String },

    /// A mapping target or sort key names a field the model does not have.
    #[error("Model {model} has no field {field}")]
    UnknownModelField { field: String, model: &'static str },

    /// The view/model pair was registered more than once.
    #[error("Property mapping for <{view},{model}> is already registered")]
    DuplicateMapping {
        view: &'static str,
        model: &'static str,
    },
}

impl QueryError {
    /// Returns true when the error was caused by client input rather than
    /// by a configuration defect.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            QueryError::UnknownSortField { .. } | QueryError::UnknownProjectionField { .. }
        )
    }

    /// Short machine-readable label, used for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            QueryError::UnknownSortField { .. } => "unknown_sort_field",
            QueryError::UnknownProjectionField { .. } => "unknown_projection_field",
            QueryError::MappingNotFound { .. } => "mapping_not_found",
            QueryError::MissingMappingValue { .. } => "missing_mapping_value",
            QueryError::UnknownModelField { .. } => "unknown_model_field",
            QueryError::DuplicateMapping { .. } => "duplicate_mapping",
        }
    }
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
