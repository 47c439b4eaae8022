//! Property mappings for author resources.

use query::{MappingValue, PropertyMapping, PropertyMappingRegistry, RegistryBuilder};

use crate::author::{Author, AuthorDto};

/// Maps the public `AuthorDto` fields onto `Author` fields.
///
/// `name` sorts by last then first name; `age` sorts by date of birth in
/// the opposite direction.
pub fn author_property_mapping() -> PropertyMapping {
    PropertyMapping::new()
        .with("id", MappingValue::new(["id"]))
        .with("mainCategory", MappingValue::new(["mainCategory"]))
        .with("age", MappingValue::reversed(["dateOfBirth"]))
        .with("name", MappingValue::new(["lastName", "firstName"]))
}

/// Adds every catalog mapping to `builder`.
pub fn register_mappings(builder: RegistryBuilder) -> query::Result<RegistryBuilder> {
    builder.register::<AuthorDto, Author>(author_property_mapping())
}

/// Registry holding every catalog mapping.
pub fn property_mapping_registry() -> query::Result<PropertyMappingRegistry> {
    Ok(register_mappings(PropertyMappingRegistry::builder())?.build())
}
