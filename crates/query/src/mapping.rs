//! Property mapping between public view fields and internal model fields.

use std::any::TypeId;
use std::collections::HashMap;

use crate::shape::{Shaped, short_type_name};
use crate::sort::SortClause;
use crate::{QueryError, Result};

/// Where one public field points to in the model.
///
/// `target_fields` are applied in listed order. When `reverse_direction` is
/// set, sorting by the public field flips the requested direction (e.g. a
/// public `age` sorted ascending is a `dateOfBirth` sorted descending).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingValue {
    target_fields: Vec<String>,
    reverse_direction: bool,
}

impl MappingValue {
    /// Maps to the given model fields without reversing direction.
    pub fn new<I, S>(target_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_fields: target_fields.into_iter().map(Into::into).collect(),
            reverse_direction: false,
        }
    }

    /// Maps to the given model fields with the sort direction reversed.
    pub fn reversed<I, S>(target_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reverse_direction: true,
            ..Self::new(target_fields)
        }
    }

    pub fn target_fields(&self) -> &[String] {
        &self.target_fields
    }

    pub fn reverse_direction(&self) -> bool {
        self.reverse_direction
    }
}

/// Public field name (case-insensitive) to [`MappingValue`].
#[derive(Debug, Clone, Default)]
pub struct PropertyMapping {
    entries: HashMap<String, MappingValue>,
}

impl PropertyMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, chaining.
    pub fn with(mut self, public_field: &str, value: MappingValue) -> Self {
        self.insert(public_field, value);
        self
    }

    pub fn insert(&mut self, public_field: &str, value: MappingValue) {
        self.entries.insert(public_field.to_lowercase(), value);
    }

    /// Looks up a public field, ignoring case.
    pub fn get(&self, public_field: &str) -> Option<&MappingValue> {
        self.entries.get(&public_field.to_lowercase())
    }

    pub fn contains(&self, public_field: &str) -> bool {
        self.get(public_field).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the first field in the sort clause that has no mapping.
    pub fn first_unmapped<'a>(&self, order_by: &'a str) -> Option<&'a str> {
        SortClause::parse(order_by)
            .terms()
            .iter()
            .map(|term| term.field)
            .find(|field| !self.contains(field))
    }
}

#[derive(Debug)]
struct RegisteredMapping {
    view: &'static str,
    model: &'static str,
    mapping: PropertyMapping,
}

/// Builds a [`PropertyMappingRegistry`] at start-up.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    mappings: HashMap<(TypeId, TypeId), RegisteredMapping>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the mapping for the `V` view over the `M` model.
    ///
    /// Every target field must exist on `M`, every entry must name at least
    /// one target, and each pair can only be registered once.
    pub fn register<V: 'static, M: Shaped>(mut self, mapping: PropertyMapping) -> Result<Self> {
        let view = short_type_name::<V>();
        let model = M::type_name();

        for (public_field, value) in &mapping.entries {
            if value.target_fields.is_empty() {
                return Err(QueryError::MissingMappingValue {
                    field: public_field.clone(),
                });
            }
            if let Some(missing) = value.target_fields.iter().find(|f| M::field(f).is_none()) {
                return Err(QueryError::UnknownModelField {
                    field: missing.clone(),
                    model,
                });
            }
        }

        let key = (TypeId::of::<V>(), TypeId::of::<M>());
        if self.mappings.contains_key(&key) {
            return Err(QueryError::DuplicateMapping { view, model });
        }

        tracing::debug!(view, model, entries = mapping.len(), "registered property mapping");
        self.mappings.insert(
            key,
            RegisteredMapping {
                view,
                model,
                mapping,
            },
        );
        Ok(self)
    }

    pub fn build(self) -> PropertyMappingRegistry {
        PropertyMappingRegistry {
            mappings: self.mappings,
        }
    }
}

/// Immutable registry of property mappings, keyed by (view, model) type.
///
/// Built once at start-up and shared by reference; reads need no locking.
#[derive(Debug)]
pub struct PropertyMappingRegistry {
    mappings: HashMap<(TypeId, TypeId), RegisteredMapping>,
}

impl PropertyMappingRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Returns the mapping registered for `V` over `M`.
    pub fn mapping<V: 'static, M: 'static>(&self) -> Result<&PropertyMapping> {
        self.mappings
            .get(&(TypeId::of::<V>(), TypeId::of::<M>()))
            .map(|r| &r.mapping)
            .ok_or_else(|| QueryError::MappingNotFound {
                view: short_type_name::<V>(),
                model: short_type_name::<M>(),
            })
    }

    /// Checks that every field in a sort clause has a mapping for `V` over `M`.
    ///
    /// A blank clause is trivially valid. Fails only when no mapping is
    /// registered for the pair, which is a configuration defect rather than
    /// bad client input.
    pub fn valid_mapping_exists_for<V: 'static, M: 'static>(&self, order_by: &str) -> Result<bool> {
        let mapping = self.mapping::<V, M>()?;
        Ok(mapping.first_unmapped(order_by).is_none())
    }

    /// Number of registered (view, model) pairs.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Names of the registered pairs, for start-up logging.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.mappings.values().map(|r| (r.view, r.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::FieldDescriptor;

    struct PersonView;

    struct Person {
        first_name: String,
        last_name: String,
        birth_year: i64,
    }

    impl Shaped for Person {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            const FIELDS: &[FieldDescriptor<Person>] = &[
                FieldDescriptor::new("firstName", |p| p.first_name.as_str().into()),
                FieldDescriptor::new("lastName", |p| p.last_name.as_str().into()),
                FieldDescriptor::new("birthYear", |p| p.birth_year.into()),
            ];
            FIELDS
        }
    }

    fn person_mapping() -> PropertyMapping {
        PropertyMapping::new()
            .with("name", MappingValue::new(["lastName", "firstName"]))
            .with("age", MappingValue::reversed(["birthYear"]))
    }

    fn registry() -> PropertyMappingRegistry {
        PropertyMappingRegistry::builder()
            .register::<PersonView, Person>(person_mapping())
            .unwrap()
            .build()
    }

    #[test]
    fn lookup_ignores_case() {
        let mapping = person_mapping();
        assert!(mapping.contains("Name"));
        assert!(mapping.contains("AGE"));
        assert!(!mapping.contains("shoeSize"));
    }

    #[test]
    fn registered_mapping_is_found() {
        let registry = registry();
        let mapping = registry.mapping::<PersonView, Person>().unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregistered_pair_is_not_found() {
        let registry = registry();
        let err = registry.mapping::<Person, PersonView>().unwrap_err();
        assert_eq!(
            err,
            QueryError::MappingNotFound {
                view: "Person",
                model: "PersonView",
            }
        );
        assert!(!err.is_client_error());
    }

    #[test]
    fn valid_mapping_checks_every_clause() {
        let registry = registry();
        let check = |clause: &str| {
            registry
                .valid_mapping_exists_for::<PersonView, Person>(clause)
                .unwrap()
        };

        assert!(check(""));
        assert!(check("   "));
        assert!(check("name"));
        assert!(check("Name desc, age"));
        assert!(check("age asc"));
        assert!(!check("name, shoeSize"));
        assert!(!check("name,"));
    }

    #[test]
    fn valid_mapping_reports_missing_configuration() {
        let empty = PropertyMappingRegistry::builder().build();
        assert!(
            empty
                .valid_mapping_exists_for::<PersonView, Person>("name")
                .is_err()
        );
    }

    #[test]
    fn register_rejects_unknown_target_field() {
        let mapping = PropertyMapping::new().with("name", MappingValue::new(["fullName"]));
        let err = PropertyMappingRegistry::builder()
            .register::<PersonView, Person>(mapping)
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownModelField {
                field: "fullName".to_string(),
                model: "Person",
            }
        );
    }

    #[test]
    fn register_rejects_empty_targets() {
        let mapping = PropertyMapping::new().with("name", MappingValue::new(Vec::<String>::new()));
        let err = PropertyMappingRegistry::builder()
            .register::<PersonView, Person>(mapping)
            .unwrap_err();
        assert!(matches!(err, QueryError::MissingMappingValue { .. }));
    }

    #[test]
    fn register_rejects_duplicate_pair() {
        let err = PropertyMappingRegistry::builder()
            .register::<PersonView, Person>(person_mapping())
            .unwrap()
            .register::<PersonView, Person>(person_mapping())
            .unwrap_err();
        assert!(matches!(err, QueryError::DuplicateMapping { .. }));
    }
}
