//! Data shaping: projecting typed values into partial, string-keyed records.
//!
//! Types opt in by implementing [`Shaped`], which exposes a static table of
//! field descriptors. Field lists from the client are resolved against that
//! table once per call and the resolved accessors are reused for every item.

use common::FieldValue;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{QueryError, Result};

/// A named accessor for one public field of `T`.
pub struct FieldDescriptor<T> {
    name: &'static str,
    accessor: fn(&T) -> FieldValue,
}

impl<T> FieldDescriptor<T> {
    /// Creates a descriptor. `name` is the declared field name that appears
    /// as the key in shaped output.
    pub const fn new(name: &'static str, accessor: fn(&T) -> FieldValue) -> Self {
        Self { name, accessor }
    }

    /// Reads this field from `item`.
    pub fn read(&self, item: &T) -> FieldValue {
        (self.accessor)(item)
    }
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldDescriptor<T> {}

impl<T> std::fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

/// A type whose public fields can be looked up by name at request time.
pub trait Shaped: Sized + 'static {
    /// Every public field of the type, in declaration order.
    fn fields() -> &'static [FieldDescriptor<Self>];

    /// Human-readable type name used in error messages.
    fn type_name() -> &'static str {
        short_type_name::<Self>()
    }

    /// Finds a field by case-insensitive name.
    fn field(name: &str) -> Option<&'static FieldDescriptor<Self>> {
        Self::fields()
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }
}

/// Last path segment of `std::any::type_name`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// An ordered mapping from field name to value.
///
/// Keys keep the declared casing of the source type's field, not the
/// casing the client asked for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedRecord {
    entries: Vec<(&'static str, FieldValue)>,
}

impl ShapedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field. A key that is already present keeps its position and
    /// takes the new value.
    pub fn insert(&mut self, name: &'static str, value: FieldValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ShapedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Splits a raw field list into trimmed tokens. Blank input yields nothing.
fn field_tokens(fields: &str) -> impl Iterator<Item = &str> {
    let blank = fields.trim().is_empty();
    fields
        .split(',')
        .filter(move |_| !blank)
        .map(str::trim)
}

/// A field list resolved against `T`'s descriptor table.
#[derive(Debug)]
pub struct FieldSelection<T: 'static> {
    fields: Vec<&'static FieldDescriptor<T>>,
}

impl<T: 'static> Clone for FieldSelection<T> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
        }
    }
}

impl<T: Shaped> FieldSelection<T> {
    /// Selects every public field of `T`.
    pub fn all() -> Self {
        Self {
            fields: T::fields().iter().collect(),
        }
    }

    /// Resolves a comma-separated field list. Blank input selects all fields.
    ///
    /// Duplicated names are kept; projecting them writes the same key twice.
    pub fn parse(fields: &str) -> Result<Self> {
        if fields.trim().is_empty() {
            return Ok(Self::all());
        }

        let fields = field_tokens(fields)
            .map(|name| {
                T::field(name).ok_or_else(|| QueryError::UnknownProjectionField {
                    field: name.to_string(),
                    type_name: T::type_name(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            type_name = T::type_name(),
            fields = ?fields.iter().map(|d| d.name).collect::<Vec<_>>(),
            "resolved field selection"
        );

        Ok(Self { fields })
    }

    /// Projects one item.
    pub fn project(&self, item: &T) -> ShapedRecord {
        let mut record = ShapedRecord::new();
        for descriptor in &self.fields {
            record.insert(descriptor.name, descriptor.read(item));
        }
        record
    }

    /// Projects every item, reusing the resolved accessors.
    pub fn project_all<'a, I>(&self, items: I) -> Vec<ShapedRecord>
    where
        I: IntoIterator<Item = &'a T>,
    {
        items.into_iter().map(|item| self.project(item)).collect()
    }
}

/// Shapes a sequence of items down to the requested fields.
///
/// The field list is resolved once for the whole sequence. Fails with
/// [`QueryError::UnknownProjectionField`] before any item is read if a
/// requested field does not exist on `T`.
pub fn shape<'a, T, I>(items: I, fields: &str) -> Result<Vec<ShapedRecord>>
where
    T: Shaped,
    I: IntoIterator<Item = &'a T>,
{
    let selection = FieldSelection::<T>::parse(fields)?;
    Ok(selection.project_all(items))
}

/// Shapes a single item down to the requested fields.
pub fn shape_one<T: Shaped>(item: &T, fields: &str) -> Result<ShapedRecord> {
    let selection = FieldSelection::<T>::parse(fields)?;
    Ok(selection.project(item))
}

/// Returns the first requested field that `T` does not have, if any.
pub fn missing_field<T: Shaped>(fields: &str) -> Option<&str> {
    field_tokens(fields).find(|name| T::field(name).is_none())
}

/// Checks that every requested field exists on `T`.
///
/// Blank input is always valid: no fields requested, none can be missing.
pub fn type_has_properties<T: Shaped>(fields: &str) -> bool {
    missing_field::<T>(fields).is_none()
}
