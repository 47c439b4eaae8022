//! Sort clause parsing, compilation against a property mapping, and
//! in-memory application of the compiled keys.

use std::cmp::Ordering;

use common::FieldValue;

use crate::mapping::PropertyMapping;
use crate::shape::{FieldDescriptor, Shaped};
use crate::{QueryError, Result};

/// Direction of one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_descending(self) -> bool {
        self == SortDirection::Descending
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

/// One public field named in a sort clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortTerm<'a> {
    pub field: &'a str,
    pub descending: bool,
}

impl<'a> SortTerm<'a> {
    /// Parses one comma-separated piece of a sort clause.
    ///
    /// Only an exact, lower-case `" desc"` suffix marks the term descending.
    /// The field name is everything before the first space, so
    /// `"name descending"` and `"name DESC"` both sort `name` ascending.
    pub fn parse(piece: &'a str) -> Self {
        let trimmed = piece.trim();
        let descending = trimmed.ends_with(" desc");
        let field = trimmed
            .split_once(' ')
            .map_or(trimmed, |(field, _)| field);
        Self { field, descending }
    }
}

/// A parsed sort clause: public field names with their requested direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortClause<'a> {
    terms: Vec<SortTerm<'a>>,
}

impl<'a> SortClause<'a> {
    /// Splits a raw `"field [desc], ..."` clause. A blank clause has no terms;
    /// otherwise every piece becomes a term, including empty ones.
    pub fn parse(raw: &'a str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        Self {
            terms: raw.split(',').map(SortTerm::parse).collect(),
        }
    }

    pub fn terms(&self) -> &[SortTerm<'a>] {
        &self.terms
    }
}

/// A compiled sort key over an internal model field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    pub fn is_descending(&self) -> bool {
        self.direction.is_descending()
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.direction)
    }
}

/// Compiles a raw sort clause into model-level sort keys.
///
/// Each public field expands to its mapped target fields in listed order,
/// with the direction flipped when the mapping reverses it. Relative order
/// is preserved across clauses and across targets within a clause. A blank
/// clause compiles to no keys.
pub fn compile_sort(raw: &str, mapping: &PropertyMapping) -> Result<Vec<SortKey>> {
    let clause = SortClause::parse(raw);
    let mut keys = Vec::new();

    for term in clause.terms() {
        let value = mapping
            .get(term.field)
            .ok_or_else(|| QueryError::UnknownSortField {
                field: term.field.to_string(),
            })?;

        if value.target_fields().is_empty() {
            return Err(QueryError::MissingMappingValue {
                field: term.field.to_string(),
            });
        }

        let mut direction = SortDirection::from_descending(term.descending);
        if value.reverse_direction() {
            direction = direction.reverse();
        }

        keys.extend(
            value
                .target_fields()
                .iter()
                .map(|target| SortKey::new(target.as_str(), direction)),
        );
    }

    tracing::debug!(
        order_by = raw,
        keys = %keys.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
        "compiled sort"
    );

    Ok(keys)
}

/// Stably sorts `items` by compiled keys, first key most significant.
///
/// Each item's key values are read once up front. An empty key list leaves
/// the input order untouched.
pub fn apply_sort<M: Shaped>(items: Vec<M>, keys: &[SortKey]) -> Result<Vec<M>> {
    if keys.is_empty() {
        return Ok(items);
    }

    let resolved = keys
        .iter()
        .map(|key| {
            M::field(&key.field)
                .map(|descriptor| (descriptor, key.direction))
                .ok_or_else(|| QueryError::UnknownModelField {
                    field: key.field.clone(),
                    model: M::type_name(),
                })
        })
        .collect::<Result<Vec<(&FieldDescriptor<M>, SortDirection)>>>()?;

    let mut decorated: Vec<(Vec<FieldValue>, M)> = items
        .into_iter()
        .map(|item| {
            let values = resolved.iter().map(|(d, _)| d.read(&item)).collect();
            (values, item)
        })
        .collect();

    decorated.sort_by(|(a, _), (b, _)| {
        resolved
            .iter()
            .zip(a.iter().zip(b.iter()))
            .map(|((_, direction), (x, y))| match direction {
                SortDirection::Ascending => x.sort_cmp(y),
                SortDirection::Descending => y.sort_cmp(x),
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    Ok(decorated.into_iter().map(|(_, item)| item).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MappingValue;

    fn mapping() -> PropertyMapping {
        PropertyMapping::new()
            .with("id", MappingValue::new(["id"]))
            .with("name", MappingValue::new(["lastName", "firstName"]))
            .with("age", MappingValue::reversed(["birthYear"]))
    }

    #[test]
    fn blank_clause_compiles_to_nothing() {
        assert!(compile_sort("", &mapping()).unwrap().is_empty());
        assert!(compile_sort("  \t ", &mapping()).unwrap().is_empty());
    }

    #[test]
    fn field_case_is_ignored() {
        let lower = compile_sort("name", &mapping()).unwrap();
        let upper = compile_sort("Name", &mapping()).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn reversed_mapping_flips_direction() {
        assert_eq!(
            compile_sort("age", &mapping()).unwrap(),
            vec![SortKey::descending("birthYear")]
        );
        assert_eq!(
            compile_sort("age desc", &mapping()).unwrap(),
            vec![SortKey::ascending("birthYear")]
        );
    }

    #[test]
    fn multi_target_expansion_keeps_listed_order() {
        assert_eq!(
            compile_sort("name desc", &mapping()).unwrap(),
            vec![
                SortKey::descending("lastName"),
                SortKey::descending("firstName"),
            ]
        );
    }

    #[test]
    fn clauses_keep_relative_order() {
        assert_eq!(
            compile_sort(" age desc , name,id desc", &mapping()).unwrap(),
            vec![
                SortKey::ascending("birthYear"),
                SortKey::ascending("lastName"),
                SortKey::ascending("firstName"),
                SortKey::descending("id"),
            ]
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = compile_sort("name, shoeSize desc", &mapping()).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownSortField {
                field: "shoeSize".to_string()
            }
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn empty_piece_is_rejected() {
        assert!(compile_sort("name,", &mapping()).is_err());
    }

    #[test]
    fn only_exact_lowercase_desc_suffix_is_descending() {
        // Anything after the first space other than "desc" is not a
        // direction marker; the field itself still resolves.
        for clause in ["name DESC", "name descending", "name asc", "name Desc"] {
            let keys = compile_sort(clause, &mapping()).unwrap();
            assert!(keys.iter().all(|k| !k.is_descending()), "{clause}");
        }
    }

    #[test]
    fn direction_suffix_is_matched_after_trimming() {
        let keys = compile_sort("id desc   ", &mapping()).unwrap();
        assert_eq!(keys, vec![SortKey::descending("id")]);
    }

    #[test]
    fn tab_separated_direction_is_part_of_the_field_name() {
        let err = compile_sort("name\tdesc", &mapping()).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownSortField {
                field: "name\tdesc".to_string()
            }
        );
    }

    #[test]
    fn empty_mapping_value_is_a_configuration_error() {
        let mapping = PropertyMapping::new().with("name", MappingValue::new(Vec::<String>::new()));
        let err = compile_sort("name", &mapping).unwrap_err();
        assert!(matches!(err, QueryError::MissingMappingValue { .. }));
        assert!(!err.is_client_error());
    }

    #[test]
    fn sort_term_parse() {
        assert_eq!(
            SortTerm::parse("  name desc "),
            SortTerm {
                field: "name",
                descending: true
            }
        );
        assert_eq!(
            SortTerm::parse("name"),
            SortTerm {
                field: "name",
                descending: false
            }
        );
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        last: &'static str,
        first: &'static str,
        year: i64,
    }

    impl Shaped for Row {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            const FIELDS: &[FieldDescriptor<Row>] = &[
                FieldDescriptor::new("lastName", |r| r.last.into()),
                FieldDescriptor::new("firstName", |r| r.first.into()),
                FieldDescriptor::new("birthYear", |r| r.year.into()),
            ];
            FIELDS
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { last: "Smith", first: "Bo", year: 1980 },
            Row { last: "Adams", first: "Cy", year: 1970 },
            Row { last: "Smith", first: "Al", year: 1990 },
        ]
    }

    #[test]
    fn apply_sort_uses_keys_in_order() {
        let keys = compile_sort("name", &mapping()).unwrap();
        let sorted = apply_sort(rows(), &keys).unwrap();
        let names: Vec<_> = sorted.iter().map(|r| (r.last, r.first)).collect();
        assert_eq!(names, vec![("Adams", "Cy"), ("Smith", "Al"), ("Smith", "Bo")]);
    }

    #[test]
    fn apply_sort_descending() {
        let keys = compile_sort("name desc", &mapping()).unwrap();
        let sorted = apply_sort(rows(), &keys).unwrap();
        let names: Vec<_> = sorted.iter().map(|r| (r.last, r.first)).collect();
        assert_eq!(names, vec![("Smith", "Bo"), ("Smith", "Al"), ("Adams", "Cy")]);
    }

    #[test]
    fn apply_sort_reversed_mapping() {
        // age ascending means youngest first, i.e. latest birth year first.
        let keys = compile_sort("age", &mapping()).unwrap();
        let sorted = apply_sort(rows(), &keys).unwrap();
        let years: Vec<_> = sorted.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![1990, 1980, 1970]);
    }

    #[test]
    fn apply_sort_ignores_text_case() {
        let mut data = rows();
        data.push(Row { last: "de Vries", first: "Ed", year: 1960 });
        let keys = compile_sort("name", &mapping()).unwrap();
        let sorted = apply_sort(data, &keys).unwrap();
        let lasts: Vec<_> = sorted.iter().map(|r| r.last).collect();
        assert_eq!(lasts, vec!["Adams", "de Vries", "Smith", "Smith"]);
    }

    #[test]
    fn apply_sort_without_keys_keeps_order() {
        let sorted = apply_sort(rows(), &[]).unwrap();
        assert_eq!(sorted, rows());
    }

    #[test]
    fn apply_sort_is_stable() {
        let keys = vec![SortKey::ascending("lastName")];
        let sorted = apply_sort(rows(), &keys).unwrap();
        let firsts: Vec<_> = sorted.iter().map(|r| r.first).collect();
        assert_eq!(firsts, vec!["Cy", "Bo", "Al"]);
    }

    #[test]
    fn apply_sort_rejects_unknown_model_field() {
        let err = apply_sort(rows(), &[SortKey::ascending("id")]).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownModelField {
                field: "id".to_string(),
                model: "Row",
            }
        );
    }
}
