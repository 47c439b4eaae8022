//! Author storage model and public view.

use chrono::{DateTime, NaiveDate, Utc};
use common::EntityId;
use query::{FieldDescriptor, Shaped};

/// An author as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: DateTime<Utc>,
    pub main_category: String,
}

impl Author {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: DateTime<Utc>,
        main_category: impl Into<String>,
    ) -> Self {
        Self {
            id: EntityId::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            main_category: main_category.into(),
        }
    }

    /// Whole years between the date of birth and `today`.
    pub fn age_on(&self, today: NaiveDate) -> i64 {
        today
            .years_since(self.date_of_birth.date_naive())
            .map_or(0, i64::from)
    }
}

impl Shaped for Author {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        const FIELDS: &[FieldDescriptor<Author>] = &[
            FieldDescriptor::new("id", |a| a.id.into()),
            FieldDescriptor::new("firstName", |a| a.first_name.as_str().into()),
            FieldDescriptor::new("lastName", |a| a.last_name.as_str().into()),
            FieldDescriptor::new("dateOfBirth", |a| a.date_of_birth.into()),
            FieldDescriptor::new("mainCategory", |a| a.main_category.as_str().into()),
        ];
        FIELDS
    }

    fn type_name() -> &'static str {
        "Author"
    }
}

/// The public view of an author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorDto {
    pub id: EntityId,
    pub name: String,
    pub age: i64,
    pub main_category: String,
}

impl AuthorDto {
    /// Builds the view with the age computed as of `today`.
    pub fn from_author_on(author: &Author, today: NaiveDate) -> Self {
        Self {
            id: author.id,
            name: format!("{} {}", author.first_name, author.last_name),
            age: author.age_on(today),
            main_category: author.main_category.clone(),
        }
    }
}

impl From<&Author> for AuthorDto {
    fn from(author: &Author) -> Self {
        Self::from_author_on(author, Utc::now().date_naive())
    }
}

impl Shaped for AuthorDto {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        const FIELDS: &[FieldDescriptor<AuthorDto>] = &[
            FieldDescriptor::new("id", |a| a.id.into()),
            FieldDescriptor::new("name", |a| a.name.as_str().into()),
            FieldDescriptor::new("age", |a| a.age.into()),
            FieldDescriptor::new("mainCategory", |a| a.main_category.as_str().into()),
        ];
        FIELDS
    }

    fn type_name() -> &'static str {
        "AuthorDto"
    }
}
