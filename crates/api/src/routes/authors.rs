//! Author collection endpoints with sorting, paging and data shaping.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header::{ALLOW, HeaderName};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use catalog::params::DEFAULT_AUTHORS_ORDER_BY;
use catalog::{Author, AuthorDto, AuthorRepository, AuthorsResourceParameters};
use common::EntityId;
use query::{
    CollectionParameters, CollectionQuery, PageLinks, PropertyMappingRegistry, shape_one,
    type_has_properties,
};
use serde::Deserialize;
use url::Url;

use crate::error::ApiError;

/// Header carrying the JSON pagination metadata.
pub const PAGINATION_HEADER: &str = "x-pagination";

/// Shared application state accessible from all handlers.
pub struct AppState<R: AuthorRepository> {
    pub registry: Arc<PropertyMappingRegistry>,
    pub authors: R,
    pub base_url: Url,
}

// -- Request types --

/// Raw query string of `GET /authors`. Every value is kept as text so that
/// bad page values fall back to defaults instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorsQuery {
    #[serde(alias = "orderby")]
    pub order_by: Option<String>,
    pub fields: Option<String>,
    #[serde(alias = "pagenumber")]
    pub page_number: Option<String>,
    #[serde(alias = "pagesize")]
    pub page_size: Option<String>,
    #[serde(alias = "maincategory")]
    pub main_category: Option<String>,
    #[serde(alias = "searchquery")]
    pub search_query: Option<String>,
}

impl AuthorsQuery {
    /// Applies defaults and paging limits.
    pub fn into_parameters(self) -> AuthorsResourceParameters {
        let collection = CollectionParameters::new()
            .order_by(
                self.order_by
                    .unwrap_or_else(|| DEFAULT_AUTHORS_ORDER_BY.to_string()),
            )
            .fields(self.fields.unwrap_or_default())
            .page_number_param(self.page_number.as_deref())
            .page_size_param(self.page_size.as_deref());

        AuthorsResourceParameters {
            collection,
            main_category: self.main_category,
            search_query: self.search_query,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthorQuery {
    pub fields: Option<String>,
}

// -- Links --

/// Builds `/authors` links that repeat every request parameter except the
/// page number.
pub struct AuthorLinks<'a> {
    base_url: &'a Url,
    params: &'a AuthorsResourceParameters,
}

impl<'a> AuthorLinks<'a> {
    pub fn new(base_url: &'a Url, params: &'a AuthorsResourceParameters) -> Self {
        Self { base_url, params }
    }
}

impl PageLinks for AuthorLinks<'_> {
    fn page_link(&self, params: &CollectionParameters, page_number: usize) -> Option<String> {
        let mut url = self.base_url.join("authors").ok()?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("orderBy", &params.order_by)
                .append_pair("pageNumber", &page_number.to_string())
                .append_pair("pageSize", &params.page_size.to_string());
            if !params.fields.trim().is_empty() {
                pairs.append_pair("fields", &params.fields);
            }
            if let Some(category) = &self.params.main_category {
                pairs.append_pair("mainCategory", category);
            }
            if let Some(search) = &self.params.search_query {
                pairs.append_pair("searchQuery", search);
            }
        }

        Some(url.into())
    }
}

// -- Handlers --

/// GET /authors: sorted, filtered, paged and shaped author list.
///
/// Pagination metadata is returned in the `X-Pagination` header.
#[tracing::instrument(skip(state))]
pub async fn list<R: AuthorRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(query): Query<AuthorsQuery>,
) -> Result<Response, ApiError> {
    let params = query.into_parameters();

    let prepared = CollectionQuery::new(&state.registry)
        .prepare::<AuthorDto, Author>(&params.collection)?;

    let authors = state.authors.get_authors(&params, prepared.sort()).await?;
    let page = prepared.paginate(&authors);

    let links = AuthorLinks::new(&state.base_url, &params);
    let shaped = prepared.finish(page, &links);

    let metadata = serde_json::to_string(&shaped.metadata)
        .map_err(|e| ApiError::Internal(format!("Failed to encode pagination: {e}")))?;
    let metadata = HeaderValue::from_str(&metadata)
        .map_err(|e| ApiError::Internal(format!("Invalid pagination header: {e}")))?;

    tracing::info!(
        total_count = shaped.metadata.total_count,
        returned = shaped.items.len(),
        "listed authors"
    );

    Ok((
        [(HeaderName::from_static(PAGINATION_HEADER), metadata)],
        Json(shaped.items),
    )
        .into_response())
}

/// GET /authors/{id}: a single shaped author.
#[tracing::instrument(skip(state))]
pub async fn get<R: AuthorRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    Query(query): Query<AuthorQuery>,
) -> Result<Response, ApiError> {
    let fields = query.fields.unwrap_or_default();
    if !type_has_properties::<AuthorDto>(&fields) {
        metrics::counter!("collection_queries_rejected_total", "reason" => "unknown_projection_field")
            .increment(1);
        return Err(ApiError::BadRequest(format!(
            "Unknown field requested: {fields}"
        )));
    }

    let author_id = parse_entity_id(&id)?;
    let author = state
        .authors
        .get_author(author_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Author {id} not found")))?;

    let record = shape_one(&AuthorDto::from(&author), &fields)?;
    Ok(Json(record).into_response())
}

/// OPTIONS /authors: advertise the supported methods.
pub async fn options() -> impl IntoResponse {
    (StatusCode::OK, [(ALLOW, "GET,OPTIONS,HEAD")])
}

fn parse_entity_id(id: &str) -> Result<EntityId, ApiError> {
    EntityId::parse(id).map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_defaults() {
        let params = AuthorsQuery::default().into_parameters();
        assert_eq!(params.collection.order_by, "name");
        assert_eq!(params.collection.page_number, 1);
        assert_eq!(params.collection.page_size, 10);
        assert!(params.collection.fields.is_empty());
    }

    #[test]
    fn query_clamps_page_size() {
        let params = AuthorsQuery {
            page_size: Some("500".to_string()),
            page_number: Some("oops".to_string()),
            ..AuthorsQuery::default()
        }
        .into_parameters();
        assert_eq!(params.collection.page_size, query::MAX_PAGE_SIZE);
        assert_eq!(params.collection.page_number, 1);
    }

    #[test]
    fn explicit_empty_order_by_disables_sorting() {
        let params = AuthorsQuery {
            order_by: Some(String::new()),
            ..AuthorsQuery::default()
        }
        .into_parameters();
        assert!(params.collection.order_by.is_empty());
    }

    #[test]
    fn links_repeat_filters_and_encode_values() {
        let base = Url::parse("http://localhost:3000/").unwrap();
        let params = AuthorsResourceParameters::new()
            .main_category("General debauchery")
            .search_query("Bones")
            .collection(
                CollectionParameters::new()
                    .order_by("name desc")
                    .fields("id,name")
                    .page_size(5),
            );

        let link = AuthorLinks::new(&base, &params)
            .page_link(&params.collection, 3)
            .unwrap();

        assert_eq!(
            link,
            "http://localhost:3000/authors?orderBy=name+desc&pageNumber=3&pageSize=5\
             &fields=id%2Cname&mainCategory=General+debauchery&searchQuery=Bones"
        );
    }
}
