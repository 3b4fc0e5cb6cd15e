use axum::{
    extract::{rejection::QueryRejection, OriginalUri, Path, Query, State},
    http::Method,
    routing::{get, on},
    Json, Router,
};
use model::{
    filter::{AttributeFilter, Facets},
    ResourceEntry, ResourceRecord,
};
use serde::{Deserialize, Serialize};
use utility::{id::Id, let_also::LetAlso};

use crate::{
    common::{route_not_found, schema, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

const NO_FILTER_NOTE: &str = "Choose a city, category or language to list resources.";

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(browse))
        .route("/meta", get(meta))
        .route("/schema", get(schema::<ResourceRecord>))
        .route("/:id", get(get_resource))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Deserialize)]
struct BrowseParams {
    city: Option<String>,
    #[serde(alias = "categories")]
    category: Option<String>,
    #[serde(alias = "languages", alias = "lang")]
    language: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
struct BrowseMetaDto {
    count: usize,
    filters: AttributeFilter,
    note: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct BrowseResponseDto {
    meta: BrowseMetaDto,
    results: Vec<ResourceEntry>,
}

async fn browse(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { locator_client, .. }): State<WebState>,
    params: Result<Query<BrowseParams>, QueryRejection>,
) -> RouteResult<Json<BrowseResponseDto>> {
    let Query(params) = params.map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })?;
    let filter = AttributeFilter::new(params.city, params.category, params.language);

    locator_client
        .browse(&filter)
        .await
        .map(|results| {
            BrowseResponseDto {
                meta: BrowseMetaDto {
                    count: results.len(),
                    note: filter.is_empty().then_some(NO_FILTER_NOTE),
                    filters: filter,
                },
                results,
            }
            .let_owned(Json)
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn meta(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { locator_client, .. }): State<WebState>,
) -> RouteResult<Json<Facets>> {
    locator_client.facets().await.map(Json).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })
}

async fn get_resource(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { locator_client, .. }): State<WebState>,
) -> RouteResult<Json<ResourceEntry>> {
    locator_client
        .get_resource(&Id::new(id))
        .await
        .map(Json)
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}
