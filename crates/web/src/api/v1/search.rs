use axum::{
    extract::{rejection::QueryRejection, OriginalUri, Query, State},
    http::Method,
    Json,
};
use locator::{RankedResult, SearchOutcome, SearchParams};
use log::info;
use schemars::JsonSchema;
use serde::Serialize;

use crate::{
    common::{RouteErrorResponse, RouteResult},
    WebState,
};

#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct CenterDto {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResponseDto {
    center: CenterDto,
    radius_km: f64,
    /// `null` when no category filter was applied.
    category: Option<String>,
    count: usize,
    results: Vec<RankedResult>,
}

impl From<SearchOutcome> for SearchResponseDto {
    fn from(SearchOutcome { query, results }: SearchOutcome) -> Self {
        Self {
            center: CenterDto {
                lat: query.latitude(),
                lng: query.longitude(),
            },
            radius_km: query.radius_km(),
            category: query.category().map(str::to_owned),
            count: results.len(),
            results,
        }
    }
}

pub(crate) async fn search(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { locator_client, .. }): State<WebState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> RouteResult<Json<SearchResponseDto>> {
    let map_error = |why: RouteErrorResponse| {
        why.with_method(&Method::GET)
            .with_uri(original_uri.path())
    };
    let Query(params) = params.map_err(|why| map_error(why.into()))?;

    locator_client
        .search(&params)
        .await
        .map(|outcome| {
            info!(
                "Search around ({}, {}) within {} km found {} resources",
                outcome.query.latitude(),
                outcome.query.longitude(),
                outcome.query.radius_km(),
                outcome.results.len()
            );
            Json(SearchResponseDto::from(outcome))
        })
        .map_err(|why| map_error(why.into()))
}
