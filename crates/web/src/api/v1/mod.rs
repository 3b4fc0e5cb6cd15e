use axum::{
    routing::{get, on},
    Router,
};

use crate::{
    common::{route_not_found, schema_no_example, METHOD_FILTER_ALL},
    WebState,
};

mod resources;
mod search;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/search", get(search::search))
        .route("/search/schema", get(schema_no_example::<search::SearchResponseDto>))
        .nest_service("/resources", resources::routes(state.clone()))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}
