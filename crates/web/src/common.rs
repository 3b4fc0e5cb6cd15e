use axum::{
    extract::{rejection::QueryRejection, OriginalUri, Query, Request},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use locator::RequestError;
use log::error;
use model::ExampleData;
use schemars::{schema_for, schema_for_value, JsonSchema};
use serde::{Deserialize, Serialize};

pub type RouteResult<O> = Result<O, RouteErrorResponse>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

// - Services returning commonly used responses -

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaParams {
    #[serde(default = "Default::default")]
    example_data: bool,
}

pub(crate) async fn schema<T: ExampleData + JsonSchema + Serialize>(
    Query(params): Query<SchemaParams>,
) -> impl IntoResponse {
    if params.example_data {
        Json(schema_for_value!(T::example_data()))
    } else {
        Json(schema_for!(T))
    }
}

pub(crate) async fn schema_no_example<T: JsonSchema + Serialize>() -> impl IntoResponse {
    Json(schema_for!(T))
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_found(req.method(), original_uri.path())
}

// - Commonly used responeses -

/// Error body of every route: `{ "error": ..., "httpMethod": ..., "requestedUri": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_uri: Option<String>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            error: status_code
                .canonical_reason()
                .unwrap_or("i dunno what happened here :/")
                .to_owned(),
            http_method: None,
            requested_uri: None,
        }
    }

    pub fn not_found(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND)
            .with_method(method)
            .with_uri(uri)
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = message.into();
        self
    }
}

impl From<RequestError> for RouteErrorResponse {
    fn from(value: RequestError) -> Self {
        if value.is_invalid_input() {
            return Self::new(StatusCode::BAD_REQUEST).with_error(value.to_string());
        }
        match value {
            RequestError::NotFound => {
                Self::new(StatusCode::NOT_FOUND).with_error(RequestError::NotFound.to_string())
            }
            RequestError::StoreUnavailable(reason) => {
                error!("Resource store unavailable: {}", reason);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR)
                    .with_error("The resource store is currently unavailable.")
            }
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl From<QueryRejection> for RouteErrorResponse {
    fn from(value: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST).with_error(value.body_text())
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_map_to_status_codes() {
        let cases = [
            (RequestError::MissingOrInvalidLocation, StatusCode::BAD_REQUEST),
            (
                RequestError::RadiusOutOfRange { max_km: 50.0 },
                StatusCode::BAD_REQUEST,
            ),
            (RequestError::InvalidLimit, StatusCode::BAD_REQUEST),
            (RequestError::NotFound, StatusCode::NOT_FOUND),
            (
                RequestError::StoreUnavailable("connection refused".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status_code) in cases {
            assert_eq!(RouteErrorResponse::from(error).status_code, status_code);
        }
    }

    #[test]
    fn store_details_stay_in_the_log() {
        let response = RouteErrorResponse::from(RequestError::StoreUnavailable(
            "password authentication failed".to_owned(),
        ));
        assert!(!response.error.contains("password"));
    }

    #[test]
    fn serializes_without_status_code() {
        let response = RouteErrorResponse::not_found(&Method::GET, "/api/nope");
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["error"], "Not Found");
        assert_eq!(json["httpMethod"], "GET");
        assert_eq!(json["requestedUri"], "/api/nope");
        assert!(json.get("statusCode").is_none());
    }
}
