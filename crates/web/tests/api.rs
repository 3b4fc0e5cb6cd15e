use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use database::{Backend, MemoryDatabase};
use locator::{Client, SearchPolicy};
use serde_json::Value;
use tower::ServiceExt;
use web::{router, WebState};

const DATASET: &str = "\
id,name,categories,languages,address_line1,city,state,postal_code,lat,lng
1,Second Harvest,food,\"English,Spanish\",750 Curtner Ave,San Jose,CA,95125,37.2996,-121.8786
2,Downtown Pantry,\"Food, Shelter\",English,,San Jose,CA,,37.3400,-121.8863
3,Valley Clinic,health,\"English,Vietnamese\",,San Jose,CA,,37.3390,-121.8863
4,Gilroy Pantry,food,Spanish,,Gilroy,CA,,37.0058,-121.5683
5,Legal Hotline,legal,English,,San Jose,CA,,,
6,Tie First,food,English,,San Jose,CA,,37.3490,-121.8863
7,Tie Second,food,English,,San Jose,CA,,37.3490,-121.8863
";

fn app_with(policy: SearchPolicy) -> Router {
    let (database, report) = MemoryDatabase::from_csv_reader(DATASET.as_bytes()).unwrap();
    assert_eq!(report.skipped, 0);
    let client = Client::new(Backend::Memory(database))
        .with_policy(policy)
        .with_store_timeout(Duration::from_secs(1));
    router(WebState { locator_client: client }, None)
}

fn app() -> Router {
    app_with(SearchPolicy::default())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn names(body: &Value) -> Vec<&str> {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|result| result["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn ping() {
    let (status, body) = get(app(), "/api/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "pong!");
}

#[tokio::test]
async fn food_search_is_nearest_first() {
    let (status, body) = get(
        app(),
        "/api/v1/search?lat=37.3382&lng=-121.8863&category=food&radiusKm=5",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["center"]["lat"], 37.3382);
    assert_eq!(body["center"]["lng"], -121.8863);
    assert_eq!(body["radiusKm"], 5.0);
    assert_eq!(body["category"], "food");
    assert_eq!(body["count"], 4);
    assert_eq!(
        names(&body),
        ["Downtown Pantry", "Tie First", "Tie Second", "Second Harvest"]
    );

    let distances: Vec<f64> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|result| result["distanceKm"].as_f64().unwrap())
        .collect();
    assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(distances.iter().all(|distance| *distance <= 5.0));
}

#[tokio::test]
async fn tied_distances_keep_store_order() {
    let (_, body) = get(app(), "/api/v1/search?lat=37.3382&lng=-121.8863&radiusKm=1.5").await;
    let names = names(&body);
    let first = names.iter().position(|name| *name == "Tie First").unwrap();
    let second = names.iter().position(|name| *name == "Tie Second").unwrap();
    assert_eq!(second, first + 1);
}

#[tokio::test]
async fn results_carry_the_record() {
    let (_, body) = get(app(), "/api/v1/search?lat=37.2996&lng=-121.8786&radiusKm=0.5").await;
    let first = &body["results"][0];
    assert_eq!(first["id"], "1");
    assert_eq!(first["distanceKm"], 0.0);
    assert_eq!(first["lat"], 37.2996);
    assert_eq!(first["addressLine1"], "750 Curtner Ave");
    assert_eq!(first["languages"][1], "Spanish");
}

#[tokio::test]
async fn nothing_nearby_is_empty() {
    let (status, body) = get(app(), "/api/v1/search?lat=0&lng=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["results"], Value::Array(vec![]));
    assert_eq!(body["category"], Value::Null);
}

#[tokio::test]
async fn missing_latitude_is_rejected() {
    let (status, body) = get(app(), "/api/v1/search?lng=-121.8863").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Missing or invalid lat/lng."));
    assert_eq!(body["requestedUri"], "/api/v1/search");
}

#[tokio::test]
async fn radius_bounds() {
    let (status, _) = get(app(), "/api/v1/search?lat=37.3&lng=-121.9&radiusKm=50").await;
    assert_eq!(status, StatusCode::OK);

    for radius in ["50.0001", "0", "abc"] {
        let uri = format!("/api/v1/search?lat=37.3&lng=-121.9&radiusKm={radius}");
        let (status, body) = get(app(), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{radius}");
        assert!(body["error"].as_str().unwrap().contains("radiusKm"));
    }
}

#[tokio::test]
async fn limit_is_lenient_unless_strict() {
    let uri = "/api/v1/search?lat=37.3382&lng=-121.8863&limit=many";
    let (status, _) = get(app(), uri).await;
    assert_eq!(status, StatusCode::OK);

    let strict = SearchPolicy {
        strict_limit: true,
        ..Default::default()
    };
    let (status, _) = get(app_with(strict), uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn string_coordinates_in_json_datasets_are_used() {
    let (database, _) = MemoryDatabase::from_json_str(
        r#"[{"id": "e", "name": "Coerced", "categories": "food", "lat": "37.33", "lng": "-121.88"}]"#,
    )
    .unwrap();
    let app = router(
        WebState {
            locator_client: Client::new(Backend::Memory(database)),
        },
        None,
    );
    let (_, body) = get(app, "/api/v1/search?lat=37.33&lng=-121.88&category=food").await;
    assert_eq!(names(&body), ["Coerced"]);
    assert_eq!(body["results"][0]["lat"], 37.33);
}

#[tokio::test]
async fn browse_by_attributes() {
    let (status, body) = get(app(), "/api/v1/resources?city=san%20jose&lang=vietnamese").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["meta"]["filters"]["city"], "san jose");
    assert!(body["meta"].get("note").is_none());
    assert_eq!(names(&body), ["Valley Clinic"]);
}

#[tokio::test]
async fn browse_without_filters_explains_itself() {
    let (status, body) = get(app(), "/api/v1/resources").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 0);
    assert!(body["meta"]["note"].is_string());
}

#[tokio::test]
async fn meta_lists_facets() {
    let (status, body) = get(app(), "/api/v1/resources/meta").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cities"], serde_json::json!(["Gilroy", "San Jose"]));
    assert_eq!(
        body["languages"],
        serde_json::json!(["English", "Spanish", "Vietnamese"])
    );
}

#[tokio::test]
async fn resource_by_id() {
    let (status, body) = get(app(), "/api/v1/resources/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Valley Clinic");

    let (status, body) = get(app(), "/api/v1/resources/404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "The requested item does not exist.");
}

#[tokio::test]
async fn schemas_are_served() {
    let (status, body) = get(app(), "/api/v1/search/schema").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["properties"]["results"].is_object());

    let (status, body) = get(app(), "/api/v1/resources/schema?exampleData=true").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_object());
}

#[tokio::test]
async fn unknown_routes_are_json_404s() {
    for uri in ["/api/v2/search", "/api/v1/nope", "/elsewhere"] {
        let (status, body) = get(app(), uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body["error"].is_string());
    }
}
