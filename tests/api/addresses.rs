use crate::helpers::TestApp;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, ResponseTemplate,
};

#[tokio::test]
async fn suggestions_pass_through_provider_results() {
    // given
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/maps/api/place/autocomplete/json"))
        .and(query_param("input", "100 Main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "predictions": [
                {"description": "100 Main St, Midland, TX, USA", "place_id": "place-1"},
                {"description": "100 Main Ave, Odessa, TX, USA", "place_id": "place-2"},
            ],
        })))
        .expect(1)
        .mount(&app.address_server)
        .await;

    // when
    let response = app.get("/addresses/suggestions?query=100%20Main").await;

    // then
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["suggestions"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["suggestions"][0]["place_id"], "place-1");
}

#[tokio::test]
async fn provider_failure_degrades_to_an_empty_suggestion_list() {
    // given
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/maps/api/place/autocomplete/json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.address_server)
        .await;

    // when
    let response = app.get("/addresses/suggestions?query=100%20Main").await;

    // then: still a 200 with no suggestions, so the form keeps working on
    // free-text input.
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["suggestions"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn resolving_a_place_returns_the_structured_address() {
    // given
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/maps/api/place/details/json"))
        .and(query_param("place_id", "place-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "result": {
                "place_id": "place-1",
                "address_components": [
                    {"long_name": "100", "short_name": "100", "types": ["street_number"]},
                    {"long_name": "Main St", "short_name": "Main St", "types": ["route"]},
                    {"long_name": "Midland", "short_name": "Midland", "types": ["locality"]},
                    {"long_name": "Texas", "short_name": "TX", "types": ["administrative_area_level_1"]},
                    {"long_name": "79701", "short_name": "79701", "types": ["postal_code"]},
                ],
                "geometry": {"location": {"lat": 31.9973, "lng": -102.0779}},
            },
        })))
        .expect(1)
        .mount(&app.address_server)
        .await;

    // when
    let response = app.get("/addresses/resolve?placeId=place-1").await;

    // then
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["address"]["street_line1"], "100 Main St");
    assert_eq!(body["address"]["city"], "Midland");
    assert_eq!(body["address"]["state"], "TX");
}

#[tokio::test]
async fn resolving_through_an_unreachable_provider_returns_bad_gateway() {
    // given
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/maps/api/place/details/json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.address_server)
        .await;

    // when
    let response = app.get("/addresses/resolve?placeId=place-1").await;

    // then
    assert_eq!(response.status(), 502);
}
