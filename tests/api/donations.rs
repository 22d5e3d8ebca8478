use crate::helpers::{checkout_session, TestApp};
use wiremock::{
    matchers::{method, path},
    Mock,
};

#[tokio::test]
async fn a_valid_donation_returns_the_checkout_url() {
    // given
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(checkout_session("cs_test_donation", "unpaid"))
        .expect(1)
        .mount(&app.payment_server)
        .await;
    let body = serde_json::json!({ "amount": 2500 });

    // when
    let response = app
        .post_json_with_origin("/donations", &body, "https://pawprintsvisits.org")
        .await;

    // then
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Invalid response body");
    assert_eq!(
        body["url"],
        "https://checkout.example.com/pay/cs_test_donation"
    );
}

#[tokio::test]
async fn a_fifty_cent_donation_is_rejected_without_contacting_the_provider() {
    // given
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(checkout_session("cs_never", "unpaid"))
        .expect(0)
        .mount(&app.payment_server)
        .await;
    let body = serde_json::json!({ "amount": 50 });

    // when
    let response = app
        .post_json_with_origin("/donations", &body, "https://pawprintsvisits.org")
        .await;

    // then
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn out_of_range_amounts_are_rejected() {
    // given
    let app = TestApp::spawn().await;
    let test_cases = vec![
        (serde_json::json!({ "amount": 99 }), "just below the minimum"),
        (serde_json::json!({ "amount": 1_000_001 }), "above the maximum"),
        (serde_json::json!({ "amount": -500 }), "negative"),
        (serde_json::json!({}), "missing"),
    ];

    for (body, description) in test_cases {
        // when
        let response = app
            .post_json_with_origin("/donations", &body, "https://pawprintsvisits.org")
            .await;

        // then
        assert_eq!(
            response.status(),
            400,
            "The API did not reject an amount that is {description}"
        );
    }
}

#[tokio::test]
async fn a_donation_without_an_origin_header_is_rejected() {
    // given
    let app = TestApp::spawn().await;
    let body = serde_json::json!({ "amount": 2500 });

    // when
    let response = app.post_json("/donations", &body).await;

    // then
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["error"], "Missing Origin header");
}
