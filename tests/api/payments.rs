use crate::helpers::{checkout_session, seed_pending_order, TestApp};
use sqlx::Row;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, ResponseTemplate,
};

/// Mints a distinct opaque token per request, the way a real object store
/// would.
struct FreshSignedUrl;

impl wiremock::Respond for FreshSignedUrl {
    fn respond(&self, _request: &wiremock::Request) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "signedURL": format!(
                "/object/sign/digital-products/maples-storybook.pdf?token={}",
                uuid::Uuid::new_v4()
            ),
        }))
    }
}

#[tokio::test]
async fn creating_a_payment_stores_a_pending_order() {
    // given
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(checkout_session("cs_test_shop", "unpaid"))
        .expect(1)
        .mount(&app.payment_server)
        .await;
    let body = serde_json::json!({
        "productName": "Maple's Storybook",
        "amount": 1999,
        "customerEmail": "buyer@example.com",
    });

    // when
    let response = app
        .post_json_with_origin("/payments", &body, "https://pawprintsvisits.org")
        .await;

    // then
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["url"], "https://checkout.example.com/pay/cs_test_shop");

    let saved = sqlx::query(
        "SELECT customer_email, product_name, amount, status, checkout_session_id FROM orders",
    )
    .fetch_one(&app.db_pool)
    .await
    .expect("Failed to fetch saved order");
    assert_eq!(saved.get::<String, _>("customer_email"), "buyer@example.com");
    assert_eq!(saved.get::<String, _>("product_name"), "Maple's Storybook");
    assert_eq!(saved.get::<i64, _>("amount"), 1999);
    assert_eq!(saved.get::<String, _>("status"), "pending");
    assert_eq!(
        saved.get::<String, _>("checkout_session_id"),
        "cs_test_shop"
    );
}

#[tokio::test]
async fn creating_a_payment_with_missing_fields_is_rejected() {
    // given
    let app = TestApp::spawn().await;
    let test_cases = vec![
        (serde_json::json!({ "amount": 1999 }), "missing product name"),
        (
            serde_json::json!({ "productName": "Maple's Storybook" }),
            "missing amount",
        ),
    ];

    for (body, description) in test_cases {
        // when
        let response = app
            .post_json_with_origin("/payments", &body, "https://pawprintsvisits.org")
            .await;

        // then
        assert_eq!(
            response.status(),
            400,
            "The API did not reject a payment request with {description}"
        );
    }
}

#[tokio::test]
async fn verifying_an_unpaid_session_leaves_the_order_pending() {
    // given
    let app = TestApp::spawn().await;
    seed_pending_order(
        &app.db_pool,
        "buyer@example.com",
        "Maple's Storybook",
        1999,
        "cs_unpaid",
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/v1/checkout/sessions/cs_unpaid"))
        .respond_with(checkout_session("cs_unpaid", "unpaid"))
        .expect(1)
        .mount(&app.payment_server)
        .await;

    // when
    let response = app
        .post_json(
            "/payments/verify",
            &serde_json::json!({ "sessionId": "cs_unpaid" }),
        )
        .await;

    // then
    assert_eq!(response.status(), 402);
    let body: serde_json::Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["error"], "Payment not completed");

    let saved = sqlx::query("SELECT status FROM orders WHERE checkout_session_id = $1")
        .bind("cs_unpaid")
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to fetch order");
    assert_eq!(saved.get::<String, _>("status"), "pending");
}

#[tokio::test]
async fn verifying_a_paid_session_completes_the_order_and_returns_download_links() {
    // given
    let app = TestApp::spawn().await;
    seed_pending_order(
        &app.db_pool,
        "buyer@example.com",
        "Maple's Storybook",
        1999,
        "cs_paid",
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/v1/checkout/sessions/cs_paid"))
        .respond_with(checkout_session("cs_paid", "paid"))
        .expect(1)
        .mount(&app.payment_server)
        .await;
    Mock::given(method("POST"))
        .and(path(
            "/storage/v1/object/sign/digital-products/maples-storybook.pdf",
        ))
        .and(body_json(serde_json::json!({ "expiresIn": 86400 })))
        .respond_with(FreshSignedUrl)
        .expect(1)
        .mount(&app.storage_server)
        .await;

    // when
    let response = app
        .post_json(
            "/payments/verify",
            &serde_json::json!({ "sessionId": "cs_paid" }),
        )
        .await;

    // then
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["success"], true);
    assert_eq!(body["order"]["status"], "completed");
    assert_eq!(body["downloadUrls"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["downloadUrls"][0]["filename"], "maples-storybook.pdf");

    let saved = sqlx::query(
        "SELECT status, download_expires_at FROM orders WHERE checkout_session_id = $1",
    )
    .bind("cs_paid")
    .fetch_one(&app.db_pool)
    .await
    .expect("Failed to fetch order");
    assert_eq!(saved.get::<String, _>("status"), "completed");
    assert!(saved
        .get::<Option<time::OffsetDateTime>, _>("download_expires_at")
        .is_some());
}

#[tokio::test]
async fn verifying_twice_reissues_a_fresh_set_of_links() {
    // There is deliberately no idempotency guard: a second verification
    // re-runs the completion update and mints new signed URLs.
    // given
    let app = TestApp::spawn().await;
    seed_pending_order(
        &app.db_pool,
        "buyer@example.com",
        "Maple's Storybook",
        1999,
        "cs_repeat",
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/v1/checkout/sessions/cs_repeat"))
        .respond_with(checkout_session("cs_repeat", "paid"))
        .expect(2)
        .mount(&app.payment_server)
        .await;
    Mock::given(method("POST"))
        .and(path(
            "/storage/v1/object/sign/digital-products/maples-storybook.pdf",
        ))
        .respond_with(FreshSignedUrl)
        .expect(2)
        .mount(&app.storage_server)
        .await;
    let body = serde_json::json!({ "sessionId": "cs_repeat" });

    // when
    let first = app.post_json("/payments/verify", &body).await;
    let second = app.post_json("/payments/verify", &body).await;

    // then
    assert_eq!(first.status(), 200);
    assert_eq!(second.status(), 200);
    let first: serde_json::Value = first.json().await.expect("Invalid response body");
    let second: serde_json::Value = second.json().await.expect("Invalid response body");
    assert_eq!(first["downloadUrls"].as_array().map(Vec::len), Some(1));
    assert_eq!(second["downloadUrls"].as_array().map(Vec::len), Some(1));
    assert_ne!(
        first["downloadUrls"][0]["url"], second["downloadUrls"][0]["url"],
        "Each verification should mint a fresh link"
    );
}

#[tokio::test]
async fn verifying_a_session_with_no_order_returns_not_found() {
    // given
    let app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/v1/checkout/sessions/cs_ghost"))
        .respond_with(checkout_session("cs_ghost", "paid"))
        .expect(1)
        .mount(&app.payment_server)
        .await;

    // when
    let response = app
        .post_json(
            "/payments/verify",
            &serde_json::json!({ "sessionId": "cs_ghost" }),
        )
        .await;

    // then
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["error"], "Order not found");
}

#[tokio::test]
async fn verifying_without_a_session_id_is_rejected() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app
        .post_json("/payments/verify", &serde_json::json!({}))
        .await;

    // then
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["error"], "Session ID is required");
}
