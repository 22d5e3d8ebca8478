use crate::helpers::{email_ok, seed_pending_order, valid_booking_body, TestApp};
use wiremock::{
    matchers::{method, path},
    Mock,
};

#[tokio::test]
async fn an_appointment_notification_can_be_resent_by_id() {
    // given
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(email_ok())
        .expect(2) // one on booking, one on the explicit resend
        .mount(&app.email_server)
        .await;
    let booking = app.post_json("/appointments", &valid_booking_body()).await;
    let booking: serde_json::Value = booking.json().await.expect("Invalid response body");
    let appointment_id = booking["appointmentId"]
        .as_str()
        .expect("No appointment id")
        .to_string();

    // when
    let response = app
        .post_json(
            "/notifications/appointment",
            &serde_json::json!({
                "appointmentId": appointment_id,
                "sendCustomerConfirmation": true,
            }),
        )
        .await;

    // then
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["success"], true);
    assert_eq!(body["adminNotificationSent"], true);
    // Appointments carry no customer email, so no confirmation goes out.
    assert_eq!(body["customerConfirmationSent"], false);
}

#[tokio::test]
async fn notifying_about_an_unknown_appointment_returns_not_found() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app
        .post_json(
            "/notifications/appointment",
            &serde_json::json!({ "appointmentId": uuid::Uuid::new_v4() }),
        )
        .await;

    // then
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["error"], "Appointment not found");
}

#[tokio::test]
async fn donation_confirmations_go_to_the_admin_and_the_donor() {
    // given
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(email_ok())
        .expect(2)
        .mount(&app.email_server)
        .await;
    let body = serde_json::json!({
        "donorEmail": "donor@example.com",
        "amount": 2500,
        "donorName": "Pat",
    });

    // when
    let response = app.post_json("/notifications/donation", &body).await;

    // then
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["success"], true);
    assert_eq!(body["adminNotificationSent"], true);
    assert_eq!(body["customerConfirmationSent"], true);
}

#[tokio::test]
async fn donation_confirmations_require_email_and_amount() {
    // given
    let app = TestApp::spawn().await;
    let test_cases = vec![
        (serde_json::json!({ "amount": 2500 }), "missing donor email"),
        (
            serde_json::json!({ "donorEmail": "donor@example.com" }),
            "missing amount",
        ),
        (
            serde_json::json!({ "donorEmail": "donor@example.com", "amount": 0 }),
            "zero amount",
        ),
    ];

    for (body, description) in test_cases {
        // when
        let response = app.post_json("/notifications/donation", &body).await;

        // then
        assert_eq!(
            response.status(),
            400,
            "The API did not reject a confirmation with {description}"
        );
    }
}

#[tokio::test]
async fn an_order_confirmation_emails_the_buyer_their_links() {
    // given
    let app = TestApp::spawn().await;
    let order_id = seed_pending_order(
        &app.db_pool,
        "buyer@example.com",
        "Maple's Storybook",
        1999,
        "cs_confirm",
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(email_ok())
        .expect(1)
        .mount(&app.email_server)
        .await;
    let body = serde_json::json!({
        "orderId": order_id,
        "downloadUrls": [
            {"filename": "maples-storybook.pdf", "url": "https://storage.example.com/signed/abc"},
        ],
    });

    // when
    let response = app.post_json("/notifications/order", &body).await;

    // then
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["success"], true);
    assert_eq!(body["emailSent"], true);
}

#[tokio::test]
async fn confirming_an_unknown_order_returns_not_found() {
    // given
    let app = TestApp::spawn().await;

    // when
    let response = app
        .post_json(
            "/notifications/order",
            &serde_json::json!({ "orderId": uuid::Uuid::new_v4() }),
        )
        .await;

    // then
    assert_eq!(response.status(), 404);
}
