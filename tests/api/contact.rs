use crate::helpers::{email_ok, TestApp};
use sqlx::Row;
use wiremock::{
    matchers::{method, path},
    Mock,
};

fn valid_contact_body() -> serde_json::Value {
    serde_json::json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "email": "jane.doe@example.com",
        "phone": "5551234567",
        "organization": "Lincoln School",
        "subject": "Classroom visit",
        "message": "Could Maple visit our second graders next month?",
    })
}

#[tokio::test]
async fn a_contact_submission_is_stored_and_both_parties_are_notified() {
    // given
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(email_ok())
        .expect(2)
        .mount(&app.email_server)
        .await;

    // when
    let response = app.post_json("/contact", &valid_contact_body()).await;

    // then
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Invalid response body");
    assert_eq!(body["success"], true);
    assert_eq!(body["adminNotificationSent"], true);
    assert_eq!(body["customerConfirmationSent"], true);

    let saved = sqlx::query("SELECT first_name, subject, coordinates FROM contact_submissions")
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to fetch saved submission");
    assert_eq!(saved.get::<String, _>("first_name"), "Jane");
    assert_eq!(saved.get::<String, _>("subject"), "Classroom visit");
    assert!(saved.get::<Option<String>, _>("coordinates").is_none());
}

#[tokio::test]
async fn a_structured_address_rides_along_with_the_submission() {
    // given
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(email_ok())
        .expect(2)
        .mount(&app.email_server)
        .await;
    let mut body = valid_contact_body();
    body["address"] = serde_json::json!("100 Main St, Midland, TX");
    body["structured_address"] = serde_json::json!({
        "street_line1": "100 Main St",
        "city": "Midland",
        "state": "TX",
        "postal_code": "79701",
        "country": "US",
        "lat": 31.9973,
        "lng": -102.0779,
    });

    // when
    let response = app.post_json("/contact", &body).await;

    // then
    assert_eq!(response.status(), 200);
    let saved = sqlx::query("SELECT structured_address, coordinates FROM contact_submissions")
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to fetch saved submission");
    let stored: Option<serde_json::Value> = saved.get("structured_address");
    assert_eq!(stored.expect("No structured address stored")["city"], "Midland");
    assert_eq!(
        saved.get::<Option<String>, _>("coordinates").as_deref(),
        Some("31.9973,-102.0779")
    );
}

#[tokio::test]
async fn a_submission_with_missing_required_fields_is_rejected() {
    // given
    let app = TestApp::spawn().await;
    let test_cases = vec!["firstName", "lastName", "email", "subject", "message"];

    for field in test_cases {
        let mut body = valid_contact_body();
        body.as_object_mut()
            .expect("Body is not an object")
            .remove(field);

        // when
        let response = app.post_json("/contact", &body).await;

        // then
        assert_eq!(
            response.status(),
            400,
            "The API did not reject a submission missing {field}"
        );
        let body: serde_json::Value = response.json().await.expect("Invalid response body");
        assert!(
            body["fields"].get(field).is_some(),
            "No field-level error for {field}"
        );
    }

    let saved = sqlx::query("SELECT id FROM contact_submissions")
        .fetch_optional(&app.db_pool)
        .await
        .expect("Failed to query submissions");
    assert!(saved.is_none());
}
