mod common;

use actix_web::{http::header, test};
use serde_json::{json, Value};
use serial_test::serial;

use common::{mint_token, TestApp};

fn valid_booking_body() -> Value {
    json!({
        "flightId": "AF101",
        "passengerName": "Asha Verma",
        "passengerAge": 34,
        "passengerGender": "female",
        "passengerType": "adult",
        "phoneNumber": "9876543210",
        "classType": "economy",
        "flightDate": "2031-01-15",
        "sessionId": "sess-1"
    })
}

// Invalid input must be rejected before any side effect, so these tests run
// against a valid token without needing booking state behind them.

#[actix_rt::test]
#[serial]
async fn create_booking_rejects_invalid_age() {
    std::env::set_var("JWT_SECRET", "test-secret");
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let mut body = valid_booking_body();
    body["passengerAge"] = json!(0);

    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .insert_header((
            header::AUTHORIZATION,
            format!("Bearer {}", mint_token("user-1")),
        ))
        .set_json(&body)
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("validation_error"));
}

#[actix_rt::test]
#[serial]
async fn create_booking_rejects_short_phone_number() {
    std::env::set_var("JWT_SECRET", "test-secret");
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let mut body = valid_booking_body();
    body["phoneNumber"] = json!("12345");

    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .insert_header((
            header::AUTHORIZATION,
            format!("Bearer {}", mint_token("user-1")),
        ))
        .set_json(&body)
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn create_booking_rejects_past_flight_date() {
    std::env::set_var("JWT_SECRET", "test-secret");
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let mut body = valid_booking_body();
    body["flightDate"] = json!("2020-01-01");

    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .insert_header((
            header::AUTHORIZATION,
            format!("Bearer {}", mint_token("user-1")),
        ))
        .set_json(&body)
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn create_booking_rejects_unknown_cabin_class() {
    std::env::set_var("JWT_SECRET", "test-secret");
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let mut body = valid_booking_body();
    body["classType"] = json!("luxury");

    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .insert_header((
            header::AUTHORIZATION,
            format!("Bearer {}", mint_token("user-1")),
        ))
        .set_json(&body)
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("unknown_class"));
}

#[actix_rt::test]
#[serial]
async fn cancel_booking_rejects_malformed_booking_id() {
    std::env::set_var("JWT_SECRET", "test-secret");
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/bookings/cancel")
        .insert_header((
            header::AUTHORIZATION,
            format!("Bearer {}", mint_token("user-1")),
        ))
        .set_json(&json!({ "bookingId": "not-an-object-id" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn list_bookings_rejects_unknown_status_filter() {
    std::env::set_var("JWT_SECRET", "test-secret");
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/bookings?status=refunded")
        .insert_header((
            header::AUTHORIZATION,
            format!("Bearer {}", mint_token("user-1")),
        ))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
