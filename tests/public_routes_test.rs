mod common;

use actix_web::test;
use serial_test::serial;

use common::TestApp;

#[actix_rt::test]
#[serial]
async fn health_endpoint_responds() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

#[actix_rt::test]
#[serial]
async fn surge_quote_requires_flight_id() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    // missing flightId fails query deserialization before any lookup
    let req = test::TestRequest::get()
        .uri("/api/bookings/surge")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn surge_quote_is_open_to_unauthenticated_clients() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/bookings/surge?flightId=AF101")
        .to_request();

    let resp = test::call_service(&app, req).await;
    // never a 401: the quote endpoint sits outside the auth scope
    assert_ne!(resp.status(), 401);
}
