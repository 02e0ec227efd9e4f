use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

use aerofare_api::db::mongo::create_mongo_client;
use aerofare_api::middleware::auth::{AuthMiddleware, Claims};
use aerofare_api::routes;

pub struct TestApp {
    pub client: Arc<mongodb::Client>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mongo_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = create_mongo_client(&mongo_uri).await;

        Self { client }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .route("/health", web::get().to(routes::health::health_check))
            .app_data(web::Data::new(self.client.clone()))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/bookings")
                            .route("/surge", web::get().to(routes::surge::surge_quote))
                            .service(
                                web::scope("")
                                    .wrap(AuthMiddleware)
                                    .route(
                                        "/attempt",
                                        web::post().to(routes::surge::record_attempt),
                                    )
                                    .route(
                                        "/cancel",
                                        web::post().to(routes::booking::cancel_booking),
                                    )
                                    .route("", web::post().to(routes::booking::create_booking))
                                    .route("", web::get().to(routes::booking::list_bookings)),
                            ),
                    )
                    .service(
                        web::scope("/wallet")
                            .wrap(AuthMiddleware)
                            .route("", web::get().to(routes::wallet::get_balance)),
                    ),
            )
    }
}

/// Insert a catalog flight the booking flow can resolve. Callers pass a
/// fresh flight_id per test run so the unique index never trips.
#[allow(dead_code)]
pub async fn seed_flight(client: &mongodb::Client, flight_id: &str, base_price_cents: i64) {
    use aerofare_api::db::mongo::DB_NAME;
    use aerofare_api::models::flight::Flight;

    client
        .database(DB_NAME)
        .collection::<Flight>("Flights")
        .insert_one(Flight {
            id: None,
            flight_id: flight_id.to_string(),
            airline: "Aerofare Test Air".to_string(),
            departure_city: "Delhi".to_string(),
            arrival_city: "Mumbai".to_string(),
            departure_time: "08:00".to_string(),
            arrival_time: "10:15".to_string(),
            duration_minutes: 135,
            base_price_cents,
        })
        .await
        .expect("flight seed should insert");
}

/// Mint a token the auth middleware will accept (same secret fallback).
#[allow(dead_code)]
pub fn mint_token(user_id: &str) -> String {
    let key = std::env::var("JWT_SECRET").unwrap_or_else(|_| "default_secret".to_string());
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: "test@example.com".to_string(),
        exp: now + 3600,
        iat: now,
        user_id: user_id.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(key.as_bytes()),
    )
    .expect("token encoding should not fail")
}
