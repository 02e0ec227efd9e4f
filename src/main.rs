use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use aerofare_api::{db, middleware, routes};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;

    // PNR uniqueness is enforced at the storage layer, so the indexes have
    // to exist before the first booking lands
    if let Err(e) = db::mongo::ensure_indexes(&client).await {
        eprintln!("WARNING: Failed to create indexes: {}", e);
    }

    println!("Starting HTTP server...");

    HttpServer::new(move || {
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
            .app_data(web::Data::new(client.clone()))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/bookings")
                            // Public quote endpoint: read-only surge signal
                            .route("/surge", web::get().to(routes::surge::surge_quote))
                            .service(
                                web::scope("")
                                    .wrap(middleware::auth::AuthMiddleware)
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
                            .wrap(middleware::auth::AuthMiddleware)
                            .route("", web::get().to(routes::wallet::get_balance)),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
