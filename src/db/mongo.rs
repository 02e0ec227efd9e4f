use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
    Client, IndexModel,
};
use std::sync::Arc;
use std::time::Duration;

pub const DB_NAME: &str = "Aerofare";

pub async fn create_mongo_client(uri: &String) -> Arc<Client> {
    println!("Connecting to MongoDB: {}", uri);

    let mut client_options = ClientOptions::parse(uri)
        .await
        .expect("MongoDB URI may be incorrect! Failed to parse.");

    // Set a reasonable timeout for operations
    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client =
        Client::with_options(client_options).expect("Failed to create MongoDB client with options");

    // Test the connection to make sure it works
    match client
        .database(DB_NAME)
        .run_command(doc! {"ping": 1})
        .await
    {
        Ok(_) => println!("Successfully connected to MongoDB and verified with ping command"),
        Err(e) => {
            eprintln!("WARNING: Connected to MongoDB but ping test failed: {}", e);
            eprintln!("The API may still work, but some functionality might be impaired");
        }
    }

    Arc::new(client)
}

/// Indexes the engine's invariants depend on: the unique PNR index is what
/// actually enforces confirmation-code uniqueness under concurrent inserts,
/// and the attempt index keeps the surge window count cheap.
pub async fn ensure_indexes(client: &Client) -> mongodb::error::Result<()> {
    let db = client.database(DB_NAME);

    db.collection::<Document>("Bookings")
        .create_index(
            IndexModel::builder()
                .keys(doc! { "pnr": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;

    db.collection::<Document>("Wallets")
        .create_index(
            IndexModel::builder()
                .keys(doc! { "user_id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;

    db.collection::<Document>("Flights")
        .create_index(
            IndexModel::builder()
                .keys(doc! { "flight_id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;

    db.collection::<Document>("BookingAttempts")
        .create_index(
            IndexModel::builder()
                .keys(doc! { "flight_id": 1, "attempt_time": 1 })
                .build(),
        )
        .await?;

    Ok(())
}

/// True when the error is a storage-level uniqueness violation (code 11000),
/// e.g. two concurrent bookings generating the same PNR.
pub fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_err)) if write_err.code == 11000
    )
}
