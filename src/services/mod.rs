pub mod booking_service;
pub mod flight_service;
pub mod pricing_service;
pub mod surge_service;
pub mod wallet_service;
