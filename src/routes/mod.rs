pub mod booking;
pub mod health;
pub mod surge;
pub mod wallet;
