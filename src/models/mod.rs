pub mod attempt;
pub mod booking;
pub mod flight;
pub mod wallet;
