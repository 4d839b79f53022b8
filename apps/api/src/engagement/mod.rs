pub mod handlers;
pub mod interactions;
pub mod ratings;
pub mod reviews;
