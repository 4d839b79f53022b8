pub mod engagement;
pub mod prompt;
pub mod stats;
pub mod user;
