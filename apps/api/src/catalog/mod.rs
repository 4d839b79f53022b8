pub mod handlers;
pub mod queries;
pub mod slug;
pub mod validate;
