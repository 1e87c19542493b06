//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row plus the DTOs its repository and the API exchange.

pub mod chat_message;
pub mod user;
pub mod user_preference;
pub mod video;
