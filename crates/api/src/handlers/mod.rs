pub mod admin;
pub mod auth;
pub mod chat;
pub mod preferences;
pub mod videos;
