//! Well-known role name constants.
//!
//! These must match the `role` values written by `20260101000002_create_users_table.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
