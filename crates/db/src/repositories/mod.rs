//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod chat_message_repo;
pub mod user_preference_repo;
pub mod user_repo;
pub mod video_repo;

pub use chat_message_repo::ChatMessageRepo;
pub use user_preference_repo::UserPreferenceRepo;
pub use user_repo::UserRepo;
pub use video_repo::VideoRepo;
