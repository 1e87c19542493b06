//! REST client for the Veo long-running video generation API.
//!
//! [`VeoApi`] starts generations and reads operation status; it implements
//! [`vidgen_core::generation::VideoGenerator`] so the job lifecycle can drive
//! it directly.

pub mod api;
pub mod config;
pub mod operation;

pub use api::{VeoApi, VeoApiError};
pub use config::{mask_secret, GeneratorConfig, GeneratorInfo};
