//! Core domain models and session logic for the JobTrack client

pub mod config;
pub mod error;
pub mod models;
pub mod session;

pub use config::ApiConfig;
pub use error::AuthError;
pub use models::*;
