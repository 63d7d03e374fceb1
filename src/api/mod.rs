pub mod client;
pub mod models;
pub mod service;

pub use client::{ApiClient, ApiError};
pub use models::ApiConfig;
pub use service::RemoteService;
