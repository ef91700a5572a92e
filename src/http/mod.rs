//! HTTP client module with API error decoding.

mod client;
mod error;

pub use client::{GITHUB_JSON, HttpClient};
pub use error::ApiError;
