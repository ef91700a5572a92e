//! GitHub release API access.

mod channel;
mod client;
mod repo;
mod types;

pub use channel::Channel;
pub use client::{DEFAULT_API_URL, GetRelease, GitHub};
#[cfg(test)]
pub use client::MockGetRelease;
pub use repo::{DEFAULT_REPO, GitHubRepo};
pub use types::{Release, ReleaseAsset};
