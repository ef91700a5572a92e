use serde::{Deserialize, Serialize};

/// Represents a GitHub release asset
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct ReleaseAsset {
    pub name: String,
    pub size: u64,
    pub browser_download_url: String,
}

/// Represents a GitHub release
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct Release {
    pub tag_name: String,
    /// Last update of the release (ISO 8601)
    pub updated_at: String,
    /// Release notes page
    pub html_url: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}
