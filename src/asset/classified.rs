use serde::Serialize;

use crate::github::ReleaseAsset;

use super::friendly_name::{ARM64_MARKER, NO_GPU_MARKER, friendly_name};

/// A release asset annotated for display and ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedAsset {
    pub name: String,
    pub friendly_name: String,
    pub url: String,
    /// Human-formatted size, e.g. `"24.3 MB"`.
    pub size: String,
    #[serde(rename = "isMSI")]
    pub is_msi: bool,
    pub is_portable: bool,
    #[serde(rename = "isNoGPU")]
    pub is_no_gpu: bool,
    pub is_arm: bool,
}

impl ClassifiedAsset {
    pub fn classify(asset: &ReleaseAsset) -> Self {
        let name = asset.name.to_lowercase();
        let is_msi = name.ends_with(".msi");

        Self {
            name: asset.name.clone(),
            friendly_name: friendly_name(&asset.name),
            url: asset.browser_download_url.clone(),
            size: format_size(asset.size),
            is_msi,
            is_portable: !is_msi && !name.ends_with(".dmg"),
            is_no_gpu: name.contains(NO_GPU_MARKER),
            is_arm: name.contains(ARM64_MARKER),
        }
    }
}

impl From<&ReleaseAsset> for ClassifiedAsset {
    fn from(asset: &ReleaseAsset) -> Self {
        Self::classify(asset)
    }
}

/// Format a byte count as mebibytes with one decimal, e.g. `"1.5 MB"`.
///
/// Halves round away from zero, so 0.25 MB reads `"0.3 MB"`.
pub fn format_size(bytes: u64) -> String {
    let tenths = (bytes as f64 / 1024.0 / 1024.0 * 10.0).round();
    format!("{:.1} MB", tenths / 10.0)
}
