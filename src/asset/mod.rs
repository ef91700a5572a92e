//! Release asset classification module
//!
//! This module turns the flat asset list of a release into per-platform
//! buckets with human-readable names, and picks the primary download for a
//! detected client platform.

mod categorize;
mod classified;
mod friendly_name;
mod picker;
mod platform;

pub use categorize::{
    Bucket, CategorizedAssets, LinuxBuckets, LinuxFamily, WindowsArch, WindowsBuckets, categorize,
};
pub use classified::{ClassifiedAsset, format_size};
pub use friendly_name::friendly_name;
pub use picker::{AssetPicker, DefaultAssetPicker, PREFERRED_LINUX_BUCKET, primary_download};
pub use platform::{ClientArch, ClientOs, Platform};
