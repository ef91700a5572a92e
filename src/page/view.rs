//! Derived, display-ready views of a loaded release.

use chrono::DateTime;
use serde::Serialize;

use crate::asset::{CategorizedAssets, ClassifiedAsset, Platform, primary_download};
use crate::github::{Channel, Release};

use super::state::Dropdown;

/// Dropdown height used until a dropdown has been measured.
pub const DEFAULT_DROPDOWN_HEIGHT: u32 = 400;

const MIN_DROPDOWN_HEIGHT: f64 = 200.0;
const MAX_DROPDOWN_HEIGHT: f64 = 500.0;
const VIEWPORT_MARGIN: f64 = 16.0;

/// Height available to a dropdown opened below a button whose bottom edge
/// sits at `button_bottom`, clamped to 200..=500 pixels.
pub fn dropdown_max_height(viewport_height: f64, button_bottom: f64) -> u32 {
    let space_below = viewport_height - button_bottom - VIEWPORT_MARGIN;
    space_below.clamp(MIN_DROPDOWN_HEIGHT, MAX_DROPDOWN_HEIGHT) as u32
}

/// Heading for the release: `Nightly` on the nightly channel, else the tag.
pub fn release_label(release: &Release, channel: Channel) -> String {
    match channel {
        Channel::Nightly => "Nightly".to_string(),
        Channel::Stable => release.tag_name.clone(),
    }
}

/// Calendar date of an ISO 8601 timestamp, or the input if it does not parse.
pub fn release_date(updated_at: &str) -> String {
    DateTime::parse_from_rfc3339(updated_at)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| updated_at.to_string())
}

/// Number of downloads listed per platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlatformCounts {
    pub windows: usize,
    pub macos: usize,
    pub linux: usize,
}

impl PlatformCounts {
    pub fn of(assets: &CategorizedAssets) -> Self {
        Self {
            windows: assets.windows.len(),
            macos: assets.macos.len(),
            linux: assets.linux.len(),
        }
    }

    pub fn get(&self, dropdown: Dropdown) -> usize {
        match dropdown {
            Dropdown::Windows => self.windows,
            Dropdown::MacOs => self.macos,
            Dropdown::Linux => self.linux,
        }
    }

    /// Dropdowns that have something to show, in page order.
    pub fn visible(&self) -> Vec<Dropdown> {
        [Dropdown::Windows, Dropdown::MacOs, Dropdown::Linux]
            .into_iter()
            .filter(|d| self.get(*d) > 0)
            .collect()
    }
}

/// Everything the download section shows for a loaded release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseView {
    pub channel: Channel,
    pub label: String,
    pub released: String,
    pub notes_url: String,
    pub primary: Option<ClassifiedAsset>,
    pub counts: PlatformCounts,
    pub assets: CategorizedAssets,
}

impl ReleaseView {
    pub fn new(release: &Release, channel: Channel, platform: &Platform) -> Self {
        let assets = CategorizedAssets::categorize(&release.assets);
        let primary = primary_download(&assets, platform).cloned();

        Self {
            channel,
            label: release_label(release, channel),
            released: release_date(&release.updated_at),
            notes_url: release.html_url.clone(),
            primary,
            counts: PlatformCounts::of(&assets),
            assets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{ClientArch, ClientOs};
    use crate::github::ReleaseAsset;

    fn release() -> Release {
        let asset = |name: &str| ReleaseAsset {
            name: name.to_string(),
            size: 2 * 1024 * 1024,
            browser_download_url: format!("https://example.com/{}", name),
        };
        Release {
            tag_name: "v1.37.4".into(),
            updated_at: "2025-02-28T23:10:11Z".into(),
            html_url: "https://github.com/WerWolv/ImHex/releases/tag/v1.37.4".into(),
            assets: vec![
                asset("imhex-1.37.4-Windows-Portable-x86_64.zip"),
                asset("imhex-1.37.4-Windows-x86_64.msi"),
                asset("imhex-1.37.4-Windows-arm64.msi"),
                asset("imhex-1.37.4-Ubuntu-24.04-x86_64.deb"),
                asset("imhex-1.37.4-Fedora-41-x86_64.rpm"),
                asset("Full.Sources.tar.gz"),
            ],
        }
    }

    #[test]
    fn test_dropdown_max_height() {
        assert_eq!(dropdown_max_height(1000.0, 400.0), 500);
        assert_eq!(dropdown_max_height(800.0, 400.0), 384);
        assert_eq!(dropdown_max_height(500.0, 400.0), 200);
    }

    #[test]
    fn test_release_label() {
        let release = release();
        assert_eq!(release_label(&release, Channel::Stable), "v1.37.4");
        assert_eq!(release_label(&release, Channel::Nightly), "Nightly");
    }

    #[test]
    fn test_release_date() {
        assert_eq!(release_date("2025-02-28T23:10:11Z"), "2025-02-28");
        assert_eq!(release_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_release_view() {
        let view = ReleaseView::new(
            &release(),
            Channel::Stable,
            &Platform::new(ClientOs::Windows, ClientArch::X86),
        );

        assert_eq!(view.label, "v1.37.4");
        assert_eq!(view.released, "2025-02-28");
        assert_eq!(
            view.primary.as_ref().map(|a| a.name.as_str()),
            Some("imhex-1.37.4-Windows-x86_64.msi")
        );
        assert_eq!(view.primary.as_ref().unwrap().size, "2.0 MB");
        assert_eq!(
            view.counts,
            PlatformCounts {
                windows: 3,
                macos: 0,
                linux: 2
            }
        );
        assert_eq!(view.counts.visible(), [Dropdown::Windows, Dropdown::Linux]);
    }

    #[test]
    fn test_release_view_serializes() {
        let view = ReleaseView::new(
            &release(),
            Channel::Nightly,
            &Platform::new(ClientOs::Linux, ClientArch::X86),
        );
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["label"], "Nightly");
        assert_eq!(json["channel"], "nightly");
        // No AppImage, Snap or Flatpak in this release
        assert_eq!(json["primary"], serde_json::Value::Null);
        assert_eq!(json["assets"]["linux"]["Everywhere"], serde_json::json!([]));
        assert_eq!(json["counts"]["linux"], 2);
    }
}
