use log::debug;

use super::{CategorizedAssets, ClassifiedAsset, ClientArch, ClientOs, Platform, WindowsArch};

/// Linux bucket the picker prefers before falling back to the first bucket.
///
/// The categorizer files `.deb` packages under `"Debian"`, so this lookup
/// never hits and Linux always takes the fallback path.
pub const PREFERRED_LINUX_BUCKET: &str = "Ubuntu/Debian";

/// Trait for selecting the primary download from categorized assets
pub trait AssetPicker: Send + Sync {
    /// Pick the asset to feature as the one-click download
    ///
    /// Returns `None` if no suitable asset is found
    fn pick<'a>(&self, assets: &'a CategorizedAssets) -> Option<&'a ClassifiedAsset>;
}

/// Picks the best match for a detected client platform
pub struct DefaultAssetPicker {
    platform: Platform,
}

impl DefaultAssetPicker {
    pub fn with_platform(platform: Platform) -> Self {
        Self { platform }
    }

    fn pick_windows<'a>(&self, assets: &'a CategorizedAssets) -> Option<&'a ClassifiedAsset> {
        let arch = match self.platform.arch {
            ClientArch::Arm => WindowsArch::Arm64,
            ClientArch::X86 => WindowsArch::X64,
        };
        let builds = assets.windows.get(arch);

        // Prefer the MSI installer, otherwise the best-ranked portable build
        builds.iter().find(|a| a.is_msi).or_else(|| builds.first())
    }

    fn pick_macos<'a>(&self, assets: &'a CategorizedAssets) -> Option<&'a ClassifiedAsset> {
        let want_arm = self.platform.arch == ClientArch::Arm;
        assets.macos.iter().find(|a| a.is_arm == want_arm)
    }

    fn pick_linux<'a>(&self, assets: &'a CategorizedAssets) -> Option<&'a ClassifiedAsset> {
        if let Some(builds) = assets.linux.get(PREFERRED_LINUX_BUCKET)
            && !builds.is_empty()
        {
            let marker = match self.platform.arch {
                ClientArch::Arm => "arm64",
                ClientArch::X86 => "x86_64",
            };
            return builds
                .iter()
                .find(|a| a.name.to_lowercase().contains(marker));
        }

        // Fallback to the leading bucket, whatever its architecture
        let (family, builds) = assets.linux.first()?;
        debug!("No {} bucket, falling back to {}", PREFERRED_LINUX_BUCKET, family);
        builds.first()
    }
}

impl AssetPicker for DefaultAssetPicker {
    fn pick<'a>(&self, assets: &'a CategorizedAssets) -> Option<&'a ClassifiedAsset> {
        match self.platform.os {
            ClientOs::Windows => self.pick_windows(assets),
            ClientOs::MacOs => self.pick_macos(assets),
            ClientOs::Linux => self.pick_linux(assets),
            ClientOs::Other(_) => None,
        }
    }
}

/// Pick the primary download for `platform`.
pub fn primary_download<'a>(
    assets: &'a CategorizedAssets,
    platform: &Platform,
) -> Option<&'a ClassifiedAsset> {
    DefaultAssetPicker::with_platform(platform.clone()).pick(assets)
}
