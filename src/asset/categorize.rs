//! Partitioning of release assets into per-platform buckets.

use log::debug;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::github::ReleaseAsset;

use super::ClassifiedAsset;

/// Windows architecture bucket key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowsArch {
    X64,
    Arm64,
}

impl WindowsArch {
    pub fn key(self) -> &'static str {
        match self {
            WindowsArch::X64 => "x64",
            WindowsArch::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for WindowsArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Linux distribution family bucket key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinuxFamily {
    Debian,
    Fedora,
    ArchLinux,
    Everywhere,
    Generic,
}

impl LinuxFamily {
    pub fn label(self) -> &'static str {
        match self {
            LinuxFamily::Debian => "Debian",
            LinuxFamily::Fedora => "Fedora",
            LinuxFamily::ArchLinux => "Arch Linux",
            LinuxFamily::Everywhere => "Everywhere",
            LinuxFamily::Generic => "Generic",
        }
    }

    fn for_name(name: &str) -> Self {
        if name.contains("ubuntu") || name.contains("debian") || name.ends_with(".deb") {
            LinuxFamily::Debian
        } else if name.contains("fedora") || name.contains("rhel") || name.ends_with(".rpm") {
            LinuxFamily::Fedora
        } else if name.contains("arch") {
            LinuxFamily::ArchLinux
        } else if name.ends_with(".appimage") || name.ends_with(".snap") || name.ends_with(".flatpak")
        {
            LinuxFamily::Everywhere
        } else {
            LinuxFamily::Generic
        }
    }
}

impl fmt::Display for LinuxFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The bucket an asset is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Windows(WindowsArch),
    MacOs,
    Linux(LinuxFamily),
}

impl Bucket {
    /// Pick the bucket for a filename, or `None` if the asset is not offered
    /// for download (source archives, zsync files, web builds).
    pub fn for_name(filename: &str) -> Option<Self> {
        let name = filename.to_lowercase();

        if name.contains("windows") {
            let arch = if name.contains("arm64") {
                WindowsArch::Arm64
            } else {
                WindowsArch::X64
            };
            Some(Bucket::Windows(arch))
        } else if name.contains("macos") {
            Some(Bucket::MacOs)
        } else if name.contains("sources") || name.contains("zsync") || name.contains("web") {
            None
        } else {
            Some(Bucket::Linux(LinuxFamily::for_name(&name)))
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Windows(arch) => write!(f, "windows/{}", arch),
            Bucket::MacOs => write!(f, "macos"),
            Bucket::Linux(family) => write!(f, "linux/{}", family),
        }
    }
}

/// Windows assets by architecture. Both keys always exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowsBuckets {
    pub x64: Vec<ClassifiedAsset>,
    pub arm64: Vec<ClassifiedAsset>,
}

impl WindowsBuckets {
    pub fn get(&self, arch: WindowsArch) -> &[ClassifiedAsset] {
        match arch {
            WindowsArch::X64 => &self.x64,
            WindowsArch::Arm64 => &self.arm64,
        }
    }

    fn get_mut(&mut self, arch: WindowsArch) -> &mut Vec<ClassifiedAsset> {
        match arch {
            WindowsArch::X64 => &mut self.x64,
            WindowsArch::Arm64 => &mut self.arm64,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (WindowsArch, &[ClassifiedAsset])> {
        [WindowsArch::X64, WindowsArch::Arm64]
            .into_iter()
            .map(move |arch| (arch, self.get(arch)))
    }

    pub fn len(&self) -> usize {
        self.x64.len() + self.arm64.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for WindowsBuckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(arch, assets)| (arch.key(), assets)))
    }
}

/// Linux assets by distribution family, in first-insertion order.
///
/// `Everywhere` always exists and comes first, even when it holds nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinuxBuckets(Vec<(LinuxFamily, Vec<ClassifiedAsset>)>);

impl Default for LinuxBuckets {
    fn default() -> Self {
        Self(vec![(LinuxFamily::Everywhere, Vec::new())])
    }
}

impl LinuxBuckets {
    /// Look a bucket up by its label, e.g. `"Debian"`.
    pub fn get(&self, label: &str) -> Option<&[ClassifiedAsset]> {
        self.0
            .iter()
            .find(|(family, _)| family.label() == label)
            .map(|(_, assets)| assets.as_slice())
    }

    /// The leading bucket. This is `Everywhere`, possibly empty.
    pub fn first(&self) -> Option<(LinuxFamily, &[ClassifiedAsset])> {
        self.iter().next()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LinuxFamily, &[ClassifiedAsset])> {
        self.0
            .iter()
            .map(|(family, assets)| (*family, assets.as_slice()))
    }

    /// Total number of assets across all families.
    pub fn len(&self) -> usize {
        self.0.iter().map(|(_, assets)| assets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, family: LinuxFamily, asset: ClassifiedAsset) {
        match self.0.iter_mut().find(|(f, _)| *f == family) {
            Some((_, assets)) => assets.push(asset),
            None => self.0.push((family, vec![asset])),
        }
    }

    fn buckets_mut(&mut self) -> impl Iterator<Item = &mut Vec<ClassifiedAsset>> {
        self.0.iter_mut().map(|(_, assets)| assets)
    }
}

impl Serialize for LinuxBuckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(family, assets)| (family.label(), assets)))
    }
}

/// Release assets grouped by platform, each bucket in preference order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorizedAssets {
    pub windows: WindowsBuckets,
    pub macos: Vec<ClassifiedAsset>,
    pub linux: LinuxBuckets,
}

impl CategorizedAssets {
    /// Classify and bucket `assets`, then sort every bucket.
    pub fn categorize(assets: &[ReleaseAsset]) -> Self {
        let mut categorized = Self::default();

        for asset in assets {
            let Some(bucket) = Bucket::for_name(&asset.name) else {
                debug!("Skipping asset {}", asset.name);
                continue;
            };

            let classified = ClassifiedAsset::classify(asset);
            match bucket {
                Bucket::Windows(arch) => categorized.windows.get_mut(arch).push(classified),
                Bucket::MacOs => categorized.macos.push(classified),
                Bucket::Linux(family) => categorized.linux.push(family, classified),
            }
        }

        categorized.sort();
        categorized
    }

    /// Total number of assets across all buckets.
    pub fn len(&self) -> usize {
        self.windows.len() + self.macos.len() + self.linux.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // `sort_by_key` is stable, so ties keep their input order. `false` sorts
    // before `true` in every key below.
    fn sort(&mut self) {
        // MSI installers, then portable builds; GPU before software rendering.
        self.windows
            .x64
            .sort_by_key(|a| (!a.is_msi, a.is_no_gpu, a.is_arm));
        self.windows
            .arm64
            .sort_by_key(|a| (!a.is_msi, a.is_no_gpu, a.is_arm));

        // Apple Silicon first.
        self.macos.sort_by_key(|a| (a.is_no_gpu, !a.is_arm));

        for assets in self.linux.buckets_mut() {
            assets.sort_by_key(|a| a.is_arm);
        }
    }
}

/// Classify and bucket a release's assets.
pub fn categorize(assets: &[ReleaseAsset]) -> CategorizedAssets {
    CategorizedAssets::categorize(assets)
}
