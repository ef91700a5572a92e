use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Release track offered on the download page.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Stable,
    Nightly,
}

impl Channel {
    /// Path segment under `/repos/{owner}/{repo}/releases/`.
    pub fn release_path(self) -> &'static str {
        match self {
            Channel::Stable => "latest",
            Channel::Nightly => "tags/nightly",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Stable => write!(f, "stable"),
            Channel::Nightly => write!(f, "nightly"),
        }
    }
}

impl FromStr for Channel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stable" => Ok(Channel::Stable),
            "nightly" => Ok(Channel::Nightly),
            _ => anyhow::bail!("Unknown channel: {}. Expected stable or nightly.", s),
        }
    }
}
