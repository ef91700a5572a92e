use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Operating system of the machine the download is meant for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientOs {
    Windows,
    MacOs,
    Linux,
    /// Any OS no release is built for.
    Other(String),
}

impl fmt::Display for ClientOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientOs::Windows => write!(f, "windows"),
            ClientOs::MacOs => write!(f, "macos"),
            ClientOs::Linux => write!(f, "linux"),
            ClientOs::Other(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for ClientOs {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "windows" | "win" => ClientOs::Windows,
            "macos" | "darwin" | "mac" => ClientOs::MacOs,
            "linux" => ClientOs::Linux,
            other => ClientOs::Other(other.to_string()),
        })
    }
}

/// CPU family of the machine the download is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientArch {
    #[default]
    X86,
    Arm,
}

impl fmt::Display for ClientArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientArch::X86 => write!(f, "x86"),
            ClientArch::Arm => write!(f, "arm"),
        }
    }
}

impl FromStr for ClientArch {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x86" | "x86_64" | "x64" | "amd64" | "i686" => Ok(ClientArch::X86),
            "arm" | "arm64" | "aarch64" => Ok(ClientArch::Arm),
            _ => anyhow::bail!("Unknown architecture: {}. Expected x86 or arm.", s),
        }
    }
}

/// Detected client platform used to pick the primary download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub os: ClientOs,
    pub arch: ClientArch,
}

impl Default for Platform {
    /// Windows on x86, the guess used when nothing can be detected.
    fn default() -> Self {
        Self {
            os: ClientOs::Windows,
            arch: ClientArch::X86,
        }
    }
}

impl Platform {
    pub fn new(os: ClientOs, arch: ClientArch) -> Self {
        Self { os, arch }
    }

    /// Guess the platform from a browser user-agent string.
    ///
    /// `mac` is checked before `linux` and `win`; a user agent matching none
    /// of them is treated as Windows.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();

        let os = if ua.contains("mac") {
            ClientOs::MacOs
        } else if ua.contains("linux") {
            ClientOs::Linux
        } else {
            ClientOs::Windows
        };

        let arch = if ua.contains("arm") || ua.contains("aarch64") {
            ClientArch::Arm
        } else {
            ClientArch::X86
        };

        Self { os, arch }
    }

    /// Detect the platform this binary was built for.
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            arch: Self::detect_arch(),
        }
    }

    fn detect_os() -> ClientOs {
        #[cfg(target_os = "macos")]
        {
            ClientOs::MacOs
        }
        #[cfg(target_os = "linux")]
        {
            ClientOs::Linux
        }
        #[cfg(target_os = "windows")]
        {
            ClientOs::Windows
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            ClientOs::Other(std::env::consts::OS.to_string())
        }
    }

    fn detect_arch() -> ClientArch {
        if cfg!(any(target_arch = "aarch64", target_arch = "arm")) {
            ClientArch::Arm
        } else {
            ClientArch::X86
        }
    }

    /// Resolve the platform from explicit overrides, a user agent, or the host.
    ///
    /// Explicit values win over the user agent, which wins over `host`.
    pub fn resolve(
        os: Option<ClientOs>,
        arch: Option<ClientArch>,
        user_agent: Option<&str>,
        host: Platform,
    ) -> Self {
        let base = match user_agent {
            Some(ua) => Self::from_user_agent(ua),
            None => host,
        };
        Self {
            os: os.unwrap_or(base.os),
            arch: arch.unwrap_or(base.arch),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}
