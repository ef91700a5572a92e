use anyhow::{Result, anyhow};
use std::str::FromStr;

/// Repository whose releases are offered for download.
pub const DEFAULT_REPO: &str = "WerWolv/ImHex";

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GitHubRepo {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for GitHubRepo {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(GitHubRepo {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(anyhow!("Invalid repository '{}'. Expected 'owner/repo'.", s)),
        }
    }
}
