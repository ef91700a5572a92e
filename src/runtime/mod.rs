//! Runtime abstraction for system operations.
//!
//! This module provides a trait-based abstraction over the few system
//! operations the CLI performs, enabling dependency injection and
//! testability.
//!
//! # Structure
//!
//! - `env` - Environment variables and host platform
//! - `fs` - Creating download directories and files

mod env;
mod fs;

use anyhow::Result;
use std::env as std_env;
use std::path::Path;

use crate::asset::Platform;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    /// Platform of the machine the CLI runs on.
    fn host_platform(&self) -> Platform;

    // File System
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn host_platform(&self) -> Platform {
        self.host_platform_impl()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>> {
        self.create_file_impl(path)
    }
}
