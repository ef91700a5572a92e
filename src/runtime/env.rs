//! Environment and system information operations.

use std::env;

use super::RealRuntime;
use crate::asset::Platform;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn env_var_impl(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn host_platform_impl(&self) -> Platform {
        Platform::detect()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};

    #[test]
    fn test_real_runtime_env() {
        let runtime = RealRuntime;

        // PATH should exist on all systems
        assert!(runtime.env_var("PATH").is_ok());
        assert!(
            runtime
                .env_var("IMHEX_DOWNLOADS_SURELY_UNSET_VARIABLE")
                .is_err()
        );
    }

    #[test]
    fn test_real_runtime_host_platform() {
        let runtime = RealRuntime;
        assert_eq!(
            runtime.host_platform(),
            crate::asset::Platform::detect()
        );
    }
}
