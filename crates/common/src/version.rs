use std::fmt;

use serde::Serialize;

/// Build metadata stamped into the binary by its build script.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub build_profile: &'static str,
    pub build_features: &'static str,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub rust_version: &'static str,
    pub target: &'static str,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "version:  {}", self.version)?;
        writeln!(f, "profile:  {}", self.build_profile)?;
        writeln!(f, "features: {}", self.build_features)?;
        writeln!(f, "built:    {}", self.build_timestamp)?;
        writeln!(f, "rustc:    {}", self.rust_version)?;
        write!(f, "target:   {}", self.target)
    }
}

/// Collects the build environment of the crate the macro is expanded in.
///
/// Variables missing from the environment (no build script) read as
/// `unknown`.
#[macro_export]
macro_rules! build_info {
    () => {
        $crate::version::BuildInfo {
            build_profile: option_env!("BUILD_PROFILE").unwrap_or("unknown"),
            build_features: option_env!("BUILD_FEATURES").unwrap_or("unknown"),
            build_timestamp: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
            version: match option_env!("REPO_VERSION") {
                Some(version) => version,
                None => env!("CARGO_PKG_VERSION"),
            },
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
            target: option_env!("BUILD_TARGET").unwrap_or("unknown"),
        }
    };
}
