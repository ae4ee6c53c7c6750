//! Compile-time build metadata exposed to the CLI.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("PANETRACK_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("PANETRACK_BUILD_TIMESTAMP");

/// Version block shown by `panetrack --version`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("PANETRACK_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("PANETRACK_BUILD_TIMESTAMP")
);
