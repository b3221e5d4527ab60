//! Compile-time build metadata shown by `termspace --version`.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short commit hash, or `unknown` outside a git checkout.
pub const GIT_COMMIT: &str = env!("TERMSPACE_BUILD_GIT_HASH");

/// UTC build time.
pub const BUILD_TIMESTAMP: &str = env!("TERMSPACE_BUILD_TIMESTAMP");

/// Version block passed to clap.
pub const CLI_VERSION_TEXT: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("TERMSPACE_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("TERMSPACE_BUILD_TIMESTAMP"),
);
