//! Version and naming constants.
//!
//! Centralised so the help text, the version banner, and diagnostics all
//! agree on how the tool presents itself.

/// The launcher's own program name.
pub const PROGRAM_NAME: &str = "oc-mosh";

/// Name of the session client binary this launcher hands off to.
pub const CLIENT_PROGRAM_NAME: &str = "mosh-client";

/// The upstream mosh release this launcher interoperates with.
pub const BASE_VERSION: &str = "1.4.0";

/// The branded version identifier rendered in user-visible banners.
pub const RUST_VERSION: &str = "1.4.0-rust";

/// Project home, printed alongside the version.
pub const REPOSITORY_URL: &str = "https://github.com/oc-shell/oc-mosh";

/// Renders the `--version` banner.
#[must_use]
pub fn version_banner() -> String {
    format!("{PROGRAM_NAME} {RUST_VERSION}\n{REPOSITORY_URL}\n")
}
