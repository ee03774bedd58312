//! Error types for build-file patching.

use thiserror::Error;

/// Result type alias for patch operations
pub type Result<T> = std::result::Result<T, PatchError>;

/// Errors raised while patching a Gradle build file
#[derive(Error, Debug)]
pub enum PatchError {
    /// The anchor line the insertion hangs off was not found. Raised only by
    /// dependency insertion under [`AnchorPolicy::Strict`]; repository
    /// insertion treats a missing anchor as a no-op.
    ///
    /// [`AnchorPolicy::Strict`]: crate::build_gradle::AnchorPolicy::Strict
    #[error("Could not find {anchor:?} in build.gradle")]
    AnchorNotFound {
        /// The anchor text that was searched for
        anchor: String,
    },

    /// IO error reading or writing the build file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
