//! Gradle build-file patching for Cordova Android projects
//!
//! This crate patches the root build.gradle generated under
//! `platforms/android` so the app picks up the Google Play Services classpath
//! and Google's Maven repository required by the SDK integration, and undoes
//! those patches again:
//! - `apply` before packaging, `restore` after (or vice-versa for a clean
//!   checkout)
//! - Both operations are silent no-ops when the build file does not exist

#![warn(missing_docs)]

pub mod build_gradle;
pub mod error;

pub use build_gradle::{
    AnchorPolicy, DependencyOutcome, GradlePatchConfig, GradlePatcher, PatchReport,
    RestoreReport, GRADLE_PATCH_MARKER,
};
pub use error::{PatchError, Result};
