//! Terminal output utilities for buildpatch tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Exit codes

#![warn(missing_docs)]

pub mod output;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Operation completed (including missing-file no-ops)
    pub const SUCCESS: i32 = 0;
    /// Operation failed
    pub const FAILURE: i32 = 1;
}
