//! Root build.gradle patching
//!
//! Inserts the Google Play Services classpath and Google's Maven repository
//! into the build.gradle generated under `platforms/android`, and removes
//! those insertions again. The file is treated as plain text: every change is
//! a line spliced in next to a known anchor line, and every inserted line is
//! tagged with a trailing marker comment so `restore` can strip exactly the
//! lines this tool added.

use crate::error::{PatchError, Result};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Marker appended to every inserted line and scanned for by `restore`
pub const GRADLE_PATCH_MARKER: &str = "Marketo SDK";

/// The classpath entry added to the buildscript dependency block
pub const GOOGLE_SERVICES_CLASSPATH: &str =
    "classpath 'com.google.gms:google-services:4.1.0'";

/// Default anchor seeded when the build-tools classpath line is absent and
/// the policy allows falling back to the dependency block
pub const DEFAULT_BUILD_TOOLS_CLASSPATH: &str =
    "classpath 'com.android.tools.build:gradle:3.1.4'";

/// The repository entry added after each `jcenter()` declaration
pub const GOOGLE_MAVEN_REPO: &str = "google()";

/// Anchor text reported when the strict policy cannot find the classpath line
const CLASSPATH_ANCHOR: &str = "classpath 'com.android.tools.build";

/// Keyword opening the configuration block applied to all sub-projects
const ALLPROJECTS_KEYWORD: &str = "allprojects";

/// Indentation used when seeding the dependency block directly
const FALLBACK_INDENT: &str = "        ";

static CLASSPATH_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([ \t]*)classpath 'com\.android\.tools\.build[^\r\n]*").unwrap()
});

static DEPENDENCIES_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*dependencies[ \t]*\{").unwrap());

static JCENTER_ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([ \t]*)jcenter\(\)").unwrap());

/// Behavior when the build-tools classpath anchor is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorPolicy {
    /// Fail with [`PatchError::AnchorNotFound`]
    #[default]
    Strict,
    /// Seed the dependency block with a default build-tools classpath and
    /// insert the new dependency below it; leave the text unchanged when the
    /// dependency block is absent too
    InsertDefault,
}

/// Configuration for [`GradlePatcher`]
#[derive(Debug, Clone)]
pub struct GradlePatchConfig {
    /// Path to the root build.gradle of the generated Android project
    pub gradle_file: PathBuf,
    /// Behavior when the dependency anchor line is missing
    pub anchor_policy: AnchorPolicy,
}

impl Default for GradlePatchConfig {
    fn default() -> Self {
        Self {
            gradle_file: ["platforms", "android", "build.gradle"].iter().collect(),
            anchor_policy: AnchorPolicy::default(),
        }
    }
}

/// How the dependency insertion was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyOutcome {
    /// Inserted after the existing build-tools classpath line
    AfterAnchor,
    /// Anchor was missing; seeded the dependency block instead
    FallbackBlock,
    /// Neither the anchor nor the dependency block was found
    NotPatched,
}

/// Result of an [`GradlePatcher::apply`] run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchReport {
    /// Outcome of the dependency insertion
    pub dependency: DependencyOutcome,
    /// Number of repository lines inserted (0, 1, or 2)
    pub repositories_added: usize,
}

/// Result of a [`GradlePatcher::restore`] run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreReport {
    /// Number of marker-tagged lines removed
    pub lines_removed: usize,
}

/// Patches and restores the root build.gradle of a generated Android project
#[derive(Debug, Clone)]
pub struct GradlePatcher {
    config: GradlePatchConfig,
}

impl GradlePatcher {
    /// Create a patcher for the given configuration
    pub fn new(config: GradlePatchConfig) -> Self {
        Self { config }
    }

    /// Create a patcher targeting the conventional
    /// `platforms/android/build.gradle` path with the strict anchor policy
    pub fn with_defaults() -> Self {
        Self::new(GradlePatchConfig::default())
    }

    /// Whether the target build.gradle is present
    pub fn exists(&self) -> bool {
        self.config.gradle_file.exists()
    }

    /// Insert the Play Services classpath and Google's Maven repository,
    /// then write the file back.
    ///
    /// Returns `Ok(None)` without touching the filesystem when the target
    /// file does not exist. NOT idempotent: a second `apply` without an
    /// intervening [`restore`](Self::restore) duplicates the inserted lines.
    pub fn apply(&self) -> Result<Option<PatchReport>> {
        if !self.exists() {
            return Ok(None);
        }

        let text = self.load()?;
        let (text, dependency) = self.insert_dependency(&text)?;
        let (text, repositories_added) = self.insert_repository(&text);
        self.write(&text)?;

        Ok(Some(PatchReport {
            dependency,
            repositories_added,
        }))
    }

    /// Remove every line carrying the marker comment and write the file
    /// back.
    ///
    /// Returns `Ok(None)` when the target file does not exist. Idempotent:
    /// restoring an already-clean file leaves it byte-identical.
    pub fn restore(&self) -> Result<Option<RestoreReport>> {
        if !self.exists() {
            return Ok(None);
        }

        let text = self.load()?;
        let lines_removed = text
            .lines()
            .filter(|line| line.contains(GRADLE_PATCH_MARKER))
            .count();
        self.write(&strip_marker_lines(&text, GRADLE_PATCH_MARKER))?;

        Ok(Some(RestoreReport { lines_removed }))
    }

    /// Read the whole build file. Callers must guard with
    /// [`exists`](Self::exists); a missing file is an IO error here.
    fn load(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.config.gradle_file)?)
    }

    /// Overwrite the build file with the given contents
    fn write(&self, contents: &str) -> Result<()> {
        Ok(fs::write(&self.config.gradle_file, contents)?)
    }

    /// Insert the Play Services classpath after the build-tools anchor line,
    /// matching its indentation. When the anchor is missing the behavior is
    /// governed by [`AnchorPolicy`].
    fn insert_dependency(&self, text: &str) -> Result<(String, DependencyOutcome)> {
        if let Some(caps) = CLASSPATH_ANCHOR_RE.captures(text) {
            let tagged = tag_line(&caps[1], GOOGLE_SERVICES_CLASSPATH);
            let replacement = format!("{}\n{}", &caps[0], tagged);
            let patched = CLASSPATH_ANCHOR_RE
                .replace(text, NoExpand(&replacement))
                .into_owned();
            return Ok((patched, DependencyOutcome::AfterAnchor));
        }

        match self.config.anchor_policy {
            AnchorPolicy::Strict => Err(PatchError::AnchorNotFound {
                anchor: CLASSPATH_ANCHOR.to_string(),
            }),
            AnchorPolicy::InsertDefault => {
                let Some(opener) = DEPENDENCIES_BLOCK_RE.find(text) else {
                    return Ok((text.to_string(), DependencyOutcome::NotPatched));
                };

                let seeded = format!(
                    "{}\n{}\n{}{}",
                    &text[..opener.end()],
                    tag_line(FALLBACK_INDENT, DEFAULT_BUILD_TOOLS_CLASSPATH),
                    tag_line(FALLBACK_INDENT, GOOGLE_SERVICES_CLASSPATH),
                    &text[opener.end()..],
                );
                Ok((seeded, DependencyOutcome::FallbackBlock))
            }
        }
    }

    /// Insert `google()` after the first `jcenter()` declaration and, when an
    /// `allprojects` block follows, after the first `jcenter()` inside it as
    /// well, so the repository is visible to the top-level buildscript and to
    /// every sub-project. A missing anchor is a silent no-op at either site.
    fn insert_repository(&self, text: &str) -> (String, usize) {
        let mut inserted = 0;

        let mut patched = match JCENTER_ANCHOR_RE.captures(text) {
            Some(caps) => {
                inserted += 1;
                let replacement =
                    format!("{}\n{}", &caps[0], tag_line(&caps[1], GOOGLE_MAVEN_REPO));
                JCENTER_ANCHOR_RE
                    .replace(text, NoExpand(&replacement))
                    .into_owned()
            }
            None => text.to_string(),
        };

        // jcenter() appears in both the buildscript and allprojects groups;
        // splitting at the allprojects keyword reaches the second instance.
        if let Some(split_at) = patched.find(ALLPROJECTS_KEYWORD) {
            let tail = &patched[split_at..];
            if let Some(caps) = JCENTER_ANCHOR_RE.captures(tail) {
                inserted += 1;
                let replacement =
                    format!("{}\n{}", &caps[0], tag_line(&caps[1], GOOGLE_MAVEN_REPO));
                let patched_tail = JCENTER_ANCHOR_RE
                    .replace(tail, NoExpand(&replacement))
                    .into_owned();
                let rebuilt = format!("{}{}", &patched[..split_at], patched_tail);
                patched = rebuilt;
            }
        }

        (patched, inserted)
    }
}

/// Build an inserted line: indentation, content, marker comment
fn tag_line(indent: &str, content: &str) -> String {
    format!("{}{} // {}", indent, content, GRADLE_PATCH_MARKER)
}

/// Drop every line containing the marker, preserving all other bytes
fn strip_marker_lines(text: &str, marker: &str) -> String {
    text.split('\n')
        .filter(|line| !line.contains(marker))
        .collect::<Vec<_>>()
        .join("\n")
}
