//! Buildpatch Android CLI
//!
//! Patches the generated `platforms/android/build.gradle` before packaging
//! and restores it afterwards.

use anyhow::Result;
use buildpatch_android::{AnchorPolicy, DependencyOutcome, GradlePatchConfig, GradlePatcher};
use buildpatch_cli::exit_codes;
use buildpatch_cli::output::Status;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "buildpatch-android")]
#[command(about = "Patch the generated Android build.gradle for the SDK integration")]
#[command(version)]
struct Cli {
    /// Cordova project root containing platforms/android
    #[arg(long, default_value = ".", global = true)]
    project_dir: PathBuf,

    /// Patch this build.gradle instead of the conventional path
    #[arg(long, global = true)]
    gradle_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert the Play Services classpath and Google's Maven repository
    Modify {
        /// Seed a default build-tools classpath when the anchor line is absent
        #[arg(long)]
        lenient: bool,
        /// Print the patch report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove every line the modify step inserted
    Restore {
        /// Print the restore report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let gradle_file = cli.gradle_file.unwrap_or_else(|| {
        cli.project_dir
            .join("platforms")
            .join("android")
            .join("build.gradle")
    });

    let exit_code = match cli.command {
        Commands::Modify { lenient, json } => run_modify(gradle_file, lenient, json),
        Commands::Restore { json } => run_restore(gradle_file, json),
    };

    std::process::exit(exit_code);
}

fn run_modify(gradle_file: PathBuf, lenient: bool, json: bool) -> i32 {
    let anchor_policy = if lenient {
        AnchorPolicy::InsertDefault
    } else {
        AnchorPolicy::Strict
    };

    let patcher = GradlePatcher::new(GradlePatchConfig {
        gradle_file,
        anchor_policy,
    });

    match patcher.apply() {
        Ok(None) => {
            Status::skipped("build.gradle not found, nothing to modify");
            exit_codes::SUCCESS
        }
        Ok(Some(report)) => {
            if json {
                if let Ok(rendered) = serde_json::to_string_pretty(&report) {
                    println!("{}", rendered);
                }
                return exit_codes::SUCCESS;
            }

            match report.dependency {
                DependencyOutcome::AfterAnchor => {
                    Status::success("Added Google Play Services classpath");
                }
                DependencyOutcome::FallbackBlock => {
                    Status::warning("Anchor line missing, seeded the dependency block with defaults");
                }
                DependencyOutcome::NotPatched => {
                    Status::warning("No dependency block found, classpath not added");
                }
            }

            if report.repositories_added > 0 {
                Status::success(&format!(
                    "Added Google's Maven repository at {} location(s)",
                    report.repositories_added
                ));
            } else {
                Status::info("No jcenter() declaration found, repository unchanged");
            }

            exit_codes::SUCCESS
        }
        Err(e) => {
            Status::error(&format!("Modify failed: {}", e));
            exit_codes::FAILURE
        }
    }
}

fn run_restore(gradle_file: PathBuf, json: bool) -> i32 {
    let patcher = GradlePatcher::new(GradlePatchConfig {
        gradle_file,
        anchor_policy: AnchorPolicy::default(),
    });

    match patcher.restore() {
        Ok(None) => {
            Status::skipped("build.gradle not found, nothing to restore");
            exit_codes::SUCCESS
        }
        Ok(Some(report)) => {
            if json {
                if let Ok(rendered) = serde_json::to_string_pretty(&report) {
                    println!("{}", rendered);
                }
                return exit_codes::SUCCESS;
            }

            Status::success(&format!(
                "Removed {} inserted line(s)",
                report.lines_removed
            ));
            exit_codes::SUCCESS
        }
        Err(e) => {
            Status::error(&format!("Restore failed: {}", e));
            exit_codes::FAILURE
        }
    }
}
