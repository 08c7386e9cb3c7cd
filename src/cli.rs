//! CLI argument parsing for both tools.
//!
//! Flags only locate the project and pick a mode; all behavior lives in the
//! library modules so tests can drive it without a process boundary.
use crate::config::{load_config, ProjectConfig};
use crate::paths::ProjectPaths;
use crate::sync::VersionCommand;
use crate::version::{BumpKind, Version, VersionFormatError};
use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Parser};
use std::path::{Path, PathBuf};

/// Options shared by both tools for locating the project.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project root containing the firmware tree
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_root: PathBuf,

    /// Config file (defaults to <project-root>/tracker-tools.json when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit debug logging on stderr
    #[arg(long)]
    pub verbose: bool,
}

impl ProjectArgs {
    /// Load config and build typed paths for the project.
    pub fn resolve(&self) -> Result<ProjectPaths> {
        let config = self.load_config()?;
        Ok(ProjectPaths::new(self.project_root.clone(), config))
    }

    fn load_config(&self) -> Result<ProjectConfig> {
        let root: &Path = &self.project_root;
        if !root.is_dir() {
            return Err(anyhow::anyhow!(
                "project root {} is not a directory",
                root.display()
            ));
        }
        load_config(root, self.config.as_deref())
            .with_context(|| format!("load config for {}", root.display()))
    }
}

/// Remove emoji glyphs from the firmware sources, keeping `.bak` backups.
#[derive(Parser, Debug)]
#[command(
    name = "clean-emojis",
    version,
    about = "Strip emoji glyphs from firmware sources (backups kept next to each file)"
)]
pub struct CleanArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Show, set, or bump the project version.
#[derive(Parser, Debug)]
#[command(
    name = "update-version",
    about = "Manage project version numbers",
    disable_version_flag = true,
    after_help = "Examples:\n  update-version --show\n  update-version --version 1.0.1\n  update-version --bump minor",
    group(ArgGroup::new("mode").required(true).args(["version", "bump", "show"]))
)]
pub struct VersionArgs {
    /// Set specific version (e.g., 1.0.1)
    #[arg(long, value_name = "X.Y.Z")]
    pub version: Option<String>,

    /// Bump version component
    #[arg(long, value_enum, value_name = "KIND")]
    pub bump: Option<BumpKind>,

    /// Show current version info
    #[arg(long)]
    pub show: bool,

    /// Print --show output as JSON
    #[arg(long, requires = "show")]
    pub json: bool,

    #[command(flatten)]
    pub project: ProjectArgs,
}

impl VersionArgs {
    /// Resolve the selected mode, validating an explicit version string.
    pub fn command(&self) -> std::result::Result<VersionCommand, VersionFormatError> {
        if let Some(raw) = &self.version {
            return raw.parse::<Version>().map(VersionCommand::Set);
        }
        if let Some(kind) = self.bump {
            return Ok(VersionCommand::Bump(kind));
        }
        Ok(VersionCommand::Show)
    }
}
