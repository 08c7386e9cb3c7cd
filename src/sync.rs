//! Version synchronizer behind `update-version`.
//!
//! The canonical `VERSION` file is the source of truth. Set and bump modes
//! compute a validated target version first, then propagate it into the
//! constants header and the README badge.
use crate::paths::ProjectPaths;
use crate::staging::{publish_all, write_direct, StagedWrite};
use crate::version::{BumpKind, Version};
use anyhow::{Context, Result};
use regex::{Captures, Regex};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Exactly one mode per invocation, decided once at entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCommand {
    Show,
    Set(Version),
    Bump(BumpKind),
}

/// Read the canonical version; a missing file reads as `0.0.0`.
pub fn read_current_version(paths: &ProjectPaths) -> Result<Version> {
    let path = paths.version_file();
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "version file missing; assuming 0.0.0");
            return Ok(Version::zero());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("read version {}", path.display()));
        }
    };
    let version = text
        .trim()
        .parse::<Version>()
        .with_context(|| format!("parse version {}", path.display()))?;
    Ok(version)
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NextVersions {
    pub major: String,
    pub minor: String,
    pub patch: String,
}

/// What `--show` reports. Components are decimal strings without leading
/// zeros, so values past `u64` survive JSON output.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct VersionReport {
    pub current: String,
    pub major: String,
    pub minor: String,
    pub patch: String,
    pub next: NextVersions,
}

impl VersionReport {
    pub fn new(current: &Version) -> Self {
        Self {
            current: current.to_string(),
            major: current.major.value().to_string(),
            minor: current.minor.value().to_string(),
            patch: current.patch.value().to_string(),
            next: NextVersions {
                major: current.bump(BumpKind::Major).to_string(),
                minor: current.bump(BumpKind::Minor).to_string(),
                patch: current.bump(BumpKind::Patch).to_string(),
            },
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Current Version: {}\n", self.current));
        out.push_str(&format!("  Major: {}\n", self.major));
        out.push_str(&format!("  Minor: {}\n", self.minor));
        out.push_str(&format!("  Patch: {}\n", self.patch));
        out.push_str("\nNext versions would be:\n");
        out.push_str(&format!("  Major: {}\n", self.next.major));
        out.push_str(&format!("  Minor: {}\n", self.next.minor));
        out.push_str(&format!("  Patch: {}\n", self.next.patch));
        out
    }
}

/// New file text plus the patterns that found nothing to replace.
#[derive(Debug, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub unmatched: Vec<String>,
}

fn define_pattern(name: &str, value: &str) -> Result<Regex> {
    let pattern = format!(r"(#define[ \t]+{}[ \t]+){}", regex::escape(name), value);
    Regex::new(&pattern).with_context(|| format!("build pattern for {name}"))
}

/// Replace the `<prefix>_MAJOR/_MINOR/_PATCH` integers and the
/// `<prefix>_STRING` literal. Everything else stays byte-identical.
///
/// Integer defines get the component value without leading zeros (a C
/// literal `007` would be octal); the string define gets the version text
/// as given.
pub fn rewrite_version_header(content: &str, prefix: &str, version: &Version) -> Result<Rewrite> {
    let replacements = [
        (format!("{prefix}_MAJOR"), "[0-9]+", version.major.value().to_string()),
        (format!("{prefix}_MINOR"), "[0-9]+", version.minor.value().to_string()),
        (format!("{prefix}_PATCH"), "[0-9]+", version.patch.value().to_string()),
        (
            format!("{prefix}_STRING"),
            r#""[^"]*""#,
            format!("\"{version}\""),
        ),
    ];
    let mut text = content.to_string();
    let mut unmatched = Vec::new();
    for (name, value_pattern, value) in replacements {
        let re = define_pattern(&name, value_pattern)?;
        if !re.is_match(&text) {
            unmatched.push(name);
            continue;
        }
        text = re
            .replace_all(&text, |caps: &Captures| format!("{}{}", &caps[1], value))
            .into_owned();
    }
    Ok(Rewrite { text, unmatched })
}

/// Replace the version segment of the shields.io badge, keeping its colour.
pub fn rewrite_readme_badge(content: &str, version: &Version) -> Rewrite {
    let re = Regex::new(
        r"(\[!\[Version\]\(https://img\.shields\.io/badge/version-)[^-)]+(-[^)\s]*\.svg\)\])",
    )
    .expect("regex for version badge");
    if !re.is_match(content) {
        return Rewrite {
            text: content.to_string(),
            unmatched: vec!["version badge".to_string()],
        };
    }
    let text = re
        .replace_all(content, |caps: &Captures| {
            format!("{}{}{}", &caps[1], version, &caps[2])
        })
        .into_owned();
    Rewrite {
        text,
        unmatched: Vec::new(),
    }
}

/// Files touched by propagation, in write order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    VersionFile,
    Header,
    Readme,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::VersionFile, Target::Header, Target::Readme];

    pub fn path(&self, paths: &ProjectPaths) -> PathBuf {
        match self {
            Target::VersionFile => paths.version_file(),
            Target::Header => paths.version_header(),
            Target::Readme => paths.readme(),
        }
    }

    fn label(&self, path: &Path) -> String {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        match self {
            Target::VersionFile => format!("{name} file"),
            Target::Header => name,
            Target::Readme => format!("{name} badge"),
        }
    }

    /// Read the target and compute its new contents.
    pub fn stage(&self, paths: &ProjectPaths, version: &Version) -> Result<StagedWrite> {
        let path = self.path(paths);
        let label = self.label(&path);
        let (contents, original) = match self {
            Target::VersionFile => {
                let original = match fs::read(&path) {
                    Ok(bytes) => Some(bytes),
                    Err(err) if err.kind() == ErrorKind::NotFound => None,
                    Err(err) => {
                        return Err(err).with_context(|| format!("read {}", path.display()))
                    }
                };
                (format!("{version}\n"), original)
            }
            Target::Header => {
                let content = read_text(&path)?;
                let rewrite =
                    rewrite_version_header(&content, &paths.config().version_macro_prefix, version)?;
                warn_unmatched(&path, &rewrite.unmatched);
                (rewrite.text, Some(content.into_bytes()))
            }
            Target::Readme => {
                let content = read_text(&path)?;
                let rewrite = rewrite_readme_badge(&content, version);
                warn_unmatched(&path, &rewrite.unmatched);
                (rewrite.text, Some(content.into_bytes()))
            }
        };
        let staged = StagedWrite::new(path, label, contents).with_original(original);
        if staged.is_noop() {
            tracing::debug!(path = %staged.path.display(), "already at target version");
        }
        Ok(staged)
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn warn_unmatched(path: &Path, unmatched: &[String]) {
    for name in unmatched {
        tracing::warn!(path = %path.display(), pattern = %name, "nothing to replace");
    }
}

/// Stage every target; fails before any write if one cannot be read.
pub fn plan_propagation(paths: &ProjectPaths, version: &Version) -> Result<Vec<StagedWrite>> {
    Target::ALL
        .iter()
        .map(|target| target.stage(paths, version))
        .collect()
}

fn print_updated(write: &StagedWrite, version: &Version) {
    println!("\u{2713} Updated {}: {version}", write.label);
}

/// Write `version` into every target and print confirmations.
///
/// Transactional mode stages everything first and rolls back on a failed
/// publish. Otherwise each target is read and written in turn and a failure
/// leaves earlier targets updated.
pub fn propagate(paths: &ProjectPaths, version: &Version) -> Result<Vec<PathBuf>> {
    println!("Updating version to: {version}");
    let updated = if paths.config().transactional {
        let writes = plan_propagation(paths, version)?;
        publish_all(&writes, |write| print_updated(write, version))?
    } else {
        let mut updated = Vec::new();
        for target in Target::ALL {
            let write = target.stage(paths, version)?;
            write_direct(&write)?;
            print_updated(&write, version);
            updated.push(write.path);
        }
        updated
    };
    tracing::info!(version = %version, files = updated.len(), "version propagated");
    println!("\nVersion updated to {version} in all files!");
    print!("{}", render_next_steps(paths, version));
    Ok(updated)
}

/// Advisory follow-up steps; nothing here is executed.
pub fn render_next_steps(paths: &ProjectPaths, version: &Version) -> String {
    let changelog = paths
        .changelog()
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| paths.config().changelog.clone());
    let mut out = String::from("\nNext steps:\n");
    out.push_str(&format!("1. Update {changelog} with new version notes\n"));
    out.push_str(&format!(
        "2. Commit changes: git add . && git commit -m 'Bump version to {version}'\n"
    ));
    out.push_str(&format!("3. Create tag: git tag v{version}\n"));
    out.push_str("4. Push: git push origin main --tags\n");
    out
}

/// Run one command against the project.
pub fn run(paths: &ProjectPaths, command: VersionCommand, json: bool) -> Result<()> {
    match command {
        VersionCommand::Show => {
            let report = VersionReport::new(&read_current_version(paths)?);
            if json {
                let text =
                    serde_json::to_string_pretty(&report).context("serialize version report")?;
                println!("{text}");
            } else {
                print!("{}", report.render_text());
            }
        }
        VersionCommand::Set(version) => {
            propagate(paths, &version)?;
        }
        VersionCommand::Bump(kind) => {
            let current = read_current_version(paths)?;
            let next = current.bump(kind);
            tracing::debug!(from = %current, to = %next, kind = kind.as_str(), "bump");
            propagate(paths, &next)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
