//! Project configuration for both tools.
//!
//! Every field has a default matching the firmware tree layout, so a project
//! without `tracker-tools.json` behaves exactly like one with an empty `{}`.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const CONFIG_FILE_NAME: &str = "tracker-tools.json";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub schema_version: u32,
    /// Tree searched recursively by the emoji cleaner.
    pub source_dir: String,
    /// File name suffixes selected inside `source_dir`.
    pub extensions: Vec<String>,
    /// Individually named files cleaned when present.
    pub extra_files: Vec<String>,
    pub backup_suffix: String,
    /// Canonical single-line version store.
    pub version_file: String,
    pub version_header: String,
    /// Prefix of the `#define <prefix>_MAJOR` style directives.
    pub version_macro_prefix: String,
    pub readme: String,
    pub changelog: String,
    /// Stage every rewrite before publishing and roll back on failure.
    pub transactional: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            source_dir: "main".to_string(),
            extensions: vec![".c".to_string(), ".h".to_string()],
            extra_files: vec![
                ".gitignore".to_string(),
                ".github/copilot-instructions.md".to_string(),
            ],
            backup_suffix: ".bak".to_string(),
            version_file: "VERSION".to_string(),
            version_header: "main/version.h".to_string(),
            version_macro_prefix: "PROJECT_VERSION".to_string(),
            readme: "README.md".to_string(),
            changelog: "CHANGELOG.md".to_string(),
            transactional: true,
        }
    }
}

/// Load config from an explicit path, or from the project root when present.
///
/// An explicit path must exist; the implicit `tracker-tools.json` is optional.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<ProjectConfig> {
    let config = match explicit {
        Some(path) => read_config(path)?,
        None => {
            let path = project_root.join(CONFIG_FILE_NAME);
            if path.is_file() {
                read_config(&path)?
            } else {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                ProjectConfig::default()
            }
        }
    };
    validate_config(&config)?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<ProjectConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: ProjectConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Validate schema version, required values, and path shapes.
pub fn validate_config(config: &ProjectConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if config.extensions.is_empty() {
        return Err(anyhow!("extensions must list at least one suffix"));
    }
    if config.extensions.iter().any(|ext| ext.trim().is_empty()) {
        return Err(anyhow!("extensions entries must be non-empty"));
    }
    if config.backup_suffix.trim().is_empty() {
        return Err(anyhow!("backup_suffix must be non-empty"));
    }
    if !is_identifier(&config.version_macro_prefix) {
        return Err(anyhow!(
            "version_macro_prefix must be a C identifier (got {:?})",
            config.version_macro_prefix
        ));
    }
    validate_relative_path(&config.source_dir, "source_dir")?;
    for extra in &config.extra_files {
        validate_relative_path(extra, "extra_files")?;
    }
    validate_relative_path(&config.version_file, "version_file")?;
    validate_relative_path(&config.version_header, "version_header")?;
    validate_relative_path(&config.readme, "readme")?;
    validate_relative_path(&config.changelog, "changelog")?;
    Ok(())
}

fn validate_relative_path(rel: &str, label: &str) -> Result<()> {
    let path = Path::new(rel);
    if rel.trim().is_empty() || path.is_absolute() || has_parent_components(path) {
        return Err(anyhow!(
            "{label} entries must be relative paths without '..' (got {rel:?})"
        ));
    }
    Ok(())
}

fn has_parent_components(path: &Path) -> bool {
    path.components()
        .any(|component| matches!(component, Component::ParentDir))
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
