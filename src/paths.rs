//! Typed paths into the firmware project layout.
//!
//! Centralizing path construction keeps both tools pointed at the same files
//! when the layout is overridden through config.
use crate::config::ProjectConfig;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Convenience wrapper for locating project files.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
    config: ProjectConfig,
}

impl ProjectPaths {
    pub fn new(root: PathBuf, config: ProjectConfig) -> Self {
        Self { root, config }
    }

    /// Return the project root used for path derivation.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Return the source tree searched by the emoji cleaner.
    pub fn source_dir(&self) -> PathBuf {
        self.root.join(&self.config.source_dir)
    }

    /// Return the individually named files outside the source tree.
    pub fn extra_files(&self) -> Vec<PathBuf> {
        self.config
            .extra_files
            .iter()
            .map(|rel| self.root.join(rel))
            .collect()
    }

    /// Return the canonical version store path.
    pub fn version_file(&self) -> PathBuf {
        self.root.join(&self.config.version_file)
    }

    /// Return the `version.h` constants file path.
    pub fn version_header(&self) -> PathBuf {
        self.root.join(&self.config.version_header)
    }

    /// Return the README carrying the version badge.
    pub fn readme(&self) -> PathBuf {
        self.root.join(&self.config.readme)
    }

    pub fn changelog(&self) -> PathBuf {
        self.root.join(&self.config.changelog)
    }

    /// Return the backup path for `path`: the same name with the backup
    /// suffix appended (`gps.c` -> `gps.c.bak`).
    pub fn backup_path(&self, path: &Path) -> PathBuf {
        let mut name = OsString::from(path.as_os_str());
        name.push(&self.config.backup_suffix);
        PathBuf::from(name)
    }

    /// True when the file name ends in one of the configured extensions.
    pub fn has_source_extension(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        self.config
            .extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
    }
}
