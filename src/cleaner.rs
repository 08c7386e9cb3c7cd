//! File walking and per-file processing for `clean-emojis`.
//!
//! Every candidate file is backed up before it is read. A failure on one file
//! is recorded in the report and never stops the run.
use crate::emoji::{clean_text, EmojiTable};
use crate::paths::ProjectPaths;
use crate::util::{decode_skipping_invalid, display_path};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of processing one candidate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Content changed and the file was rewritten.
    Cleaned,
    /// Nothing to remove; the file was left as-is.
    Unchanged,
}

#[derive(Debug)]
pub struct FileEntry {
    pub path: PathBuf,
    /// `Err` holds the rendered error chain.
    pub result: std::result::Result<FileOutcome, String>,
}

/// Per-file outcomes in processing order.
#[derive(Debug, Default)]
pub struct CleanReport {
    pub entries: Vec<FileEntry>,
    /// Scan errors for directories that could not be listed.
    pub scan_errors: Vec<String>,
}

impl CleanReport {
    pub fn cleaned(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.result, Ok(FileOutcome::Cleaned)))
            .map(|entry| entry.path.as_path())
    }

    pub fn cleaned_count(&self) -> usize {
        self.cleaned().count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.result.is_err())
            .count()
    }
}

/// A working file whose backup copy already exists on disk.
///
/// The only way to get one is [`BackedUpFile::create`], so a rewrite can never
/// precede its backup.
#[derive(Debug)]
pub struct BackedUpFile<'a> {
    path: &'a Path,
    backup: PathBuf,
}

impl<'a> BackedUpFile<'a> {
    /// Copy `path` to `backup`, replacing any older backup.
    pub fn create(path: &'a Path, backup: PathBuf) -> Result<Self> {
        fs::copy(path, &backup)
            .with_context(|| format!("backup {} to {}", path.display(), backup.display()))?;
        tracing::debug!(path = %path.display(), backup = %backup.display(), "backup created");
        Ok(Self { path, backup })
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    /// Read the working file as text, dropping invalid UTF-8.
    pub fn read_text(&self) -> Result<String> {
        let bytes = fs::read(self.path).with_context(|| format!("read {}", self.path.display()))?;
        Ok(decode_skipping_invalid(&bytes))
    }

    pub fn rewrite(&self, text: &str) -> Result<()> {
        fs::write(self.path, text).with_context(|| format!("write {}", self.path.display()))
    }
}

/// Back up, clean, and rewrite one file if its content changes.
pub fn clean_file(path: &Path, backup: PathBuf, table: &EmojiTable<'_>) -> Result<FileOutcome> {
    let file = BackedUpFile::create(path, backup)?;
    let original = file.read_text()?;
    let cleaned = clean_text(&original, table);
    if cleaned == original {
        tracing::debug!(
            path = %path.display(),
            backup = %file.backup_path().display(),
            "no change"
        );
        return Ok(FileOutcome::Unchanged);
    }
    file.rewrite(&cleaned)?;
    Ok(FileOutcome::Cleaned)
}

/// Source-tree files with a configured extension, then the extra files that
/// exist, in a stable order.
pub fn candidate_files(paths: &ProjectPaths, report: &mut CleanReport) -> Vec<PathBuf> {
    let source_dir = paths.source_dir();
    let mut files = Vec::new();
    if source_dir.is_dir() {
        collect_files_recursive(&source_dir, &mut files, &mut report.scan_errors);
        files.retain(|path| paths.has_source_extension(path));
    } else {
        tracing::warn!(path = %source_dir.display(), "source directory not found");
    }
    for extra in paths.extra_files() {
        if extra.exists() && !files.contains(&extra) {
            files.push(extra);
        } else {
            tracing::debug!(path = %extra.display(), "extra file skipped");
        }
    }
    files
}

fn collect_files_recursive(root: &Path, files: &mut Vec<PathBuf>, errors: &mut Vec<String>) {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            errors.push(format!("read {}: {err}", root.display()));
            return;
        }
    };
    let mut dirs = Vec::new();
    let mut found = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                errors.push(format!("read {}: {err}", root.display()));
                continue;
            }
        };
        let path = entry.path();
        let is_real_dir = entry.file_type().is_ok_and(|kind| kind.is_dir());
        if is_real_dir {
            dirs.push(path);
        } else if path.is_file() {
            found.push(path);
        }
    }
    found.sort();
    dirs.sort();
    files.extend(found);
    for dir in dirs {
        collect_files_recursive(&dir, files, errors);
    }
}

/// Clean every candidate file in the project, handing each entry to
/// `on_file` as soon as that file is done.
pub fn clean_project(
    paths: &ProjectPaths,
    table: &EmojiTable<'_>,
    mut on_file: impl FnMut(&FileEntry),
) -> CleanReport {
    let mut report = CleanReport::default();
    let files = candidate_files(paths, &mut report);
    tracing::info!(count = files.len(), "candidate files");
    for path in files {
        let backup = paths.backup_path(&path);
        let result = clean_file(&path, backup, table).map_err(|err| format!("{err:#}"));
        if let Err(message) = &result {
            tracing::warn!(path = %path.display(), error = %message, "file skipped");
        }
        let entry = FileEntry { path, result };
        on_file(&entry);
        report.entries.push(entry);
    }
    report
}

/// Progress line for one file; unchanged files print nothing.
pub fn render_entry(entry: &FileEntry, paths: &ProjectPaths) -> Option<String> {
    let shown = display_path(&entry.path, Some(paths.root()));
    match &entry.result {
        Ok(FileOutcome::Cleaned) => Some(format!("Cleaned emojis from: {shown}\n")),
        Ok(FileOutcome::Unchanged) => None,
        Err(message) => Some(format!("Error processing {shown}: {message}\n")),
    }
}

/// Scan errors and the closing summary for stdout.
pub fn render_summary(report: &CleanReport, paths: &ProjectPaths) -> String {
    let mut out = String::new();
    for error in &report.scan_errors {
        out.push_str(&format!("Error scanning {error}\n"));
    }
    out.push_str(&format!(
        "\nCompleted! Cleaned {} files of all emojis.\n",
        report.cleaned_count()
    ));
    out.push_str(&format!(
        "Backup files created with {} extension\n",
        paths.config().backup_suffix
    ));
    out
}

#[cfg(test)]
#[path = "cleaner_tests.rs"]
mod tests;
