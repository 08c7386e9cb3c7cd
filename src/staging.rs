//! Staged file rewrites with rollback.
//!
//! Contents are computed in memory first, then published file by file through
//! a temp file in the destination directory. A failed publish restores the
//! files already written from their in-memory originals.
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// New contents for one file, held until publish.
#[derive(Debug, Clone)]
pub struct StagedWrite {
    pub path: PathBuf,
    /// Short name used in confirmation lines.
    pub label: String,
    pub contents: Vec<u8>,
    /// Bytes on disk when the write was staged; `None` if the file was absent.
    pub original: Option<Vec<u8>>,
}

impl StagedWrite {
    pub fn new(path: PathBuf, label: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path,
            label: label.into(),
            contents: contents.into(),
            original: None,
        }
    }

    pub fn with_original(mut self, original: Option<Vec<u8>>) -> Self {
        self.original = original;
        self
    }

    /// True when publishing would leave the file byte-identical.
    pub fn is_noop(&self) -> bool {
        self.original.as_deref() == Some(self.contents.as_slice())
    }
}

/// Publish every staged write, or none of them.
///
/// `on_published` runs for each write only after the whole set is committed.
pub fn publish_all<F>(writes: &[StagedWrite], mut on_published: F) -> Result<Vec<PathBuf>>
where
    F: FnMut(&StagedWrite),
{
    let mut published: Vec<&StagedWrite> = Vec::new();
    for write in writes {
        if let Err(err) = publish_file(&write.path, &write.contents) {
            rollback_publish(&published);
            return Err(err);
        }
        published.push(write);
    }
    for write in writes {
        on_published(write);
    }
    Ok(writes.iter().map(|write| write.path.clone()).collect())
}

/// Write one staged file in place, without a temp file or rollback.
pub fn write_direct(write: &StagedWrite) -> Result<()> {
    fs::write(&write.path, &write.contents)
        .with_context(|| format!("write {}", write.path.display()))
}

fn publish_file(dest: &Path, bytes: &[u8]) -> Result<()> {
    let parent = dest
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if !parent.is_dir() {
        return Err(anyhow!(
            "publish {}: directory {} does not exist",
            dest.display(),
            parent.display()
        ));
    }
    let mut tmp = tempfile::Builder::new()
        .prefix(".staged-")
        .tempfile_in(parent)
        .with_context(|| format!("stage {}", dest.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("stage {}", dest.display()))?;
    if let Ok(metadata) = fs::metadata(dest) {
        fs::set_permissions(tmp.path(), metadata.permissions())
            .with_context(|| format!("copy permissions for {}", dest.display()))?;
    }
    tmp.persist(dest)
        .map_err(|err| err.error)
        .with_context(|| format!("publish {}", dest.display()))?;
    Ok(())
}

fn rollback_publish(published: &[&StagedWrite]) {
    for write in published.iter().rev() {
        let restored = match &write.original {
            Some(bytes) => publish_file(&write.path, bytes),
            None => fs::remove_file(&write.path)
                .with_context(|| format!("remove {}", write.path.display())),
        };
        match restored {
            Ok(()) => tracing::info!(path = %write.path.display(), "rolled back"),
            Err(err) => {
                let message = format!("{err:#}");
                tracing::warn!(path = %write.path.display(), error = %message, "rollback failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_root() -> TempDir {
        tempfile::Builder::new()
            .prefix("tracker-tools-staging")
            .tempdir()
            .expect("create temp root")
    }

    #[test]
    fn publish_all_writes_every_file() {
        let root = temp_root();
        let a = root.path().join("a.txt");
        let b = root.path().join("b.txt");
        fs::write(&a, "old a").expect("seed a");
        let writes = vec![
            StagedWrite::new(a.clone(), "a", "new a").with_original(Some(b"old a".to_vec())),
            StagedWrite::new(b.clone(), "b", "new b"),
        ];

        let mut labels = Vec::new();
        let published =
            publish_all(&writes, |write| labels.push(write.label.clone())).expect("publish");

        assert_eq!(published, vec![a.clone(), b.clone()]);
        assert_eq!(labels, vec!["a", "b"]);
        assert_eq!(fs::read_to_string(&a).expect("read a"), "new a");
        assert_eq!(fs::read_to_string(&b).expect("read b"), "new b");
    }

    #[test]
    fn failed_publish_restores_earlier_files() {
        let root = temp_root();
        let a = root.path().join("a.txt");
        let created = root.path().join("created.txt");
        let unreachable = root.path().join("missing-dir").join("c.txt");
        fs::write(&a, "old a").expect("seed a");
        let writes = vec![
            StagedWrite::new(a.clone(), "a", "new a").with_original(Some(b"old a".to_vec())),
            StagedWrite::new(created.clone(), "created", "fresh"),
            StagedWrite::new(unreachable, "c", "never"),
        ];

        let mut called = 0;
        let err = publish_all(&writes, |_| called += 1).expect_err("publish should fail");

        assert!(format!("{err:#}").contains("missing-dir"), "{err:#}");
        assert_eq!(called, 0);
        assert_eq!(fs::read_to_string(&a).expect("read a"), "old a");
        assert!(!created.exists());
    }

    #[test]
    fn write_direct_reports_missing_directory() {
        let root = temp_root();
        let a = root.path().join("a.txt");
        write_direct(&StagedWrite::new(a.clone(), "a", "new a")).expect("write a");
        assert_eq!(fs::read_to_string(&a).expect("read a"), "new a");

        let unreachable = root.path().join("missing-dir").join("b.txt");
        let err = write_direct(&StagedWrite::new(unreachable, "b", "never"))
            .expect_err("missing directory");
        assert!(format!("{err:#}").contains("missing-dir"), "{err:#}");
    }

    #[cfg(unix)]
    #[test]
    fn publish_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let root = temp_root();
        let path = root.path().join("version.h");
        fs::write(&path, "old").expect("seed");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod");

        publish_file(&path, b"new").expect("publish");

        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn noop_detection_compares_original_bytes() {
        let same = StagedWrite::new(PathBuf::from("x"), "x", "1.0.0\n")
            .with_original(Some(b"1.0.0\n".to_vec()));
        assert!(same.is_noop());
        assert!(!StagedWrite::new(PathBuf::from("x"), "x", "1.0.0\n").is_noop());
    }
}
