//! Shared test infrastructure for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

#[allow(dead_code)]
pub const VERSION_H: &str = "\
#ifndef VERSION_H
#define VERSION_H

#define PROJECT_VERSION_MAJOR 1
#define PROJECT_VERSION_MINOR 0
#define PROJECT_VERSION_PATCH 0
#define PROJECT_VERSION_STRING \"1.0.0\"

#define PROJECT_NAME \"ESP32-S3-SIM7670G GPS Tracker\"

#endif // VERSION_H
";

#[allow(dead_code)]
pub const README: &str = "\
# ESP32-S3-SIM7670G GPS Tracker

[![Version](https://img.shields.io/badge/version-1.0.0-blue.svg)](CHANGELOG.md)

Tracks position over LTE.
";

/// Captured result of one tool invocation.
#[derive(Debug)]
pub struct RunOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Throwaway firmware project laid out like the real tree.
pub struct TestProject {
    dir: TempDir,
}

#[allow(dead_code)]
impl TestProject {
    pub fn empty() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("tracker-tools-it")
            .tempdir()
            .expect("create temp project");
        Self { dir }
    }

    /// Project with `VERSION`, `main/version.h`, and a badge README at 1.0.0.
    pub fn versioned() -> Self {
        let project = Self::empty();
        project.write("VERSION", b"1.0.0\n");
        project.write("main/version.h", VERSION_H.as_bytes());
        project.write("README.md", README.as_bytes());
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, contents: &[u8]) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(&path, contents).expect("write file");
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).expect("read file")
    }

    pub fn read_bytes(&self, rel: &str) -> Vec<u8> {
        fs::read(self.path(rel)).expect("read file")
    }

    pub fn update_version(&self, args: &[&str]) -> RunOutput {
        self.run(env!("CARGO_BIN_EXE_update-version"), args)
    }

    pub fn clean_emojis(&self, args: &[&str]) -> RunOutput {
        self.run(env!("CARGO_BIN_EXE_clean-emojis"), args)
    }

    fn run(&self, binary: &str, args: &[&str]) -> RunOutput {
        let output = Command::new(binary)
            .args(args)
            .current_dir(self.root())
            .env_remove("TRACKER_TOOLS_LOG")
            .output()
            .expect("spawn tool");
        RunOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
