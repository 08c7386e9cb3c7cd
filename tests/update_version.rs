//! End-to-end runs of `update-version` against a temp project.

mod common;

use common::{TestProject, README, VERSION_H};

#[test]
fn show_prints_components_and_next_versions_without_writing() {
    let project = TestProject::versioned();
    project.write("VERSION", b"2.4.1\n");

    let out = project.update_version(&["--show"]);

    assert!(out.success(), "{out:?}");
    assert!(out.stdout.contains("Current Version: 2.4.1"), "{}", out.stdout);
    assert!(out.stdout.contains("  Major: 3.0.0"), "{}", out.stdout);
    assert!(out.stdout.contains("  Minor: 2.5.0"), "{}", out.stdout);
    assert!(out.stdout.contains("  Patch: 2.4.2"), "{}", out.stdout);
    assert_eq!(project.read("VERSION"), "2.4.1\n");
    assert_eq!(project.read("main/version.h"), VERSION_H);
    assert_eq!(project.read("README.md"), README);
}

#[test]
fn show_json_is_machine_readable() {
    let project = TestProject::versioned();

    let out = project.update_version(&["--show", "--json"]);

    assert!(out.success(), "{out:?}");
    let report: serde_json::Value = serde_json::from_str(&out.stdout).expect("json output");
    assert_eq!(report["current"], "1.0.0");
    assert_eq!(report["next"]["major"], "2.0.0");
}

#[test]
fn explicit_version_propagates_to_all_files() {
    let project = TestProject::versioned();

    let out = project.update_version(&["--version", "2.0.0"]);

    assert!(out.success(), "{out:?}");
    assert_eq!(project.read("VERSION"), "2.0.0\n");
    let expected_header = VERSION_H
        .replace("MAJOR 1", "MAJOR 2")
        .replace("\"1.0.0\"", "\"2.0.0\"");
    assert_eq!(project.read("main/version.h"), expected_header);
    assert_eq!(
        project.read("README.md"),
        README.replace("version-1.0.0-blue", "version-2.0.0-blue")
    );
    assert!(out.stdout.contains("Updating version to: 2.0.0"));
    assert!(out.stdout.contains("Updated VERSION file: 2.0.0"));
    assert!(out.stdout.contains("Updated version.h: 2.0.0"));
    assert!(out.stdout.contains("Updated README.md badge: 2.0.0"));
    assert!(out.stdout.contains("3. Create tag: git tag v2.0.0"));
}

#[test]
fn malformed_versions_fail_without_touching_files() {
    for bad in ["1.2", "1.2.x", "v1.2.3"] {
        let project = TestProject::versioned();

        let out = project.update_version(&["--version", bad]);

        assert!(!out.success(), "{bad}: {out:?}");
        assert!(
            out.stderr.contains(&format!("invalid version format: {bad}")),
            "{bad}: {}",
            out.stderr
        );
        assert_eq!(project.read("VERSION"), "1.0.0\n");
        assert_eq!(project.read("main/version.h"), VERSION_H);
        assert_eq!(project.read("README.md"), README);
    }
}

#[test]
fn bump_kinds_follow_semver_rules() {
    for (kind, expected) in [("major", "2.0.0"), ("minor", "1.3.0"), ("patch", "1.2.4")] {
        let project = TestProject::versioned();
        project.write("VERSION", b"1.2.3\n");

        let out = project.update_version(&["--bump", kind]);

        assert!(out.success(), "{kind}: {out:?}");
        assert_eq!(project.read("VERSION"), format!("{expected}\n"));
        assert!(project
            .read("main/version.h")
            .contains(&format!("#define PROJECT_VERSION_STRING \"{expected}\"")));
    }
}

#[test]
fn mode_selection_is_a_usage_error() {
    let project = TestProject::versioned();

    let none = project.update_version(&[]);
    let both = project.update_version(&["--show", "--bump", "patch"]);

    assert_eq!(none.code, Some(2), "{none:?}");
    assert_eq!(both.code, Some(2), "{both:?}");
    assert_eq!(project.read("VERSION"), "1.0.0\n");
}

#[test]
fn missing_readme_aborts_with_nothing_written() {
    let project = TestProject::versioned();
    std::fs::remove_file(project.path("README.md")).expect("remove readme");

    let out = project.update_version(&["--bump", "patch"]);

    assert!(!out.success(), "{out:?}");
    assert!(out.stderr.contains("README.md"), "{}", out.stderr);
    assert_eq!(project.read("VERSION"), "1.0.0\n");
    assert_eq!(project.read("main/version.h"), VERSION_H);
}

#[test]
fn config_relocates_project_files() {
    let project = TestProject::empty();
    project.write(
        "tracker-tools.json",
        br#"{ "version_file": "firmware/VERSION", "version_header": "firmware/include/version.h", "readme": "docs/README.md" }"#,
    );
    project.write("firmware/VERSION", b"0.9.9\n");
    project.write("firmware/include/version.h", VERSION_H.as_bytes());
    project.write("docs/README.md", README.as_bytes());

    let out = project.update_version(&["--bump", "minor"]);

    assert!(out.success(), "{out:?}");
    assert_eq!(project.read("firmware/VERSION"), "0.10.0\n");
    assert!(project.read("docs/README.md").contains("version-0.10.0-blue"));
    assert!(!project.path("VERSION").exists());
}
