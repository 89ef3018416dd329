//! Integration tests for luxbuild

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn luxbuild() -> Command {
        let mut cmd = cargo_bin_cmd!("luxbuild");
        for var in ["LUX_BINARY_DIR", "LUX_SOURCE_DIR", "LUX_BUILD_TYPE", "LUX_SETTINGS"] {
            cmd.env_remove(var);
        }
        cmd
    }

    fn write_settings(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("luxcore.json");
        std::fs::write(
            &path,
            r#"{"Dependencies": {"user": "", "release": "2.10.0"}, "Build": {"gcc": "14", "cxx": 20}}"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn help_displays() {
        luxbuild()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_DESCRIPTION")))
            .stdout(predicate::str::contains("build-and-install"));
    }

    #[test]
    fn version_displays() {
        luxbuild()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("luxbuild"));
    }

    #[test]
    fn unknown_subcommand_fails() {
        luxbuild().arg("frobnicate").assert().failure();
    }

    #[test]
    fn unknown_build_type_lists_valid_values() {
        let temp = TempDir::new().unwrap();
        luxbuild()
            .current_dir(temp.path())
            .args(["--build-type", "release", "build-and-install", "luxcoreui"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Unknown build type 'release'"))
            .stderr(predicate::str::contains(
                "Debug, Release, RelWithDebInfo, MinSizeRel",
            ));
    }

    #[test]
    fn build_type_from_environment() {
        let temp = TempDir::new().unwrap();
        luxbuild()
            .current_dir(temp.path())
            .env("LUX_BUILD_TYPE", "Fast")
            .args(["install", "luxcore"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Unknown build type 'Fast'"));
    }

    #[test]
    fn clear_removes_generated_dirs_only() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        for name in ["build", "dependencies", "install", "sources"] {
            std::fs::create_dir_all(out.join(name)).unwrap();
        }

        luxbuild()
            .current_dir(temp.path())
            .args(["clear"])
            .assert()
            .success();

        assert!(!out.join("build").exists());
        assert!(!out.join("dependencies").exists());
        assert!(!out.join("install").exists());
        assert!(out.join("sources").exists());
    }

    #[test]
    fn clear_with_missing_binary_dir() {
        let temp = TempDir::new().unwrap();
        luxbuild()
            .env("LUX_BINARY_DIR", temp.path().join("never-created"))
            .arg("clear")
            .assert()
            .success();
    }

    #[test]
    fn deps_without_settings_fails() {
        let temp = TempDir::new().unwrap();
        luxbuild()
            .current_dir(temp.path())
            .arg("deps")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Settings file not found"));
    }

    #[test]
    fn deps_with_invalid_settings_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        std::fs::write(&path, r#"{"Dependencies": {}}"#).unwrap();

        luxbuild()
            .args(["deps", "--settings"])
            .arg(&path)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid settings"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn deps_with_missing_local_archive_fails() {
        let temp = TempDir::new().unwrap();
        let settings = write_settings(temp.path());

        luxbuild()
            .current_dir(temp.path())
            .env("LUX_SETTINGS", &settings)
            .args(["deps", "-l", "missing-cache.tgz"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Path not found"));
    }
}
