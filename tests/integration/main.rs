//! Integration tests for pkgrestore

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Isolated workspace: packages folder, cache root and config path
    struct Workspace {
        temp: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            let workspace = Self {
                temp: TempDir::new().unwrap(),
            };
            workspace.package("Foo", "1.0.0", &[("Bar", "1.0")]);
            workspace.package("Bar", "1.0.0", &[]);
            workspace.package("Bar", "2.0.0", &[]);
            workspace
        }

        fn packages(&self) -> PathBuf {
            self.temp.path().join("packages")
        }

        fn cache(&self) -> PathBuf {
            self.temp.path().join("cache")
        }

        fn config(&self) -> PathBuf {
            self.temp.path().join("config.toml")
        }

        fn path(&self, name: &str) -> PathBuf {
            self.temp.path().join(name)
        }

        fn package(&self, id: &str, version: &str, deps: &[(&str, &str)]) -> PathBuf {
            let dir = self.packages().join(id.to_lowercase()).join(version);
            std::fs::create_dir_all(dir.join("lib")).unwrap();
            std::fs::write(dir.join("lib").join(format!("{}.dll", id)), b"").unwrap();

            let mut manifest = format!("id = \"{}\"\nversion = \"{}\"\n", id, version);
            for (dep, range) in deps {
                manifest.push_str(&format!(
                    "\n[[dependencies]]\nid = \"{}\"\nrange = \"{}\"\n",
                    dep, range
                ));
            }
            manifest.push_str(&format!("\n[[assets]]\nruntime = [\"lib/{}.dll\"]\n", id));
            std::fs::write(dir.join("package.toml"), manifest).unwrap();
            dir
        }

        /// Command with config isolated to this workspace
        fn cmd(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("pkgrestore");
            cmd.current_dir(self.temp.path())
                .env("PKGRESTORE_PLAIN", "1")
                .env_remove("PKGRESTORE_LOCKFILE_CACHE")
                .arg("--no-local")
                .arg("--config")
                .arg(self.config());
            cmd
        }

        fn restore(&self, packages: &[&str]) -> Command {
            let mut cmd = self.cmd();
            cmd.arg("restore")
                .args(packages)
                .arg("--framework")
                .arg("net8.0")
                .arg("--packages")
                .arg(self.packages())
                .arg("--cache-dir")
                .arg(self.cache());
            cmd
        }
    }

    fn exists(path: &Path) -> bool {
        path.exists()
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("pkgrestore")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("cached package restore"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("pkgrestore")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("pkgrestore"));
    }

    #[test]
    fn restore_prints_closure_and_fills_cache() {
        let ws = Workspace::new();

        ws.restore(&["Foo@1.0.0"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Foo 1.0.0"))
            .stdout(predicate::str::contains("Bar 1.0.0"));

        assert!(exists(&ws.cache().join("net/8.0/unknown-rid/foo/1.0.0")));
    }

    #[test]
    fn restore_writes_lock_file() {
        let ws = Workspace::new();
        let lock_path = ws.path("app.lock.json");

        let output = ws
            .restore(&["Foo@1.0.0", "Bar@2.0.0"])
            .arg("--format")
            .arg("json")
            .arg("--output")
            .arg(&lock_path)
            .output()
            .unwrap();
        assert!(output.status.success());

        let written = std::fs::read_to_string(&lock_path).unwrap();
        assert_eq!(String::from_utf8(output.stdout).unwrap(), written);

        let json: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(json["target"]["framework"], "net8.0");
        assert_eq!(json["libraries"].as_array().unwrap().len(), 2);
        assert_eq!(json["libraries"][0]["name"], "Bar");
        assert_eq!(json["libraries"][0]["version"], "2.0.0");
    }

    #[test]
    fn second_restore_served_from_disk_cache() {
        let ws = Workspace::new();
        ws.restore(&["Foo@1.0.0"]).assert().success();

        // Resolving again would fail without Bar 1.0.0 on disk
        std::fs::remove_dir_all(ws.packages().join("bar").join("1.0.0")).unwrap();

        ws.restore(&["Foo@1.0.0"])
            .arg("-vv")
            .assert()
            .success()
            .stdout(predicate::str::contains("Bar 1.0.0"))
            .stderr(predicate::str::contains("Disk cache hit"));
    }

    #[test]
    fn stale_cache_entry_is_resolved_again() {
        let ws = Workspace::new();
        ws.restore(&["Foo@1.0.0"]).assert().success();

        std::fs::remove_dir_all(ws.packages().join("foo").join("1.0.0")).unwrap();

        ws.restore(&["Foo@1.0.0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Package not found"));
    }

    #[test]
    fn no_disk_cache_leaves_cache_empty() {
        let ws = Workspace::new();
        ws.restore(&["Foo@1.0.0"])
            .arg("--no-disk-cache")
            .assert()
            .success();
        assert!(!exists(&ws.cache()));
    }

    #[test]
    fn restore_missing_package_fails_with_hint() {
        let ws = Workspace::new();
        ws.restore(&["Missing@1.0.0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Package not found: Missing"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn restore_invalid_version_fails() {
        let ws = Workspace::new();
        ws.restore(&["Foo@not.a.version"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid version"));
    }

    #[test]
    fn closure_honors_excludes() {
        let ws = Workspace::new();
        let lock_path = ws.path("app.lock.json");
        ws.restore(&["Foo@1.0.0"])
            .arg("--output")
            .arg(&lock_path)
            .assert()
            .success();

        ws.cmd()
            .args(["closure", "--lock-file"])
            .arg(&lock_path)
            .arg("Foo")
            .assert()
            .success()
            .stdout(predicate::str::contains("Foo 1.0.0"))
            .stdout(predicate::str::contains("Bar 1.0.0"));

        ws.cmd()
            .args(["closure", "--lock-file"])
            .arg(&lock_path)
            .args(["Foo", "--exclude", "bar"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Foo 1.0.0"))
            .stdout(predicate::str::contains("Bar").not());
    }

    #[test]
    fn assets_lists_absolute_paths() {
        let ws = Workspace::new();
        let lock_path = ws.path("app.lock.json");
        ws.restore(&["Foo@1.0.0"])
            .arg("--output")
            .arg(&lock_path)
            .assert()
            .success();

        let foo_dll = ws.packages().join("foo").join("1.0.0").join("lib").join("Foo.dll");
        ws.cmd()
            .args(["assets", "--lock-file"])
            .arg(&lock_path)
            .arg("--packages")
            .arg(ws.packages())
            .arg("Foo")
            .assert()
            .success()
            .stdout(predicate::str::contains(foo_dll.display().to_string()));
    }

    #[test]
    fn cache_list_and_clear() {
        let ws = Workspace::new();
        ws.restore(&["Foo@1.0.0"]).assert().success();

        ws.cmd()
            .args(["cache", "list", "--cache-dir"])
            .arg(ws.cache())
            .assert()
            .success()
            .stdout(predicate::str::contains("foo"))
            .stdout(predicate::str::contains("Total: 1"));

        ws.cmd()
            .args(["cache", "clear", "--yes", "--cache-dir"])
            .arg(ws.cache())
            .assert()
            .success();

        ws.cmd()
            .args(["cache", "list", "--cache-dir"])
            .arg(ws.cache())
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached lock files found"));
    }

    #[test]
    fn cache_path_prints_root() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["cache", "path", "--cache-dir"])
            .arg(ws.cache())
            .assert()
            .success()
            .stdout(predicate::str::contains(ws.cache().display().to_string()));
    }

    #[test]
    fn config_init_set_show() {
        let ws = Workspace::new();

        ws.cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));

        ws.cmd().args(["config", "init"]).assert().success();
        assert!(exists(&ws.config()));

        ws.cmd()
            .args(["config", "set", "target.runtime", "linux-x64"])
            .assert()
            .success();

        ws.cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[target]"))
            .stdout(predicate::str::contains("linux-x64"));
    }

    #[test]
    fn config_set_unknown_key_fails() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["config", "set", "cache.size", "10"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn local_config_set_keeps_config_loadable() {
        let ws = Workspace::new();
        let local = |args: &[&str]| {
            let mut cmd = cargo_bin_cmd!("pkgrestore");
            cmd.current_dir(ws.temp.path())
                .env("PKGRESTORE_PLAIN", "1")
                .arg("--config")
                .arg(ws.config())
                .args(args);
            cmd
        };

        local(&["config", "set", "--local", "cache.disabled", "yes"])
            .assert()
            .success();

        local(&["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("disabled = true"));
    }

    #[test]
    fn restore_rejects_path_like_id() {
        let ws = Workspace::new();
        ws.restore(&["../../escaped@1.0.0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid package request"));
        assert!(!exists(&ws.cache()));
    }

    #[test]
    fn local_config_overrides_framework() {
        let ws = Workspace::new();
        std::fs::write(ws.path(".pkgrestore.toml"), "[target]\nframework = \"netstandard2.0\"\n")
            .unwrap();

        let mut cmd = cargo_bin_cmd!("pkgrestore");
        cmd.current_dir(ws.temp.path())
            .env("PKGRESTORE_PLAIN", "1")
            .arg("--config")
            .arg(ws.config())
            .args(["restore", "Bar@1.0.0", "--format", "json", "--no-disk-cache", "--packages"])
            .arg(ws.packages())
            .assert()
            .success()
            .stdout(predicate::str::contains("netstandard2.0"));
    }
}
