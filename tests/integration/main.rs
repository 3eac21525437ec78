//! Integration tests for hnposts
//!
//! Every test points the cache and config at a temp dir; none touches the network.

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A sandboxed environment for one invocation
struct Sandbox {
    temp: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    fn cache_dir(&self) -> PathBuf {
        self.temp.path().join("cache").join("hnposts")
    }

    fn config_path(&self) -> PathBuf {
        self.temp.path().join("config.toml")
    }

    fn write_config(&self, content: &str) {
        fs::write(self.config_path(), content).unwrap();
    }

    fn write_store(&self, content: &str) {
        fs::create_dir_all(self.cache_dir()).unwrap();
        fs::write(self.cache_dir().join("cache.json"), content).unwrap();
    }

    fn read_store(&self) -> serde_json::Value {
        let raw = fs::read_to_string(self.cache_dir().join("cache.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn env_vars(&self) -> [(&'static str, OsString); 4] {
        [
            ("XDG_CACHE_HOME", self.temp.path().join("cache").into()),
            ("HOME", self.temp.path().into()),
            ("HNPOSTS_CONFIG", self.config_path().into()),
            ("CI", "1".into()),
        ]
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("hnposts");
        cmd.envs(self.env_vars());
        cmd
    }
}

mod cli_tests {
    use super::*;

    #[test]
    fn help_displays() {
        Sandbox::new()
            .cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Hacker News"));
    }

    #[test]
    fn version_displays() {
        Sandbox::new()
            .cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("hnposts"));
    }

    #[test]
    fn completions_for_bash() {
        Sandbox::new()
            .cmd()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("hnposts"));
    }

    #[test]
    fn config_path_honors_env() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_defaults() {
        Sandbox::new()
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[api]"))
            .stdout(predicate::str::contains("hacker-news.firebaseio.com"));
    }

    #[test]
    fn config_init_writes_file() {
        let sandbox = Sandbox::new();
        sandbox.cmd().args(["config", "init"]).assert().success();
        let written = fs::read_to_string(sandbox.config_path()).unwrap();
        assert!(written.contains("[posts]"));
    }

    #[test]
    fn invalid_config_fails() {
        let sandbox = Sandbox::new();
        sandbox.write_config("[posts\nlimit =");
        sandbox
            .cmd()
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn posts_without_user() {
        Sandbox::new()
            .cmd()
            .arg("posts")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No user given"))
            .stderr(predicate::str::contains("Hint:"));
    }
}

mod cache_tests {
    use super::*;
    use hnposts::cache::{DirLock, TryLock};
    use std::process::Stdio;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn cache_path_uses_xdg_cache_home() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["cache", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                sandbox.cache_dir().display().to_string(),
            ));
    }

    #[test]
    fn stats_on_empty_cache_creates_store() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["cache", "stats", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"entries\": 0"));

        assert_eq!(sandbox.read_store(), serde_json::json!({"__version__": 0}));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(sandbox.cache_dir())
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o700);
        }
    }

    #[test]
    fn show_existing_entry() {
        let sandbox = Sandbox::new();
        sandbox.write_store(r#"{"__version__": 0, "item/1.json": {"title": "x"}}"#);

        sandbox
            .cmd()
            .args(["cache", "show", "item/1.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"title\": \"x\""));
    }

    #[test]
    fn show_missing_entry() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["cache", "show", "item/1.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Cache entry not found"));
    }

    #[test]
    fn stale_schema_is_discarded() {
        let sandbox = Sandbox::new();
        sandbox.write_store(r#"{"__version__": 9, "item/1.json": {"title": "x"}}"#);

        sandbox
            .cmd()
            .args(["cache", "show", "item/1.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Cache entry not found"));

        assert_eq!(sandbox.read_store(), serde_json::json!({"__version__": 0}));
    }

    #[test]
    fn corrupt_store_is_reported() {
        let sandbox = Sandbox::new();
        sandbox.write_store("{truncated");

        sandbox
            .cmd()
            .args(["cache", "stats"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("is corrupt"));
    }

    #[test]
    fn failed_fetch_still_releases_cache() {
        let sandbox = Sandbox::new();
        sandbox.write_config(
            r#"
            [api]
            base_url = "http://127.0.0.1:9/v0"
            timeout_secs = 2
            "#,
        );

        sandbox
            .cmd()
            .args(["posts", "pg"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Network error"));

        // The session was released on the error path: store written, lock free.
        assert_eq!(sandbox.read_store(), serde_json::json!({"__version__": 0}));
        assert!(matches!(
            DirLock::try_acquire(&sandbox.cache_dir()).unwrap(),
            TryLock::Acquired(_)
        ));
    }

    #[test]
    fn second_process_waits_for_lock() {
        let sandbox = Sandbox::new();
        sandbox.write_store(r#"{"__version__": 0, "k": 1}"#);

        let holder = match DirLock::try_acquire(&sandbox.cache_dir()).unwrap() {
            TryLock::Acquired(lock) => lock,
            TryLock::Contended(_) => panic!("cache dir unexpectedly locked"),
        };

        let mut child = std::process::Command::new(env!("CARGO_BIN_EXE_hnposts"))
            .envs(sandbox.env_vars())
            .args(["cache", "show", "k"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        thread::sleep(Duration::from_millis(500));
        assert!(
            child.try_wait().unwrap().is_none(),
            "process finished while the cache was locked"
        );

        drop(holder);
        let output = child.wait_with_output().unwrap();
        assert!(output.status.success());

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert_eq!(stderr.matches("Waiting:").count(), 1);
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1");
    }
}
