//! Integration tests for fscache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    /// Command pinned to a temp cache root and a temp settings file
    fn fscache(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("fscache");
        cmd.env_remove("FSCACHE_ROOT")
            .env_remove("FSCACHE_CONFIG")
            .arg("--root")
            .arg(temp.path().join("cache"))
            .arg("--config")
            .arg(temp.path().join("settings.toml"));
        cmd
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("fscache")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Namespaced key/value cache"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("fscache")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("fscache"));
    }

    #[test]
    fn init_creates_marker() {
        let temp = TempDir::new().unwrap();
        fscache(&temp)
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("Cache ready"));

        let marker = fs::read_to_string(temp.path().join("cache").join("config")).unwrap();
        assert_eq!(marker.trim(), "version = 1");
    }

    #[test]
    fn put_then_get_roundtrip() {
        let temp = TempDir::new().unwrap();
        fscache(&temp)
            .args(["put", "greeting", "-n", "demo"])
            .write_stdin("hello world")
            .assert()
            .success()
            .stdout(predicate::str::contains("Stored 11 bytes"));

        fscache(&temp)
            .args(["get", "greeting", "-n", "demo"])
            .assert()
            .success()
            .stdout("hello world");
    }

    #[test]
    fn put_from_file_and_raw_stream() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("input.bin");
        fs::write(&input, b"abc").unwrap();

        fscache(&temp)
            .args(["put", "k", "-s", "log", "-i"])
            .arg(&input)
            .assert()
            .success();
        fscache(&temp)
            .args(["put", "k", "-s", "log", "--append"])
            .write_stdin("def")
            .assert()
            .success();

        fscache(&temp)
            .args(["get", "k", "-s", "log"])
            .assert()
            .success()
            .stdout("abcdef");
        assert!(temp
            .path()
            .join("cache")
            .join("__default__")
            .join("k")
            .join("log")
            .is_file());
    }

    #[test]
    fn get_metadata_json() {
        let temp = TempDir::new().unwrap();
        fscache(&temp)
            .args(["put", "k"])
            .write_stdin("12345")
            .assert()
            .success();

        fscache(&temp)
            .args(["get", "k", "--metadata"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"size\": 5"));
    }

    #[test]
    fn get_missing_key_fails() {
        let temp = TempDir::new().unwrap();
        fscache(&temp)
            .args(["get", "nope"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Key not found"));
    }

    #[test]
    fn namespaces_and_keys_listing() {
        let temp = TempDir::new().unwrap();
        for (ns, key) in [("beta", "b"), ("alpha", "a"), ("alpha", "c")] {
            fscache(&temp)
                .args(["put", key, "-n", ns])
                .write_stdin("x")
                .assert()
                .success();
        }

        fscache(&temp)
            .args(["namespaces", "--format", "plain"])
            .assert()
            .success()
            .stdout("alpha\nbeta\n");

        fscache(&temp)
            .args(["keys", "-n", "alpha", "--format", "plain"])
            .assert()
            .success()
            .stdout("a\nc\n");

        fscache(&temp)
            .args(["keys", "-n", "alpha"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Total: 2 key(s)"));
    }

    #[test]
    fn rm_key_and_namespace() {
        let temp = TempDir::new().unwrap();
        for key in ["a", "b"] {
            fscache(&temp)
                .args(["put", key, "-n", "ns"])
                .write_stdin("x")
                .assert()
                .success();
        }

        fscache(&temp)
            .args(["rm", "a", "-n", "ns"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed key ns/a"));
        fscache(&temp)
            .args(["keys", "-n", "ns", "-f", "plain"])
            .assert()
            .success()
            .stdout("b\n");

        fscache(&temp)
            .args(["rm", "-n", "ns"])
            .assert()
            .success();
        fscache(&temp)
            .args(["namespaces", "-f", "plain"])
            .assert()
            .success()
            .stdout("");
    }

    #[test]
    fn rm_missing_key_fails() {
        let temp = TempDir::new().unwrap();
        fscache(&temp).args(["rm", "ghost"]).assert().failure();
    }

    #[test]
    fn clear_requires_confirmation() {
        let temp = TempDir::new().unwrap();
        fscache(&temp)
            .args(["put", "k", "-n", "ns"])
            .write_stdin("x")
            .assert()
            .success();

        fscache(&temp)
            .arg("clear")
            .assert()
            .success()
            .stdout(predicate::str::contains("--yes"));
        assert!(temp.path().join("cache").join("ns").is_dir());

        fscache(&temp)
            .args(["clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed 1 namespace(s)"));
        assert!(!temp.path().join("cache").join("ns").exists());
        assert!(temp.path().join("cache").join("config").is_file());
    }

    #[test]
    fn info_json() {
        let temp = TempDir::new().unwrap();
        fscache(&temp)
            .args(["info", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"version\": 1"));
    }

    #[test]
    fn corrupt_cache_reports_hint() {
        let temp = TempDir::new().unwrap();
        fscache(&temp).arg("init").assert().success();
        fs::write(temp.path().join("cache").join("config"), "version = [").unwrap();

        fscache(&temp)
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("corrupt configuration"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn non_empty_root_is_refused() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("cache");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("notes.txt"), "keep").unwrap();

        fscache(&temp)
            .args(["namespaces"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("needs to be initialised"));
        assert!(!root.join("config").exists());
    }

    #[test]
    fn file_as_root_is_refused() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("cache");
        fs::write(&root, "plain file").unwrap();

        fscache(&temp)
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("is not a directory"))
            .stderr(predicate::str::contains("Hint:"));
        assert_eq!(fs::read_to_string(&root).unwrap(), "plain file");
    }

    #[test]
    fn invalid_settings_are_reported() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("settings.toml"),
            "[general]\nlog_format = \"xml\"\n",
        )
        .unwrap();

        fscache(&temp)
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("log_format"));
    }

    #[test]
    fn invalid_namespace_rejected() {
        let temp = TempDir::new().unwrap();
        fscache(&temp)
            .args(["put", "k", "-n", "config"])
            .write_stdin("x")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid namespace name"));
    }

    #[test]
    fn settings_namespace_is_default() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("settings.toml"),
            "[cache]\nnamespace = \"builds\"\n",
        )
        .unwrap();

        fscache(&temp)
            .args(["put", "k"])
            .write_stdin("x")
            .assert()
            .success();
        assert!(temp.path().join("cache").join("builds").join("k").is_dir());
    }

    #[test]
    fn config_path_and_show() {
        let temp = TempDir::new().unwrap();
        fscache(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("settings.toml"));

        fscache(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"));
    }

    #[test]
    fn config_init_writes_defaults() {
        let temp = TempDir::new().unwrap();
        fscache(&temp).args(["config", "init"]).assert().success();
        assert!(fs::read_to_string(temp.path().join("settings.toml"))
            .unwrap()
            .contains("log_format"));

        fscache(&temp)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--force"));
    }
}

mod cache_tests {
    use fscache::cache::{CacheBackend, DEFAULT_NAMESPACE};
    use fscache::{Cache, CacheError, FileSystemClient, MemoryFsClient, OpenMode};
    use std::io::{Read, Write};
    use tempfile::TempDir;

    fn root(temp: &TempDir) -> String {
        temp.path().join("cache").to_string_lossy().into_owned()
    }

    #[test]
    fn reopening_keeps_configuration() {
        let temp = TempDir::new().unwrap();
        let first = Cache::local(root(&temp)).unwrap();
        let marker = std::fs::read(temp.path().join("cache").join("config")).unwrap();

        let second = Cache::local(root(&temp)).unwrap();
        assert_eq!(first.backend().config(), second.backend().config());
        assert_eq!(
            std::fs::read(temp.path().join("cache").join("config")).unwrap(),
            marker
        );
    }

    #[test]
    fn corrupt_marker_is_not_reinitialized() {
        let temp = TempDir::new().unwrap();
        Cache::local(root(&temp)).unwrap();
        std::fs::write(temp.path().join("cache").join("config"), "::: not toml").unwrap();

        let err = Cache::local(root(&temp)).unwrap_err();
        assert!(matches!(err, CacheError::CorruptCache { .. }));
        assert_eq!(
            std::fs::read_to_string(temp.path().join("cache").join("config")).unwrap(),
            "::: not toml"
        );
    }

    #[test]
    fn stream_roundtrip_through_public_api() {
        let temp = TempDir::new().unwrap();
        let cache = Cache::local(root(&temp)).unwrap();

        let payload: Vec<u8> = (0..=255).collect();
        let mut fh = cache
            .open_stream("blob", Some("bin"), "payload", OpenMode::WRITE_BINARY, true)
            .unwrap();
        fh.write_all(&payload).unwrap();
        drop(fh);

        let mut read_back = Vec::new();
        cache
            .open_stream("blob", Some("bin"), "payload", OpenMode::READ_BINARY, false)
            .unwrap()
            .read_to_end(&mut read_back)
            .unwrap();
        assert_eq!(read_back, payload);
    }

    #[test]
    fn create_false_never_creates() {
        let temp = TempDir::new().unwrap();
        let cache = Cache::local(root(&temp)).unwrap();

        let err = cache
            .open_stream("ghost", None, "data", OpenMode::WRITE, false)
            .err()
            .unwrap();
        assert!(err.is_not_found());
        assert!(!cache.has_key("ghost", None).unwrap());
        assert!(!temp.path().join("cache").join(DEFAULT_NAMESPACE).exists());
    }

    #[test]
    fn memory_backend_is_interchangeable() {
        let fs = MemoryFsClient::new();
        let cache = Cache::filesystem("/srv/cache", fs.clone()).unwrap();
        cache.set("k", b"v", Some("ns")).unwrap();

        assert!(fs.exists("/srv/cache/config").unwrap());
        assert!(fs.isdir("/srv/cache/ns/k").unwrap());

        let reopened = Cache::filesystem("/srv/cache", fs).unwrap();
        assert_eq!(reopened.get("k", Some("ns")).unwrap(), b"v");
        assert!(reopened.backend().is_connected());
    }
}
