use assert_cmd::Command;
use checksum_test_utils::TestFileBuilder;
use predicates::prelude::*;
use std::fs;

const MD5_ABC: &str = "900150983cd24fb0d6963f7d28e17f72";
const SHA1_ABC: &str = "a9993e364706816aba3e25717850c26c9cd0d89d";
const SHA256_ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

/// Scratch directory with an isolated configuration home
struct Sandbox {
    files: TestFileBuilder,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            files: TestFileBuilder::new().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("checksum").unwrap();
        cmd.current_dir(self.files.dir())
            .env("XDG_CONFIG_HOME", self.files.path("config"))
            .env_remove("DEFAULT_ALGORITHMS")
            .env_remove("RUST_LOG");
        cmd
    }

    fn abc(&self) -> std::path::PathBuf {
        self.files.with_content("abc.txt", b"abc").unwrap()
    }
}

#[test]
fn test_version() {
    Sandbox::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_generate_prints_final_snapshot() {
    let sandbox = Sandbox::new();
    let path = sandbox.abc();

    sandbox
        .cmd()
        .arg("generate")
        .arg(&path)
        .args(["md5", "sha1", "sha256"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Size: 3.00 Bytes | 3 bytes"))
        .stdout(predicate::str::contains(format!("MD5: {MD5_ABC}")))
        .stdout(predicate::str::contains(format!("SHA1: {SHA1_ABC}")))
        .stdout(predicate::str::contains(format!("SHA256: {SHA256_ABC}")))
        .stdout(predicate::str::contains("Total Progress: 100.00%"))
        .stdout(predicate::str::contains("\x1b[").not());
}

#[test]
fn test_generate_accepts_comma_lists_in_any_case() {
    let sandbox = Sandbox::new();
    let path = sandbox.abc();

    sandbox
        .cmd()
        .arg("generate")
        .arg(&path)
        .arg("MD5,Sha1")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("MD5: {MD5_ABC}")))
        .stdout(predicate::str::contains(format!("SHA1: {SHA1_ABC}")));
}

#[test]
fn test_generate_json_keeps_request_order_for_every_strategy() {
    let sandbox = Sandbox::new();
    let (path, _) = sandbox.files.deterministic("data.bin", 200_000, 3).unwrap();

    let mut outputs = Vec::new();
    for strategy in ["sequential", "multiple", "parallel"] {
        let output = sandbox
            .cmd()
            .arg("generate")
            .arg(&path)
            .args(["sha512", "md5", "sha1"])
            .args(["--format", "json", "--strategy", strategy, "--chunk-size", "4096"])
            .output()
            .unwrap();
        assert!(output.status.success(), "{strategy} failed");

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["file_size"], 200_000);
        let algorithms: Vec<_> = value["digests"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["algorithm"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(algorithms, ["sha512", "md5", "sha1"]);
        outputs.push(value["digests"].clone());
    }

    // Same digests no matter how the passes were scheduled
    let digests = |v: &serde_json::Value| -> Vec<String> {
        v.as_array()
            .unwrap()
            .iter()
            .map(|d| d["digest"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(digests(&outputs[0]), digests(&outputs[1]));
    assert_eq!(digests(&outputs[0]), digests(&outputs[2]));
}

#[test]
fn test_generate_csv() {
    let sandbox = Sandbox::new();
    let path = sandbox.abc();

    sandbox
        .cmd()
        .arg("generate")
        .arg(&path)
        .args(["sha1", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("path,algorithm,digest,size,duration_ms"))
        .stdout(predicate::str::contains(format!(",sha1,{SHA1_ABC},3,")));
}

#[test]
fn test_invalid_algorithm_is_usage_error_without_progress() {
    let sandbox = Sandbox::new();
    let path = sandbox.abc();

    sandbox
        .cmd()
        .arg("generate")
        .arg(&path)
        .args(["md5", "sha3"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("sha3"))
        .stderr(predicate::str::contains("Progress").not());
}

#[test]
fn test_missing_file_is_filesystem_error() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["generate", "missing.iso", "md5"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("missing.iso"));
}

#[test]
fn test_directory_is_rejected() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["generate", ".", "md5"])
        .assert()
        .code(4);
}

#[test]
fn test_no_algorithms_without_terminal_is_usage_error() {
    let sandbox = Sandbox::new();
    let path = sandbox.abc();

    sandbox
        .cmd()
        .arg("generate")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("At least one hash algorithm"));
}

#[test]
fn test_default_algorithms_from_environment() {
    let sandbox = Sandbox::new();
    let path = sandbox.abc();

    sandbox
        .cmd()
        .env("DEFAULT_ALGORITHMS", "sha256, md5")
        .arg("generate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("SHA256: {SHA256_ABC}")))
        .stdout(predicate::str::contains(format!("MD5: {MD5_ABC}")));
}

#[test]
fn test_default_algorithms_from_project_file() {
    let sandbox = Sandbox::new();
    let path = sandbox.abc();
    sandbox
        .files
        .with_content(
            ".checksum.toml",
            b"[hashing]\ndefault_algorithms = [\"sha1\"]\n",
        )
        .unwrap();

    sandbox
        .cmd()
        .arg("generate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("SHA1: {SHA1_ABC}")))
        .stdout(predicate::str::contains("MD5").not());
}

#[test]
fn test_verify_match_ignores_case() {
    let sandbox = Sandbox::new();
    let path = sandbox.abc();

    sandbox
        .cmd()
        .arg("verify")
        .arg(&path)
        .arg(MD5_ABC.to_uppercase())
        .arg("md5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Checksum matches."));
}

#[test]
fn test_verify_mismatch_exits_non_zero() {
    let sandbox = Sandbox::new();
    let path = sandbox.abc();

    sandbox
        .cmd()
        .arg("verify")
        .arg(&path)
        .arg(&MD5_ABC[1..])
        .arg("md5")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Checksum does not match."))
        .stderr(predicate::str::contains(MD5_ABC));
}

#[test]
fn test_verify_json() {
    let sandbox = Sandbox::new();
    let path = sandbox.abc();

    let output = sandbox
        .cmd()
        .arg("verify")
        .arg(&path)
        .args([SHA1_ABC, "sha1", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["verification"]["matched"], true);
    assert_eq!(value["verification"]["computed"]["digest"], SHA1_ABC);
}

#[test]
fn test_verify_invalid_algorithm() {
    let sandbox = Sandbox::new();
    let path = sandbox.abc();

    sandbox
        .cmd()
        .arg("verify")
        .arg(&path)
        .args(["abc123", "crc32"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("crc32"));
}

#[test]
fn test_config_set_get_round_trip() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "set", "hashing.strategy", "Parallel"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["config", "get", "hashing.strategy"])
        .assert()
        .success()
        .stdout("parallel\n");

    let written = fs::read_to_string(sandbox.files.path("config/checksum/config.toml")).unwrap();
    assert!(written.contains("strategy = \"parallel\""));
}

#[test]
fn test_config_set_rejects_small_chunk_size() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "set", "hashing.chunk_size", "100"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("at least 1024"));
}

#[test]
fn test_small_chunk_size_rejected_from_flag_and_environment() {
    let sandbox = Sandbox::new();
    let path = sandbox.abc();

    sandbox
        .cmd()
        .arg("generate")
        .arg(&path)
        .args(["md5", "--chunk-size", "100"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("at least 1024"));

    sandbox
        .cmd()
        .env("CHECKSUM_HASHING__CHUNK_SIZE", "16")
        .arg("generate")
        .arg(&path)
        .arg("md5")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("at least 1024"));
}

#[test]
fn test_config_list_groups_sections() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[hashing]"))
        .stdout(predicate::str::contains("chunk_size = 65536"))
        .stdout(predicate::str::contains("[output]"));
}

#[test]
fn test_config_path() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("checksum/config.toml"));
}

#[test]
fn test_log_file_receives_records() {
    let sandbox = Sandbox::new();
    let path = sandbox.abc();
    let log = sandbox.files.path("logs/checksum.log");

    sandbox
        .cmd()
        .env("CHECKSUM_LOGGING__FILE", &log)
        .env("CHECKSUM_LOGGING__LEVEL", "debug")
        .arg("generate")
        .arg(&path)
        .arg("md5")
        .assert()
        .success();

    let contents = fs::read_to_string(&log).unwrap();
    assert!(contents.contains("[DEBUG]"));
}

#[test]
fn test_debug_output_keeps_console_when_logging_to_file() {
    let sandbox = Sandbox::new();
    let path = sandbox.abc();
    let log = sandbox.files.path("logs/checksum.log");

    sandbox
        .cmd()
        .env("CHECKSUM_LOGGING__FILE", &log)
        .args(["--debug", "generate"])
        .arg(&path)
        .arg("md5")
        .assert()
        .success()
        .stderr(predicate::str::contains("Debug logging enabled"));

    let contents = fs::read_to_string(&log).unwrap();
    assert!(contents.contains("[DEBUG]: Terminal capabilities"));
}

#[test]
fn test_completions() {
    Sandbox::new()
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("checksum"));
}
