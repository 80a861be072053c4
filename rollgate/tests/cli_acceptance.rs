//! CLI acceptance tests
//!
//! Each test runs the real binary in an XDG-sandboxed environment so the
//! user's own config and state directories are never touched. Everything
//! here uses --dry-run; wire behavior is covered by rollgate-core's
//! integration tests.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
        }
    }

    fn write_config(&self, contents: &str) -> PathBuf {
        let dir = self.xdg_config.join("rollgate");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        let path = dir.join("config.toml");
        fs::write(&path, contents).expect("failed to write config");
        path
    }
}

fn run_with_stdin(env: &CliTestEnv, args: &[&str], stdin: &str) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("rollgate"));

    let mut command = Command::new(bin_path);
    command
        .args(args)
        .env_clear()
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().expect("failed to spawn rollgate");
    // Ignore write errors: a process that fails at startup may close the
    // pipe before reading any input.
    let _ = child
        .stdin
        .as_mut()
        .expect("missing stdin handle")
        .write_all(stdin.as_bytes());
    drop(child.stdin.take());

    child.wait_with_output().expect("failed to wait for rollgate")
}

const CONFIG: &str = r#"
[rollbar]
access_token = "T"
environment = "staging"
"#;

#[test]
fn dry_run_prints_one_item_per_event() {
    let env = CliTestEnv::new();
    env.write_config(CONFIG);

    let output = run_with_stdin(
        &env,
        &["--dry-run"],
        "{\"message\":\"boom\",\"timestamp\":1700000000}\n{\"message\":\"bang\",\"timestamp\":1700000001}\n",
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).expect("stdout must be UTF-8");
    let items: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each output line must be JSON"))
        .collect();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["access_token"], "T");
    assert_eq!(items[0]["data"]["environment"], "staging");
    assert_eq!(items[0]["data"]["timestamp"], 1700000000);
    assert_eq!(items[0]["data"]["body"]["message"]["body"], "boom");
    assert_eq!(items[1]["data"]["body"]["message"]["body"], "bang");
}

#[test]
fn dry_run_applies_event_overrides() {
    let env = CliTestEnv::new();
    env.write_config(CONFIG);

    let output = run_with_stdin(
        &env,
        &["--dry-run"],
        "{\"message\":\"boom\",\"rollbar\":{\"level\":\"critical\"}}\n",
    );

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout must be UTF-8");
    let item: serde_json::Value =
        serde_json::from_str(stdout.lines().next().expect("one output line")).unwrap();
    assert_eq!(item["data"]["level"], "critical");
    // The rollbar mapping is consumed, not forwarded as custom data
    assert_eq!(item["data"]["body"]["custom"], serde_json::json!({"message": "boom"}));
}

#[test]
fn bad_lines_are_skipped_without_aborting() {
    let env = CliTestEnv::new();
    env.write_config(CONFIG);

    let output = run_with_stdin(
        &env,
        &["--dry-run"],
        "not json\n\n{\"message\":\"boom\"}\n[1,2,3]\n",
    );

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout must be UTF-8");
    assert_eq!(stdout.lines().count(), 1);
}

#[test]
fn missing_access_token_is_fatal() {
    let env = CliTestEnv::new();
    env.write_config("[rollbar]\nenvironment = \"staging\"\n");

    let output = run_with_stdin(&env, &["--dry-run"], "{\"message\":\"boom\"}\n");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("access_token"), "stderr: {}", stderr);
}

#[test]
fn explicit_config_path_is_honored() {
    let env = CliTestEnv::new();
    let config_path = env._temp_dir.path().join("custom.toml");
    fs::write(&config_path, CONFIG).expect("failed to write custom config");

    let output = run_with_stdin(
        &env,
        &["--dry-run", "--config", config_path.to_str().unwrap()],
        "{\"message\":\"boom\"}\n",
    );

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout must be UTF-8");
    let item: serde_json::Value =
        serde_json::from_str(stdout.lines().next().expect("one output line")).unwrap();
    assert_eq!(item["access_token"], "T");
}
