//! Integration tests that drive the `firebase-deploy` binary against a fake Firebase CLI.

use rstest::rstest;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

const DELETION_PROMPT: &str = "? Would you like to proceed with deletion? Selecting no will continue the rest of the deployments. (y/N) ";
const RETRY_PROMPT: &str =
    "The following functions will newly be retried in case of failure: api(us-central1)";

fn firebase_deploy_bin() -> &'static str {
    env!("CARGO_BIN_EXE_firebase-deploy")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn unique_temp_path(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after epoch")
        .as_nanos();
    env::temp_dir().join(format!("firebase-deploy-it-{name}-{nanos}.{ext}"))
}

/// Shell script standing in for `firebase`, selected through `FIREBASE_DEPLOY_CMD`.
struct FakeFirebase {
    script: PathBuf,
    marker: PathBuf,
}

impl FakeFirebase {
    fn new(name: &str, body: &str) -> Self {
        let script = unique_temp_path(name, "sh");
        let marker = unique_temp_path(name, "ran");
        let marker_line = format!(": > '{}'\n", marker.display());
        fs::write(&script, format!("{marker_line}{body}")).expect("write fake firebase");
        Self { script, marker }
    }

    fn command_string(&self) -> String {
        format!("sh '{}'", self.script.display())
    }

    fn ran(&self) -> bool {
        self.marker.exists()
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(firebase_deploy_bin())
            .args(args)
            .env("FIREBASE_DEPLOY_CMD", self.command_string())
            .output()
            .expect("run firebase-deploy")
    }
}

impl Drop for FakeFirebase {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.script);
        let _ = fs::remove_file(&self.marker);
    }
}

fn prompting_script(exit_code: i32) -> String {
    format!(
        "printf '%s' '{DELETION_PROMPT}'\nread answer\necho \"deletion=$answer\"\nprintf '%s\\n' '{RETRY_PROMPT}'\nread answer\necho \"retry=$answer\"\nexit {exit_code}\n"
    )
}

#[test]
fn help_lists_prompt_flags() {
    let output = Command::new(firebase_deploy_bin())
        .arg("--help")
        .output()
        .expect("run firebase-deploy --help");
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("--confirm-on-deletion"));
    assert!(stdout.contains("--no-confirm-on-retry-failure"));
}

#[test]
fn version_flag_prints_package_version() {
    let output = Command::new(firebase_deploy_bin())
        .arg("--version")
        .output()
        .expect("run firebase-deploy --version");
    assert!(output.status.success());
    assert!(stdout_of(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[cfg(unix)]
#[rstest]
#[case(&["--non-interactive"], "--non-interactive is not supported.")]
#[case(&["-f"], "-f/--force is not supported.")]
#[case(&["--confirm-on-deletion", "--force", "--only", "functions"], "-f/--force is not supported.")]
fn disallowed_flags_exit_before_spawning(#[case] args: &[&str], #[case] message: &str) {
    let fake = FakeFirebase::new("rejected", "exit 0\n");
    let output = fake.run(args);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains(message));
    assert!(!fake.ran(), "firebase must not be spawned");
}

#[cfg(unix)]
#[test]
fn fully_answered_run_exits_zero() {
    let fake = FakeFirebase::new("answered", &prompting_script(0));
    let output = fake.run(&["--confirm-on-deletion", "--no-confirm-on-retry-failure"]);
    let stdout = stdout_of(&output);
    assert_eq!(output.status.code(), Some(0), "stdout: {stdout}");
    assert!(stdout.contains(DELETION_PROMPT));
    assert!(stdout.contains("deletion=y\n"));
    assert!(stdout.contains("retry=n\n"));
    assert!(stdout.ends_with("process exited with code 0\n"));
}

#[cfg(unix)]
#[test]
fn missing_answer_names_both_flags_and_exits_without_waiting() {
    let body = format!(
        "printf '%s' '{DELETION_PROMPT}'\nread answer\necho \"deletion=$answer\"\nprintf '%s\\n' '{RETRY_PROMPT}'\nread answer\nsleep 30\n"
    );
    let fake = FakeFirebase::new("missing", &body);
    let started = Instant::now();
    let output = fake.run(&["--confirm-on-deletion"]);
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(output.status.code(), Some(1));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("deletion=y\n"));
    assert!(!stdout.contains("process exited with code"));
    let stderr = stderr_of(&output);
    assert!(stderr.contains(
        "Prompt 'The following functions will newly be retried in case of failure' was found but no response was provided."
    ));
    assert!(stderr
        .contains("Please provide either --confirm-on-retry-failure or --no-confirm-on-retry-failure"));
}

#[cfg(unix)]
#[rstest]
#[case(0)]
#[case(1)]
#[case(7)]
#[case(200)]
fn child_exit_code_becomes_wrapper_exit_code(#[case] code: i32) {
    let fake = FakeFirebase::new("exit", &format!("echo deploying\nexit {code}\n"));
    let output = fake.run(&[]);
    assert_eq!(output.status.code(), Some(code));
    assert!(stdout_of(&output).ends_with(&format!("process exited with code {code}\n")));
}

#[cfg(unix)]
#[test]
fn killed_child_maps_to_fallback_exit_code() {
    let fake = FakeFirebase::new("killed", "kill -9 $$\n");
    let output = fake.run(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).ends_with("process exited with code 1\n"));
}

#[cfg(unix)]
#[test]
fn repeated_wrapper_flags_still_answer_prompts() {
    let fake = FakeFirebase::new("repeated", &prompting_script(0));
    let output = fake.run(&[
        "--confirm-on-deletion",
        "--confirm-on-deletion",
        "--no-confirm-on-retry-failure",
        "--no-confirm-on-retry-failure",
    ]);
    let stdout = stdout_of(&output);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    assert!(stdout.contains("deletion=y\n"));
    assert!(stdout.contains("retry=n\n"));
}

#[cfg(unix)]
#[test]
fn passthrough_args_reach_firebase_in_order() {
    let fake = FakeFirebase::new("argv", "printf '%s|' \"$@\"\n");
    let output = fake.run(&[
        "--only",
        "functions",
        "--no-confirm-on-deletion",
        "--project",
        "demo",
    ]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_of(&output)
        .starts_with("deploy|--only|functions|--project|demo|--interactive|"));
}

#[cfg(unix)]
#[test]
fn child_stderr_is_relayed() {
    let fake = FakeFirebase::new("stderr", "echo 'Error: HTTP 403' >&2\nexit 2\n");
    let output = fake.run(&[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("Error: HTTP 403\n"));
}

#[test]
fn unknown_program_fails_with_wrapper_code() {
    let output = Command::new(firebase_deploy_bin())
        .env("FIREBASE_DEPLOY_CMD", "/nonexistent/firebase-deploy-it-bin")
        .output()
        .expect("run firebase-deploy");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("failed to start /nonexistent/firebase-deploy-it-bin"));
}
