use buildlog_core::{Database, JobId, Severity};
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

struct CliTestEnv {
    temp_dir: TempDir,
    home: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            temp_dir,
            home,
            xdg_data,
            xdg_config,
            xdg_state,
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    fn write_config(&self, content: &str) {
        let dir = self.xdg_config.join("buildlog");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), content).expect("failed to write config");
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(PathBuf::from(assert_cmd::cargo::cargo_bin!("buildlog")));
        command
            .args(args)
            .env("HOME", &self.home)
            .env("XDG_DATA_HOME", &self.xdg_data)
            .env("XDG_CONFIG_HOME", &self.xdg_config)
            .env("XDG_STATE_HOME", &self.xdg_state)
            .env_remove("RUST_LOG");
        command
    }

    fn run<I, S>(&self, args: I) -> Output
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.command(args)
            .output()
            .unwrap_or_else(|e| panic!("failed to execute buildlog: {e}"))
    }

    fn run_with_stdin<I, S>(&self, args: I, stdin: &[u8]) -> Output
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap_or_else(|e| panic!("failed to spawn buildlog: {e}"));
        child
            .stdin
            .take()
            .expect("stdin is piped")
            .write_all(stdin)
            .expect("failed to write stdin");
        child.wait_with_output().expect("failed to wait for buildlog")
    }
}

fn assert_success(output: &Output) {
    if output.status.success() {
        return;
    }
    panic!(
        "buildlog failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

#[test]
fn message_reaches_every_sink() {
    let env = CliTestEnv::new();
    let log_file = env.path("build.log");
    let db_path = env.path("logs.db");

    let output = env.run([
        "--severity",
        "warn",
        "--job",
        "job-42",
        "--log-file",
        path_arg(&log_file).as_str(),
        "--db",
        path_arg(&db_path).as_str(),
        "disk",
        "low",
    ]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[WARNING] "), "stdout was:\n{stdout}");
    assert!(stdout.contains("disk low"));

    let file_lines = lines(&log_file);
    assert_eq!(file_lines.len(), 1);
    assert!(file_lines[0].ends_with(" WARN] disk low"));

    let db = Database::open(&db_path).expect("failed to open db");
    let rows = db.logs_for_job(&JobId::new("job-42")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].severity, Severity::Warn);
    assert_eq!(rows[0].message, "disk low");
}

#[test]
fn stdin_lines_are_stored_in_order() {
    let env = CliTestEnv::new();
    let db_path = env.path("logs.db");

    let output = env.run_with_stdin(
        ["--no-terminal", "--job", "job-stdin", "--db", path_arg(&db_path).as_str()],
        b"fetching\ncompiling\nlinking\n",
    );
    assert_success(&output);
    assert!(output.stdout.is_empty());

    let db = Database::open(&db_path).expect("failed to open db");
    let messages: Vec<_> = db
        .logs_for_job(&JobId::new("job-stdin"))
        .unwrap()
        .into_iter()
        .map(|r| r.message)
        .collect();
    assert_eq!(messages, vec!["fetching", "compiling", "linking"]);
}

#[test]
fn invalid_utf8_on_stdin_does_not_stop_later_lines() {
    let env = CliTestEnv::new();
    let db_path = env.path("logs.db");

    let output = env.run_with_stdin(
        ["--no-terminal", "--job", "job-bytes", "--db", path_arg(&db_path).as_str()],
        b"first\n\xff\xfe bad\r\nthird\n",
    );
    assert_success(&output);

    let db = Database::open(&db_path).expect("failed to open db");
    let messages: Vec<_> = db
        .logs_for_job(&JobId::new("job-bytes"))
        .unwrap()
        .into_iter()
        .map(|r| r.message)
        .collect();
    assert_eq!(messages, vec!["first", "\u{FFFD}\u{FFFD} bad", "third"]);
}

#[test]
fn debug_hidden_at_default_verbosity() {
    let env = CliTestEnv::new();

    let output = env.run(["--severity", "debug", "cache hit"]);
    assert_success(&output);
    assert!(output.stdout.is_empty());

    let output = env.run(["--severity", "debug", "--verbosity", "verbose", "cache hit"]);
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("cache hit"));
}

#[test]
fn unwritable_log_file_is_reported_not_fatal() {
    let env = CliTestEnv::new();
    // A directory cannot be appended to
    let target = env.path("xdg-state");

    let output = env.run([
        "--severity",
        "error",
        "--no-terminal",
        "--log-file",
        path_arg(&target).as_str(),
        "db down",
    ]);
    assert_success(&output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    let diagnostics: Vec<_> = stderr
        .lines()
        .filter(|l| l.starts_with("failed to write log file"))
        .collect();
    assert_eq!(diagnostics.len(), 1, "stderr was:\n{stderr}");
    assert!(diagnostics[0].contains(path_arg(&target).as_str()));
}

#[test]
fn uncreatable_log_directory_keeps_other_sinks_running() {
    let env = CliTestEnv::new();
    let blocker = env.path("blocker");
    fs::write(&blocker, "not a directory").expect("failed to write blocker");
    let log_file = blocker.join("sub").join("build.log");
    let db_path = env.path("logs.db");

    let output = env.run([
        "--job",
        "job-blocked",
        "--log-file",
        path_arg(&log_file).as_str(),
        "--db",
        path_arg(&db_path).as_str(),
        "build ok",
    ]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("build ok"), "stdout was:\n{stdout}");

    let stderr = String::from_utf8_lossy(&output.stderr);
    let diagnostics = stderr
        .lines()
        .filter(|l| l.starts_with("failed to write log file"))
        .count();
    assert_eq!(diagnostics, 1, "stderr was:\n{stderr}");

    let db = Database::open(&db_path).expect("failed to open db");
    assert_eq!(db.count_logs_for_job(&JobId::new("job-blocked")).unwrap(), 1);
}

#[test]
fn config_enables_file_sink() {
    let env = CliTestEnv::new();
    let log_file = env.path("configured.log");
    env.write_config(&format!(
        r#"
[terminal]
verbosity = "quiet"

[file]
enabled = true
verbosity = "verbose"
path = "{}"
"#,
        log_file.display()
    ));

    let output = env.run(["--severity", "debug", "resolving"]);
    assert_success(&output);
    assert!(output.stdout.is_empty());

    let file_lines = lines(&log_file);
    assert_eq!(file_lines.len(), 1);
    assert!(file_lines[0].ends_with(" DEBUG] resolving"));
}

#[test]
fn default_file_path_is_xdg_state() {
    let env = CliTestEnv::new();
    env.write_config(
        r#"
[file]
enabled = true
"#,
    );

    let output = env.run(["build ok"]);
    assert_success(&output);

    let default_log = env.xdg_state.join("buildlog").join("buildlog.log");
    let file_lines = lines(&default_log);
    assert_eq!(file_lines.len(), 1);
    assert!(file_lines[0].ends_with(" INFO] build ok"));
}

#[test]
fn invalid_severity_is_rejected() {
    let env = CliTestEnv::new();
    let output = env.run(["--severity", "fatal", "boom"]);
    assert!(!output.status.success());
}
