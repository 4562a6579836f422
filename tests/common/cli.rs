use assert_cmd::Command;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};
use tempfile::TempDir;

#[derive(Debug)]
pub struct RmapRun {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
    pub duration: Duration,
    pub log_path: PathBuf,
}

pub struct RmapWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub log_dir: PathBuf,
}

impl RmapWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        let log_dir = root.join("logs");
        fs::create_dir_all(&log_dir).expect("log dir");
        Self {
            temp_dir,
            root,
            log_dir,
        }
    }

    /// Write a file relative to the workspace root and return its path.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, contents).expect("write file");
        path
    }

    /// Persisted map text for a target in the default store.
    pub fn stored_map(&self, target: &str) -> Option<String> {
        fs::read_to_string(
            self.root
                .join(".redirect-maps")
                .join(target)
                .join("redirectmap.txt"),
        )
        .ok()
    }
}

pub fn run_rmap<I, S>(workspace: &RmapWorkspace, args: I, label: &str) -> RmapRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_rmap_with_env(
        workspace,
        args,
        std::iter::empty::<(String, String)>(),
        label,
    )
}

pub fn run_rmap_with_env<I, S, E, K, V>(
    workspace: &RmapWorkspace,
    args: I,
    env_vars: E,
    label: &str,
) -> RmapRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rmap"));
    cmd.current_dir(&workspace.root);
    cmd.args(args);
    cmd.env_remove("RMAP_DIR");
    cmd.env_remove("RMAP_ACTOR");
    cmd.envs(env_vars);
    cmd.env("NO_COLOR", "1");
    cmd.env("RUST_LOG", "redirect_maps=debug");
    cmd.env("RUST_BACKTRACE", "1");
    cmd.env("HOME", &workspace.root);
    cmd.env("USER", "test-user");

    let start = Instant::now();
    let output = cmd.output().expect("run rmap");
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let log_path = workspace.log_dir.join(format!("{label}.log"));
    let timestamp = SystemTime::now();
    let log_body = format!(
        "label: {label}\nstarted: {:?}\nduration: {:?}\nstatus: {}\nargs: {:?}\ncwd: {}\n\nstdout:\n{}\n\nstderr:\n{}\n",
        timestamp,
        duration,
        output.status,
        cmd.get_args().collect::<Vec<_>>(),
        workspace.root.display(),
        stdout,
        stderr
    );
    fs::write(&log_path, log_body).expect("write log");

    RmapRun {
        stdout,
        stderr,
        status: output.status,
        duration,
        log_path,
    }
}
