//! Runs the solver binary on the instances in `tests/instances`.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::fs::File;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;
use std::time::Duration;

use wait_timeout::ChildExt;

const TEST_TIMEOUT: Duration = Duration::from_secs(60);

/// What a run of the solver printed, without the log lines.
#[derive(Debug)]
pub(crate) struct Output {
    pub(crate) success: bool,
    pub(crate) lines: Vec<String>,
}

impl Output {
    /// The schedules which were printed, each as the lines before its separator.
    pub(crate) fn schedules(&self) -> Vec<Vec<String>> {
        let mut schedules = vec![];
        let mut current = vec![];
        for line in self.lines.iter() {
            if line == "----------" {
                schedules.push(std::mem::take(&mut current));
            } else {
                current.push(line.clone());
            }
        }
        schedules
    }

    pub(crate) fn last_line(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }
}

pub(crate) fn instance_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("instances")
        .join(name)
}

/// Runs the solver on `instance`; `prefix` keeps the log files of concurrent runs apart.
pub(crate) fn run_solver(instance: &str, args: &[&str], prefix: &str) -> Output {
    let instance_path = instance_path(instance);
    let log_file_path = instance_path.with_extension(format!("{prefix}.log"));
    let err_file_path = instance_path.with_extension(format!("{prefix}.err"));

    let mut child = Command::new(env!("CARGO_BIN_EXE_migsched-solver"))
        .args(args)
        .arg(&instance_path)
        .stdout(File::create(&log_file_path).expect("Failed to create log file."))
        .stderr(File::create(&err_file_path).expect("Failed to create error file."))
        .stdin(Stdio::null())
        .spawn()
        .expect("Failed to run solver.");

    let status = match child.wait_timeout(TEST_TIMEOUT) {
        Ok(None) => panic!("solver took more than {} seconds", TEST_TIMEOUT.as_secs()),
        Ok(Some(status)) => status,
        Err(e) => panic!("error starting solver: {e}"),
    };

    let log = std::fs::read_to_string(&log_file_path).expect("Failed to read log file.");
    std::fs::remove_file(log_file_path).expect("Failed to remove log file.");
    std::fs::remove_file(err_file_path).expect("Failed to remove error file.");

    Output {
        success: status.success(),
        lines: log
            .lines()
            .filter(|line| !line.starts_with('%'))
            .map(str::to_owned)
            .collect(),
    }
}
