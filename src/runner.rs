use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Output, Stdio};

/// Run a command and inherit stdio (shows output in real-time)
pub fn run(program: &str, args: &[String], cwd: Option<&Path>) -> io::Result<ExitStatus> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd.status()
}

/// Run a command and capture stdout and stderr.
///
/// A non-zero exit is not an error here; the caller inspects the status so
/// it can decide between halting and warning.
pub fn run_capture(program: &str, args: &[String], cwd: Option<&Path>) -> io::Result<Output> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd.output()
}

/// Check if a command exists
pub fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
