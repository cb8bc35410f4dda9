//! Sequential plan execution.
//!
//! Steps run strictly in order; no step starts until the previous one has
//! exited. A failed required step halts the plan immediately, a failed
//! optional step is reported and execution continues.

use colored::Colorize;

use crate::engine::planner::{Plan, Policy, Step};
use crate::error::ProvisionError;
use crate::progress;
use crate::runner;
use crate::ui;

/// Options for execution
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Don't run anything, just show the commands
    pub dry_run: bool,
    /// Stream child output to the terminal instead of capturing it
    pub stream: bool,
}

/// Summary of execution results
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExecuteSummary {
    pub completed: usize,
    /// Optional steps that failed
    pub warnings: usize,
    /// Steps shown but not run (dry run)
    pub skipped: usize,
}

enum Outcome {
    Success,
    Failed { code: Option<i32>, stderr: String },
}

/// Execute the plan.
pub fn execute(plan: &Plan, opts: &ExecuteOptions) -> Result<ExecuteSummary, ProvisionError> {
    let total = plan.len();
    let mut summary = ExecuteSummary::default();

    for (idx, step) in plan.steps().iter().enumerate() {
        ui::step(idx + 1, total, &step.name);

        if opts.dry_run {
            ui::command(&step.display_command());
            summary.skipped += 1;
            continue;
        }

        match run_step(step, opts.stream)? {
            Outcome::Success => summary.completed += 1,
            Outcome::Failed { code, stderr } => match step.policy {
                Policy::Optional => {
                    let code_label = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                    ui::warn(&format!(
                        "{} failed (exit {code_label}) - continuing",
                        step.name
                    ));
                    log::warn!("optional step `{}` failed: {}", step.name, stderr.trim());
                    summary.warnings += 1;
                }
                Policy::Required => {
                    let err = ProvisionError::from_step(step, code, stderr);
                    if let Some(captured) = err.captured_stderr() {
                        print_stderr_tail(captured);
                    }
                    return Err(err);
                }
            },
        }
    }

    Ok(summary)
}

/// Run a single step, capturing output unless streaming was requested.
fn run_step(step: &Step, stream: bool) -> Result<Outcome, ProvisionError> {
    log::debug!("running `{}` (cwd: {:?})", step.display_command(), step.cwd);

    if stream {
        let status = runner::run(&step.program, &step.args, step.cwd.as_deref())
            .map_err(|source| ProvisionError::spawn(step, source))?;
        if status.success() {
            Ok(Outcome::Success)
        } else {
            Ok(Outcome::Failed {
                code: status.code(),
                stderr: String::new(),
            })
        }
    } else {
        let pb = progress::spinner(&step.display_command());
        let result = runner::run_capture(&step.program, &step.args, step.cwd.as_deref());
        pb.finish_and_clear();

        let output = result.map_err(|source| ProvisionError::spawn(step, source))?;
        if output.status.success() {
            Ok(Outcome::Success)
        } else {
            Ok(Outcome::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}

/// Show the last lines of captured stderr so the underlying tool's failure
/// is visible without re-running under `-v`.
fn print_stderr_tail(stderr: &str) {
    const TAIL: usize = 15;

    let lines: Vec<&str> = stderr.lines().collect();
    if lines.is_empty() {
        return;
    }
    let start = lines.len().saturating_sub(TAIL);
    if start > 0 {
        println!("  {}", format!("... {start} earlier lines omitted").dimmed());
    }
    for line in &lines[start..] {
        println!("  {}", line.dimmed());
    }
}

/// Print final summary
pub fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.warnings == 0 {
        println!("  {} Provisioning complete!", "✓".green().bold());
    } else {
        println!(
            "  {} Provisioning complete with warnings",
            "⚠".yellow().bold()
        );
    }
    if summary.completed > 0 {
        println!("    • {} steps completed", summary.completed);
    }
    if summary.warnings > 0 {
        println!(
            "    • {} optional steps {}",
            summary.warnings,
            "failed".yellow()
        );
    }
    if summary.skipped > 0 {
        println!("    • {} steps skipped", summary.skipped);
    }
}

// ============================================================================
// Tests
// ============================================================================
