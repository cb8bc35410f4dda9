//! Error taxonomy for provisioning failures.
//!
//! Each required stage maps to one variant so a failure names the external
//! tool that caused it. The failing tool's exit code is preserved and
//! becomes the process exit status.

use std::fmt;
use std::io;
use thiserror::Error;

use crate::engine::planner::{Stage, Step};

/// Exit status and captured stderr of a failed external command.
#[derive(Debug)]
pub struct StepFailure {
    /// Exit code of the external tool, if it exited normally
    pub code: Option<i32>,
    /// Captured stderr (empty when output was streamed to the terminal)
    pub stderr: String,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Fatal provisioning failures. All halt the plan; none are retried.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("package installation failed at `{step}` ({failure})")]
    PackageInstall { step: String, failure: StepFailure },

    #[error("source clone failed at `{step}` ({failure})")]
    Clone { step: String, failure: StepFailure },

    #[error("build configuration failed at `{step}` ({failure})")]
    Configure { step: String, failure: StepFailure },

    #[error("compilation failed at `{step}` ({failure})")]
    Compile { step: String, failure: StepFailure },

    /// The command could not be launched at all (usually: not installed)
    #[error("could not launch `{program}` for `{step}`")]
    Spawn {
        step: String,
        program: String,
        #[source]
        source: io::Error,
    },
}

impl ProvisionError {
    /// Classify a failed required step by its stage.
    pub fn from_step(step: &Step, code: Option<i32>, stderr: String) -> Self {
        let failure = StepFailure { code, stderr };
        let name = step.name.clone();
        match step.stage {
            Stage::Packages => Self::PackageInstall {
                step: name,
                failure,
            },
            Stage::Sources => Self::Clone {
                step: name,
                failure,
            },
            Stage::Configure => Self::Configure {
                step: name,
                failure,
            },
            Stage::Compile => Self::Compile {
                step: name,
                failure,
            },
        }
    }

    pub fn spawn(step: &Step, source: io::Error) -> Self {
        Self::Spawn {
            step: step.name.clone(),
            program: step.program.clone(),
            source,
        }
    }

    /// Stderr captured from the failed tool, when output was not streamed.
    pub fn captured_stderr(&self) -> Option<&str> {
        match self {
            Self::PackageInstall { failure, .. }
            | Self::Clone { failure, .. }
            | Self::Configure { failure, .. }
            | Self::Compile { failure, .. } => Some(&failure.stderr),
            Self::Spawn { .. } => None,
        }
    }

    /// Exit code to propagate to the calling shell: the failing tool's own
    /// code when it exited normally, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::PackageInstall { failure, .. }
            | Self::Clone { failure, .. }
            | Self::Configure { failure, .. }
            | Self::Compile { failure, .. } => failure.code.unwrap_or(1),
            Self::Spawn { .. } => 1,
        }
    }
}
