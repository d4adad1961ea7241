//! Make subprocess runner backed by `tokio::process::Command`.

use crate::error::EvaluatorError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// One `make -f <makefile> <target>` invocation
#[derive(Debug, Clone)]
pub struct MakeInvocation {
    pub makefile: PathBuf,
    pub target: String,
    pub working_directory: PathBuf,
}

/// Captured result of a successful run
#[derive(Debug, Clone)]
pub struct MakeOutput {
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

/// Runs an external Make-compatible tool
#[async_trait]
pub trait MakeRunner: Send + Sync {
    async fn run(&self, invocation: &MakeInvocation) -> Result<MakeOutput, EvaluatorError>;
}

/// Spawns a real Make process with a hard timeout.
pub struct ProcessMakeRunner {
    program: String,
    timeout: Duration,
}

impl ProcessMakeRunner {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl MakeRunner for ProcessMakeRunner {
    async fn run(&self, invocation: &MakeInvocation) -> Result<MakeOutput, EvaluatorError> {
        let start = Instant::now();

        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.arg("-f")
            .arg(&invocation.makefile)
            .arg(&invocation.target)
            .current_dir(&invocation.working_directory)
            // An enclosing make would otherwise leak its flags and directory banners.
            .env_remove("MAKEFLAGS")
            .env_remove("MAKELEVEL")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            program = %self.program,
            makefile = %invocation.makefile.display(),
            target = %invocation.target,
            "Spawning make"
        );

        let child = cmd.spawn().map_err(|e| EvaluatorError::Spawn {
            program: self.program.clone(),
            message: e.to_string(),
        })?;

        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| EvaluatorError::Spawn {
                program: self.program.clone(),
                message: format!("wait failed: {e}"),
            })?,
            Err(_) => {
                warn!(target = %invocation.target, timeout_ms, "make timed out");
                return Err(EvaluatorError::TimedOut { timeout_ms });
            }
        };

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let status = output.status.code().unwrap_or(-1);
            debug!(status, duration_ms, "make failed");
            return Err(EvaluatorError::Failed {
                status,
                stderr: stderr.trim_end().to_string(),
            });
        }

        debug!(duration_ms, "make completed");
        Ok(MakeOutput {
            stdout,
            stderr,
            duration_ms,
        })
    }
}
