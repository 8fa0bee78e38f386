// Runs the generator as a separate OS process so the HTTP handler can
// answer before the (slow, rate-limited) sheet writes are done.

use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use crate::core::jobs::{GeneratorLauncher, JobCompletion, LaunchError};

pub struct SubprocessLauncher {
    program: PathBuf,
    args: Vec<String>,
}

impl SubprocessLauncher {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Re-invoke this binary with `args` (normally the global options
    /// followed by `generate`).
    pub fn current_exe(args: Vec<String>) -> Result<Self, LaunchError> {
        let program = std::env::current_exe().map_err(LaunchError::Executable)?;
        Ok(Self::new(program, args))
    }
}

impl GeneratorLauncher for SubprocessLauncher {
    fn launch(&self) -> Result<JobCompletion, LaunchError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(LaunchError::Spawn)?;

        tracing::debug!(
            "Spawned {} (pid {:?})",
            self.program.display(),
            child.id()
        );

        Ok(Box::pin(async move {
            let status = child
                .wait()
                .await
                .map_err(|e| format!("failed to wait for generator: {}", e))?;
            if status.success() {
                Ok(())
            } else {
                Err(format!("generator exited with {}", status))
            }
        }))
    }
}
