use crate::error::{Result, UpsError};
use crate::types::{PackageCheck, PackageEntry};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Semaphore;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_JOBS: usize = 4;

/// Runs check-scripts and captures the version they print
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    timeout: Duration,
    jobs: usize,
}

impl Default for ScriptRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_JOBS)
    }
}

impl ScriptRunner {
    pub fn new(timeout: Duration, jobs: usize) -> Self {
        Self {
            timeout,
            jobs: jobs.max(1),
        }
    }

    /// Run a single script and return its trimmed standard output.
    ///
    /// The script runs without arguments from its own directory. Empty output
    /// means the script could not tell a version and yields `None`.
    pub async fn run(&self, script_path: &Path) -> Result<Option<String>> {
        tracing::debug!("running {}", script_path.display());

        let mut command = Command::new(script_path);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = script_path
            .parent()
            .filter(|_| script_path.is_absolute())
        {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| UpsError::Spawn {
            path: script_path.to_path_buf(),
            source,
        })?;

        // Dropping the pending future on timeout kills the child
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| UpsError::Timeout {
                path: script_path.to_path_buf(),
                timeout: self.timeout,
            })?
            .map_err(|source| UpsError::Spawn {
                path: script_path.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            return Err(UpsError::ScriptFailed {
                path: script_path.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| UpsError::InvalidOutput {
            path: script_path.to_path_buf(),
        })?;

        let value = stdout.trim();
        tracing::debug!("{} printed {value:?}", script_path.display());

        Ok((!value.is_empty()).then(|| value.to_string()))
    }

    /// Run the scripts of all `entries`, at most `jobs` at a time.
    ///
    /// Results come back in the order of `entries`. A failing script is
    /// reported in its own [`PackageCheck`] and never stops the others.
    pub async fn run_all<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a PackageEntry>,
        progress_callback: impl Fn(usize, usize) + Send + Sync + 'static,
    ) -> Vec<PackageCheck> {
        let jobs: Vec<(String, PathBuf)> = entries
            .into_iter()
            .map(|entry| (entry.name.clone(), entry.script_path.clone()))
            .collect();

        let total = jobs.len();
        let progress_callback = Arc::new(progress_callback);
        let semaphore = Arc::new(Semaphore::new(self.jobs));
        let done = Arc::new(std::sync::atomic::AtomicUsize::new(0));

        let mut tasks = Vec::with_capacity(total);

        for (name, script_path) in jobs {
            let runner = self.clone();
            let callback = Arc::clone(&progress_callback);
            let semaphore = Arc::clone(&semaphore);
            let done = Arc::clone(&done);

            let task = tokio::spawn(async move {
                // The semaphore is never closed
                let _permit = semaphore.acquire_owned().await.ok();

                let result = runner.run(&script_path).await;
                if let Err(e) = &result {
                    tracing::warn!("check for {name} failed: {e}");
                }

                let finished = done.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
                callback(finished, total);

                PackageCheck { name, result }
            });

            tasks.push(task);
        }

        let mut checks = Vec::with_capacity(total);
        for task in tasks {
            match task.await {
                Ok(check) => checks.push(check),
                Err(e) => tracing::error!("check task failed: {e}"),
            }
        }

        checks
    }
}
