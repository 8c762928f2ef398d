use std::path::Path;
use std::time::Duration;

/// Abstraction over pip execution for testability.
///
/// Production code uses [`RealPip`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait PipExecutor: Send + Sync {
    /// Install the packages listed in `manifest` into `target_dir`.
    async fn install(&self, manifest: &Path, target_dir: &Path) -> Result<(), InstallError>;
}

/// Real pip executor, shelling out to `python3 -m pip`.
pub struct RealPip {
    python: String,
}

impl RealPip {
    pub fn new() -> Self {
        Self {
            python: "python3".to_owned(),
        }
    }

    /// Use a specific Python interpreter instead of `python3`.
    pub fn with_python(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }
}

impl Default for RealPip {
    fn default() -> Self {
        Self::new()
    }
}

impl PipExecutor for RealPip {
    async fn install(&self, manifest: &Path, target_dir: &Path) -> Result<(), InstallError> {
        use std::process::Stdio;

        let output = tokio::process::Command::new(&self.python)
            .arg("-m")
            .arg("pip")
            .arg("install")
            .arg("-r")
            .arg(manifest)
            .arg("-t")
            .arg(target_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| InstallError::NotFound { source: e })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(InstallError::CommandFailed {
                code: output.status.code(),
                stderr,
            })
        }
    }
}

/// Timeout and retry bounds for the install step.
///
/// Package installation is the dominant failure mode of a bundle (network
/// fetches), so it gets a bounded timeout and a small retry; the copy steps
/// run exactly once.
#[derive(Debug, Clone)]
pub struct InstallPolicy {
    /// Wall-clock bound for a single install attempt.
    pub timeout: Duration,
    /// Total attempts, including the first. Must be at least 1.
    pub attempts: u32,
}

impl Default for InstallPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            attempts: 2,
        }
    }
}

/// Run an install under the policy's timeout, retrying failed attempts.
///
/// [`InstallError::NotFound`] is returned immediately — a missing
/// interpreter does not heal between attempts.
pub async fn install_with_policy(
    executor: &impl PipExecutor,
    manifest: &Path,
    target_dir: &Path,
    policy: &InstallPolicy,
) -> Result<(), InstallError> {
    let attempts = policy.attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match tokio::time::timeout(policy.timeout, executor.install(manifest, target_dir)).await {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(e @ InstallError::NotFound { .. })) => return Err(e),
            Ok(Err(e)) => {
                if attempt >= attempts {
                    return Err(e);
                }
                tracing::warn!(attempt, error = %e, "pip install failed, retrying");
            }
            Err(_) => {
                let e = InstallError::TimedOut {
                    timeout_secs: policy.timeout.as_secs(),
                };
                if attempt >= attempts {
                    return Err(e);
                }
                tracing::warn!(attempt, "pip install timed out, retrying");
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("python interpreter not found — a Python toolchain with pip is required")]
    NotFound { source: std::io::Error },

    #[error("pip install exited with {code:?}: {stderr}")]
    CommandFailed { code: Option<i32>, stderr: String },

    #[error("pip install did not finish within {timeout_secs}s")]
    TimedOut { timeout_secs: u64 },
}
