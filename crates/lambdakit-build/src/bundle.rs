use std::path::{Path, PathBuf};

use crate::installer::{InstallError, InstallPolicy, PipExecutor, RealPip, install_with_policy};

/// Dependency manifest expected at the root of each unit directory.
pub const MANIFEST_FILE: &str = "requirements.txt";

/// Subdirectory of the unit directory holding the function source.
pub const SOURCE_SUBDIR: &str = "src";

/// Filesystem paths for one bundling invocation.
///
/// Ephemeral — built fresh per invocation and discarded. Callers running
/// bundles in parallel must give each unit a distinct `output_dir`; the
/// copy steps are non-atomic merges.
#[derive(Debug, Clone)]
pub struct BundleRequest {
    /// Per-unit directory containing `requirements.txt` and `src/`.
    pub unit_dir: PathBuf,
    /// Optional shared library directory merged in alongside the unit's
    /// own dependencies.
    pub shared_lib: Option<PathBuf>,
    /// Staging directory the asset pipeline will package.
    pub output_dir: PathBuf,
}

/// Bundle one unit's dependencies and source into `request.output_dir`.
///
/// Steps, each a hard dependency on the previous succeeding:
///
/// 1. `pip install -r {unit_dir}/requirements.txt -t {output_dir}`
/// 2. merge-copy the shared library directory, if configured
/// 3. merge-copy `{unit_dir}/src`
///
/// The copies overwrite files already present but never delete anything,
/// so installed packages from step 1 survive steps 2 and 3, and repeating
/// a bundle with identical inputs yields the same file set. On conflict
/// the unit's own source wins over the shared library.
pub async fn bundle(
    request: &BundleRequest,
    executor: &impl PipExecutor,
    policy: &InstallPolicy,
) -> Result<(), BundleError> {
    let manifest = request.unit_dir.join(MANIFEST_FILE);
    tracing::debug!(
        manifest = %manifest.display(),
        output = %request.output_dir.display(),
        "installing dependencies"
    );
    install_with_policy(executor, &manifest, &request.output_dir, policy)
        .await
        .map_err(|e| BundleError::DependencyInstallFailed {
            manifest,
            source: e,
        })?;

    if let Some(lib) = &request.shared_lib {
        if !lib.is_dir() {
            return Err(BundleError::SharedLibraryMissing { path: lib.clone() });
        }
        copy_tree(lib, &request.output_dir)?;
    }

    let src_dir = request.unit_dir.join(SOURCE_SUBDIR);
    if !src_dir.is_dir() {
        return Err(BundleError::SourceDirectoryMissing { path: src_dir });
    }
    copy_tree(&src_dir, &request.output_dir)?;

    tracing::debug!(output = %request.output_dir.display(), "bundle complete");
    Ok(())
}

/// Recursively copy the contents of `src` into `dst`.
///
/// Merge semantics: directories are created as needed, existing files are
/// overwritten, files present only in `dst` are left alone.
fn copy_tree(src: &Path, dst: &Path) -> Result<(), BundleError> {
    std::fs::create_dir_all(dst).map_err(|e| BundleError::CreateDir {
        path: dst.to_path_buf(),
        source: e,
    })?;

    let entries = std::fs::read_dir(src).map_err(|e| BundleError::ReadDir {
        path: src.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| BundleError::ReadDir {
            path: src.to_path_buf(),
            source: e,
        })?;
        let from = entry.path();
        let to = dst.join(entry.file_name());

        let file_type = entry.file_type().map_err(|e| BundleError::ReadDir {
            path: from.clone(),
            source: e,
        })?;

        if file_type.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            std::fs::copy(&from, &to).map_err(|e| BundleError::CopyFile {
                path: from,
                source: e,
            })?;
        }
    }

    Ok(())
}

/// Local bundling strategy handed to the asset pipeline's extension point.
///
/// The pipeline invokes [`try_bundle`](Self::try_bundle) with the staging
/// directory during asset preparation, once per packaged unit.
#[derive(Debug, Clone)]
pub struct LocalBundler {
    unit_dir: PathBuf,
    shared_lib: Option<PathBuf>,
    policy: InstallPolicy,
}

impl LocalBundler {
    pub fn new(unit_dir: impl Into<PathBuf>) -> Self {
        Self {
            unit_dir: unit_dir.into(),
            shared_lib: None,
            policy: InstallPolicy::default(),
        }
    }

    pub fn with_shared_lib(mut self, shared_lib: impl Into<PathBuf>) -> Self {
        self.shared_lib = Some(shared_lib.into());
        self
    }

    pub fn with_policy(mut self, policy: InstallPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn unit_dir(&self) -> &Path {
        &self.unit_dir
    }

    /// The request this bundler would run against `output_dir`.
    pub fn request_for(&self, output_dir: &Path) -> BundleRequest {
        BundleRequest {
            unit_dir: self.unit_dir.clone(),
            shared_lib: self.shared_lib.clone(),
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Bundle into `output_dir` using the real pip executor.
    pub async fn try_bundle(&self, output_dir: &Path) -> Result<(), BundleError> {
        self.try_bundle_with(&RealPip::new(), output_dir).await
    }

    /// Bundle into `output_dir` with an injected executor.
    pub async fn try_bundle_with(
        &self,
        executor: &impl PipExecutor,
        output_dir: &Path,
    ) -> Result<(), BundleError> {
        bundle(&self.request_for(output_dir), executor, &self.policy).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("dependency install failed for {manifest}")]
    DependencyInstallFailed {
        manifest: PathBuf,
        source: InstallError,
    },
    #[error("source directory {path} does not exist")]
    SourceDirectoryMissing { path: PathBuf },
    #[error("shared library directory {path} does not exist")]
    SharedLibraryMissing { path: PathBuf },
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read directory {path}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to copy file {path}")]
    CopyFile {
        path: PathBuf,
        source: std::io::Error,
    },
}
