//! Local dependency bundling for lambdakit function assets.
//!
//! # Bundle procedure
//!
//! ```text
//! try_bundle(output_dir)
//!   1. Install   ── pip install -r {unit}/requirements.txt -t output_dir
//!                   (bounded timeout, bounded retry)
//!   2. Shared lib ── merge-copy into output_dir (optional)
//!   3. Source    ── merge-copy {unit}/src into output_dir
//! ```
//!
//! # Merge semantics
//!
//! The copy steps merge into a potentially non-empty staging directory:
//! last writer wins, nothing pre-existing is deleted. The installed
//! packages from step 1 therefore survive the later copies, and a repeated
//! bundle with identical inputs is idempotent.
//!
//! Each invocation is independent; callers parallelizing across units must
//! give every unit its own output directory.

pub mod bundle;
pub mod installer;

pub use bundle::{BundleError, BundleRequest, LocalBundler, bundle};
pub use installer::{InstallError, InstallPolicy, PipExecutor, RealPip};
