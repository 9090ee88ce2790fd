//! Error type for slice jobs.

use mesh_io::LoadError;
use mesh_prepare::PrepareError;
use mesh_slice::SliceError;
use print_profile::ProfileError;
use thiserror::Error;

/// Result type for slice jobs.
pub type JobResult<T> = Result<T, JobError>;

/// Anything that stops a slice job. No partial G-code is produced.
#[derive(Debug, Error)]
pub enum JobError {
    /// The mesh could not be read.
    #[error("failed to load mesh: {0}")]
    Load(#[from] LoadError),

    /// The mesh could not be placed on the bed.
    #[error("failed to prepare mesh: {0}")]
    Prepare(#[from] PrepareError),

    /// Slicing parameters or mesh were unusable.
    #[error("failed to slice mesh: {0}")]
    Slice(#[from] SliceError),

    /// The printer profile is invalid.
    #[error("invalid printer profile: {0}")]
    Profile(#[from] ProfileError),
}
