use git2::Oid;
use thiserror::Error;

use crate::domain::BranchRole;

/// Unified error type for version resolution
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Commit not found: {0}")]
    CommitNotFound(Oid),

    /// A branch role needs a reference branch (develop or mainline) that does not exist
    #[error(
        "Branch '{branch}' resolved as {role} but its reference branch ({reference}) does not exist"
    )]
    MissingBranch {
        branch: String,
        role: BranchRole,
        reference: String,
    },

    /// The branch requested by name does not exist locally
    #[error("Branch '{0}' does not exist")]
    BranchNotFound(String),

    /// The computed anchor is not an ancestor of the tip
    #[error("Anchor commit {anchor} is not reachable from tip {tip} of branch '{branch}'")]
    UnreachableAnchor { branch: String, anchor: Oid, tip: Oid },

    #[error("Branch '{branch}' ({role}) does not encode a version: {reason}")]
    UnparsableBranchName {
        branch: String,
        role: BranchRole,
        reason: String,
    },

    #[error("No usable repository at '{path}': {reason}")]
    RepositoryUnavailable { path: String, reason: String },
}

/// Convenience type alias for Results in gitflow-version
pub type Result<T> = std::result::Result<T, VersionError>;

impl VersionError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VersionError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        VersionError::Version(msg.into())
    }

    pub fn missing_branch(
        branch: impl Into<String>,
        role: BranchRole,
        reference: impl Into<String>,
    ) -> Self {
        VersionError::MissingBranch {
            branch: branch.into(),
            role,
            reference: reference.into(),
        }
    }

    pub fn unreachable_anchor(branch: impl Into<String>, anchor: Oid, tip: Oid) -> Self {
        VersionError::UnreachableAnchor {
            branch: branch.into(),
            anchor,
            tip,
        }
    }

    /// True for conditions that indicate a bug in classification or graph logic
    /// rather than a repository or configuration problem.
    pub fn is_defect(&self) -> bool {
        matches!(self, VersionError::UnreachableAnchor { .. })
    }
}
