use std::fmt;

use crate::domain::{BranchRole, SemanticVersion};

/// Non-fatal conditions met while resolving a version.
/// Resolution continues with the documented fallback; these are reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryWarning {
    /// Release or hotfix branch name carries no version; a fallback was used
    UnparsableBranchName {
        branch: String,
        role: BranchRole,
        fallback: SemanticVersion,
    },
    /// Template token that is not recognised; left verbatim
    UnknownToken { token: String },
    /// Working tree has uncommitted changes
    DirtyWorkingTree,
    /// HEAD is not on a branch
    DetachedHead { sha: String },
    /// No version tag reachable from the mainline; versioning starts at the root commit
    NoVersionTag { branch: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::UnparsableBranchName {
                branch,
                role,
                fallback,
            } => write!(
                f,
                "{} branch '{}' does not encode a version; using {}",
                role, branch, fallback
            ),
            BoundaryWarning::UnknownToken { token } => {
                write!(f, "Unknown token '{{{}}}' left as is", token)
            }
            BoundaryWarning::DirtyWorkingTree => {
                write!(f, "Working tree has uncommitted changes")
            }
            BoundaryWarning::DetachedHead { sha } => {
                let short = sha.get(..7).unwrap_or(sha);
                write!(f, "HEAD is detached at {}", short)
            }
            BoundaryWarning::NoVersionTag { branch } => {
                write!(
                    f,
                    "No version tag reachable from '{}'; starting at 0.1.0",
                    branch
                )
            }
        }
    }
}
