//! Domain logic - pure versioning rules independent of git access

pub mod branch;
pub mod commit;
pub mod tag;
pub mod version;

pub use branch::{BranchClassifier, BranchRole};
pub use commit::{BranchRef, Commit, TagRef};
pub use tag::{parse_branch_version, parse_tag_version, VersionTag};
pub use version::{NumericVersion, SemanticVersion, Stage, VersionAnchor};
