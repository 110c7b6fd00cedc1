use crate::domain::{BranchRole, SemanticVersion, VersionAnchor};

/// Assemble the final version from a branch role, its anchor and the distance to the tip.
///
/// The numbers come from the anchor (role adjustments are applied while
/// locating it), the stage from the role, and the pre-release number is the
/// distance for every stage except `Final`.
pub fn build_version(role: BranchRole, anchor: &VersionAnchor, distance: u32) -> SemanticVersion {
    anchor.base.with_stage(role.stage(), distance)
}
