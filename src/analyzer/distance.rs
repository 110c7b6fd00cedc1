use git2::Oid;

use crate::analyzer::graph::CommitGraph;
use crate::error::{Result, VersionError};
use crate::git::Repository;

/// Counts the builds made on a branch since its anchor.
///
/// Only the first-parent chain of `tip` counts: a merge is one step on the
/// branch that received it, however many commits it brings in. An anchor
/// that the chain never reaches is an internal inconsistency and is reported
/// as [VersionError::UnreachableAnchor], never clamped to zero.
pub fn count_distance<R: Repository + ?Sized>(
    graph: &mut CommitGraph<'_, R>,
    branch: &str,
    anchor: Oid,
    tip: Oid,
) -> Result<u32> {
    match graph.first_parent_distance(anchor, tip)? {
        Some(distance) => {
            tracing::debug!(branch, %anchor, %tip, distance, "commits since version source");
            Ok(distance)
        }
        None => Err(VersionError::unreachable_anchor(branch, anchor, tip)),
    }
}
