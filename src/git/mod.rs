//! Read-only git access layer
//!
//! This module provides a trait-based abstraction over the repository facts
//! the version resolver needs, allowing for a real git implementation and an
//! in-memory commit graph for tests.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory commit graph for testing
//!
//! The resolver never writes through this trait; every method is a query.
//!
//! ```rust
//! # use gitflow_version::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> gitflow_version::Result<()> {
//! let head = repo.head_commit()?;
//! let commit = repo.find_commit(head)?;
//! println!("HEAD has {} parent(s)", commit.parents.len());
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{BranchRef, Commit, TagRef};
use crate::error::Result;
use git2::Oid;

/// Read-only view of a repository's commit graph and references
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to [crate::error::VersionError].
pub trait Repository {
    /// Name of the checked-out branch, or `None` when HEAD is detached
    fn head_branch_name(&self) -> Result<Option<String>>;

    /// Commit HEAD points at
    fn head_commit(&self) -> Result<Oid>;

    /// Whether the working tree has uncommitted changes
    fn is_dirty(&self) -> Result<bool>;

    /// All local branches with their tips
    fn branches(&self) -> Result<Vec<BranchRef>>;

    /// All tags, peeled to the commits they point at
    ///
    /// Tags that do not point at a commit are skipped.
    fn tags(&self) -> Result<Vec<TagRef>>;

    /// Look up a single commit
    ///
    /// # Returns
    /// * `Ok(Commit)` - id, ordered parents, message and committer time
    /// * `Err(VersionError::CommitNotFound)` - if the id is not in the repository
    fn find_commit(&self, oid: Oid) -> Result<Commit>;

    /// Find a local branch by name, ignoring ASCII case
    fn find_branch(&self, name: &str) -> Result<Option<BranchRef>> {
        Ok(self
            .branches()?
            .into_iter()
            .find(|b| b.name.eq_ignore_ascii_case(name)))
    }
}
