use crate::domain::{BranchRef, Commit, TagRef};
use crate::error::{Result, VersionError};
use crate::git::Repository;
use git2::Oid;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Head {
    Unset,
    Branch(String),
    Detached(Oid),
}

/// In-memory commit graph for testing without a git repository
///
/// Commits get sequential ids and increasing timestamps unless a timestamp is
/// given explicitly. Branch order is insertion order.
pub struct MockRepository {
    commits: HashMap<Oid, Commit>,
    branches: Vec<BranchRef>,
    tags: Vec<TagRef>,
    head: Head,
    dirty: bool,
    next_id: u32,
    clock: i64,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: HashMap::new(),
            branches: Vec::new(),
            tags: Vec::new(),
            head: Head::Unset,
            dirty: false,
            next_id: 1,
            clock: 1_700_000_000,
        }
    }

    /// Add a commit with the given parents, one clock tick after the previous commit
    pub fn commit(&mut self, parents: &[Oid], message: &str) -> Oid {
        self.clock += 60;
        let timestamp = self.clock;
        self.commit_at(parents, message, timestamp)
    }

    /// Add a commit with an explicit timestamp
    pub fn commit_at(&mut self, parents: &[Oid], message: &str, timestamp: i64) -> Oid {
        let id = self.next_oid();
        self.commits.insert(
            id,
            Commit {
                id,
                parents: parents.to_vec(),
                message: message.to_string(),
                timestamp,
            },
        );
        id
    }

    /// Add `count` commits on top of `from`, each with a single parent; returns the last one
    pub fn linear(&mut self, from: Oid, count: usize, label: &str) -> Oid {
        (0..count).fold(from, |parent, i| {
            self.commit(&[parent], &format!("{} {}", label, i + 1))
        })
    }

    /// Create or move a branch
    pub fn set_branch(&mut self, name: impl Into<String>, tip: Oid) {
        let name = name.into();
        match self.branches.iter_mut().find(|b| b.name == name) {
            Some(branch) => branch.tip = tip,
            None => self.branches.push(BranchRef::new(name, tip)),
        }
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, target: Oid) {
        self.tags.push(TagRef::new(name, target));
    }

    /// Point HEAD at a branch
    pub fn checkout(&mut self, branch: impl Into<String>) {
        self.head = Head::Branch(branch.into());
    }

    /// Detach HEAD at a commit
    pub fn detach(&mut self, oid: Oid) {
        self.head = Head::Detached(oid);
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    fn next_oid(&mut self) -> Oid {
        let mut bytes = [0u8; 20];
        bytes[0] = 0xab;
        bytes[16..].copy_from_slice(&self.next_id.to_be_bytes());
        self.next_id += 1;
        Oid::from_bytes(&bytes).unwrap_or_else(|_| Oid::zero())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn head_branch_name(&self) -> Result<Option<String>> {
        match &self.head {
            Head::Branch(name) => Ok(Some(name.clone())),
            _ => Ok(None),
        }
    }

    fn head_commit(&self) -> Result<Oid> {
        match &self.head {
            Head::Branch(name) => self
                .branches
                .iter()
                .find(|b| &b.name == name)
                .map(|b| b.tip)
                .ok_or_else(|| VersionError::config(format!("HEAD branch '{}' has no tip", name))),
            Head::Detached(oid) => Ok(*oid),
            Head::Unset => Err(git2::Error::from_str("HEAD is not set").into()),
        }
    }

    fn is_dirty(&self) -> Result<bool> {
        Ok(self.dirty)
    }

    fn branches(&self) -> Result<Vec<BranchRef>> {
        Ok(self.branches.clone())
    }

    fn tags(&self) -> Result<Vec<TagRef>> {
        Ok(self.tags.clone())
    }

    fn find_commit(&self, oid: Oid) -> Result<Commit> {
        self.commits
            .get(&oid)
            .cloned()
            .ok_or(VersionError::CommitNotFound(oid))
    }
}
