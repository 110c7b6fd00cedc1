use git2::Oid;

/// An immutable node of the commit graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: Oid,
    /// Parent ids in order; the first parent continues the branch that received a merge
    pub parents: Vec<Oid>,
    pub message: String,
    /// Committer time, seconds since the Unix epoch
    pub timestamp: i64,
}

impl Commit {
    pub fn first_parent(&self) -> Option<Oid> {
        self.parents.first().copied()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// First line of the commit message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// A local branch and the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub name: String,
    pub tip: Oid,
}

impl BranchRef {
    pub fn new(name: impl Into<String>, tip: Oid) -> Self {
        BranchRef {
            name: name.into(),
            tip,
        }
    }
}

/// A tag, peeled to the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
    pub target: Oid,
}

impl TagRef {
    pub fn new(name: impl Into<String>, target: Oid) -> Self {
        TagRef {
            name: name.into(),
            target,
        }
    }
}
