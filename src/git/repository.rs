use crate::domain::{BranchRef, Commit, TagRef};
use crate::error::{Result, VersionError};
use git2::{BranchType, ErrorCode, ObjectType, Oid, Repository as Git2Repo, StatusOptions};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Work directory of a non-bare repository
    pub fn work_dir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// True when HEAD points at an unborn branch (no commits yet)
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.repo.is_empty()?)
    }
}

impl super::Repository for Git2Repository {
    fn head_branch_name(&self) -> Result<Option<String>> {
        if self.repo.head_detached()? {
            return Ok(None);
        }

        let head = self.repo.head()?;
        Ok(head.shorthand().map(|s| s.to_string()))
    }

    fn head_commit(&self) -> Result<Oid> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit.id())
    }

    fn is_dirty(&self) -> Result<bool> {
        if self.repo.is_bare() {
            return Ok(false);
        }

        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut options))?;

        Ok(!statuses.is_empty())
    }

    fn branches(&self) -> Result<Vec<BranchRef>> {
        let mut branches = Vec::new();

        for entry in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            let name = match branch.name()? {
                Some(name) => name.to_string(),
                None => continue,
            };
            let tip = match branch.get().target() {
                Some(oid) => oid,
                None => continue,
            };
            branches.push(BranchRef::new(name, tip));
        }

        Ok(branches)
    }

    fn tags(&self) -> Result<Vec<TagRef>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for tag_name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", tag_name))?;
            // Annotated tags peel through the tag object to the commit
            match reference.peel(ObjectType::Commit) {
                Ok(object) => tags.push(TagRef::new(tag_name, object.id())),
                Err(e) => {
                    tracing::debug!(tag = tag_name, error = %e, "skipping tag without a commit")
                }
            }
        }

        Ok(tags)
    }

    fn find_commit(&self, oid: Oid) -> Result<Commit> {
        let commit = self.repo.find_commit(oid).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                VersionError::CommitNotFound(oid)
            } else {
                VersionError::Git(e)
            }
        })?;

        Ok(Commit {
            id: oid,
            parents: commit.parent_ids().collect(),
            message: commit.message().unwrap_or("").to_string(),
            timestamp: commit.time().seconds(),
        })
    }
}
