//! Ancestry queries over the commit DAG
//!
//! All walks share one commit cache, so a resolution loads every commit at
//! most once no matter how many merge-base or distance queries it runs.

use std::collections::{BinaryHeap, HashMap, HashSet};
use std::rc::Rc;

use git2::Oid;

use crate::domain::Commit;
use crate::error::Result;
use crate::git::Repository;

/// Memoizing view of a repository's commit graph for a single resolution
pub struct CommitGraph<'r, R: Repository + ?Sized> {
    repo: &'r R,
    commits: HashMap<Oid, Commit>,
    ancestors: HashMap<Oid, Rc<HashSet<Oid>>>,
    merge_bases: HashMap<(Oid, Oid), Option<Oid>>,
}

impl<'r, R: Repository + ?Sized> CommitGraph<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        CommitGraph {
            repo,
            commits: HashMap::new(),
            ancestors: HashMap::new(),
            merge_bases: HashMap::new(),
        }
    }

    pub fn repository(&self) -> &'r R {
        self.repo
    }

    /// Load a commit, reading it from the repository on first use
    pub fn commit(&mut self, oid: Oid) -> Result<&Commit> {
        if !self.commits.contains_key(&oid) {
            let commit = self.repo.find_commit(oid)?;
            self.commits.insert(oid, commit);
        }
        Ok(&self.commits[&oid])
    }

    fn parents(&mut self, oid: Oid) -> Result<Vec<Oid>> {
        Ok(self.commit(oid)?.parents.clone())
    }

    fn first_parent(&mut self, oid: Oid) -> Result<Option<Oid>> {
        Ok(self.commit(oid)?.first_parent())
    }

    fn timestamp(&mut self, oid: Oid) -> Result<i64> {
        Ok(self.commit(oid)?.timestamp)
    }

    /// `tip` and every commit reachable from it through any parent
    pub fn ancestors(&mut self, tip: Oid) -> Result<Rc<HashSet<Oid>>> {
        if let Some(known) = self.ancestors.get(&tip) {
            return Ok(Rc::clone(known));
        }

        let mut seen = HashSet::new();
        let mut stack = vec![tip];
        while let Some(oid) = stack.pop() {
            if !seen.insert(oid) {
                continue;
            }
            if let Some(known) = self.ancestors.get(&oid) {
                seen.extend(known.iter().copied());
                continue;
            }
            for parent in self.parents(oid)? {
                if !seen.contains(&parent) {
                    stack.push(parent);
                }
            }
        }

        let set = Rc::new(seen);
        self.ancestors.insert(tip, Rc::clone(&set));
        Ok(set)
    }

    /// True when `ancestor` is `descendant` or reachable from it
    pub fn is_ancestor(&mut self, ancestor: Oid, descendant: Oid) -> Result<bool> {
        Ok(self.ancestors(descendant)?.contains(&ancestor))
    }

    /// Lowest common ancestor of two commits.
    ///
    /// When several lowest common ancestors exist (criss-cross merges) the one
    /// with the latest commit timestamp wins, then the smallest id. Returns
    /// `None` for unrelated histories.
    pub fn merge_base(&mut self, a: Oid, b: Oid) -> Result<Option<Oid>> {
        let key = if a <= b { (a, b) } else { (b, a) };
        if let Some(cached) = self.merge_bases.get(&key) {
            return Ok(*cached);
        }

        let base = self.compute_merge_base(a, b)?;
        tracing::debug!(%a, %b, base = ?base, "merge base");
        self.merge_bases.insert(key, base);
        Ok(base)
    }

    fn compute_merge_base(&mut self, a: Oid, b: Oid) -> Result<Option<Oid>> {
        if a == b {
            return Ok(Some(a));
        }

        let from_a = self.ancestors(a)?;

        // Walk back from b and stop at the first common commits on each path
        let mut frontier = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![b];
        while let Some(oid) = stack.pop() {
            if !seen.insert(oid) {
                continue;
            }
            if from_a.contains(&oid) {
                frontier.push(oid);
                continue;
            }
            stack.extend(self.parents(oid)?);
        }

        let mut lowest = Vec::new();
        for &candidate in &frontier {
            let mut dominated = false;
            for &other in &frontier {
                if other != candidate && self.is_ancestor(candidate, other)? {
                    dominated = true;
                    break;
                }
            }
            if !dominated {
                lowest.push(candidate);
            }
        }

        let mut best: Option<(i64, Oid)> = None;
        for oid in lowest {
            let time = self.timestamp(oid)?;
            best = match best {
                Some((best_time, best_oid))
                    if best_time > time || (best_time == time && best_oid < oid) =>
                {
                    Some((best_time, best_oid))
                }
                _ => Some((time, oid)),
            };
        }

        Ok(best.map(|(_, oid)| oid))
    }

    /// Last commit of the first-parent chain starting at `tip`
    pub fn first_parent_root(&mut self, tip: Oid) -> Result<Oid> {
        let mut current = tip;
        while let Some(parent) = self.first_parent(current)? {
            current = parent;
        }
        Ok(current)
    }

    /// Number of first-parent steps from `tip` back to `anchor`'s lineage.
    ///
    /// The walk stops at the first commit that is `anchor` or one of its
    /// ancestors, so commits that only arrive through second parents are never
    /// counted. `None` when `anchor` is not an ancestor of `tip` or the chain
    /// never meets it.
    pub fn first_parent_distance(&mut self, anchor: Oid, tip: Oid) -> Result<Option<u32>> {
        if !self.is_ancestor(anchor, tip)? {
            return Ok(None);
        }

        let lineage = self.ancestors(anchor)?;
        let mut current = tip;
        let mut steps = 0u32;
        loop {
            if lineage.contains(&current) {
                return Ok(Some(steps));
            }
            match self.first_parent(current)? {
                Some(parent) => {
                    current = parent;
                    steps += 1;
                }
                None => return Ok(None),
            }
        }
    }

    /// Most recent commit reachable from `tip` that satisfies `accept`.
    ///
    /// Commits are visited newest first by timestamp, ties broken by id.
    pub fn newest_matching<F>(&mut self, tip: Oid, mut accept: F) -> Result<Option<Oid>>
    where
        F: FnMut(Oid) -> bool,
    {
        let mut queue = BinaryHeap::new();
        let mut seen = HashSet::new();
        queue.push((self.timestamp(tip)?, tip));
        seen.insert(tip);

        while let Some((_, oid)) = queue.pop() {
            if accept(oid) {
                return Ok(Some(oid));
            }
            for parent in self.parents(oid)? {
                if seen.insert(parent) {
                    queue.push((self.timestamp(parent)?, parent));
                }
            }
        }

        Ok(None)
    }
}
