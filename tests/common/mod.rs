//! On-disk repositories for integration tests. Commits carry an empty tree
//! so the working tree stays clean.

#![allow(dead_code)]

use std::path::Path;

use git2::{Oid, Repository, Signature, Time};
use tempfile::TempDir;

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
    clock: i64,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let repo = Repository::init(dir.path()).expect("init repository");
        TestRepo {
            dir,
            repo,
            clock: 1_700_000_000,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn commit(&mut self, parents: &[Oid], message: &str) -> Oid {
        self.clock += 60;
        let signature =
            Signature::new("Test", "test@example.com", &Time::new(self.clock, 0)).unwrap();
        let tree_id = self.repo.treebuilder(None).unwrap().write().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let parents: Vec<git2::Commit> = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).unwrap())
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        self.repo
            .commit(None, &signature, &signature, message, &tree, &parent_refs)
            .unwrap()
    }

    /// `count` commits on top of `from`; returns the new tip
    pub fn linear(&mut self, from: Oid, count: usize, label: &str) -> Oid {
        let mut tip = from;
        for i in 0..count {
            tip = self.commit(&[tip], &format!("{} {}", label, i + 1));
        }
        tip
    }

    pub fn branch(&self, name: &str, tip: Oid) {
        self.repo
            .reference(&format!("refs/heads/{}", name), tip, true, "test")
            .unwrap();
    }

    pub fn tag(&self, name: &str, target: Oid) {
        let object = self.repo.find_object(target, None).unwrap();
        self.repo.tag_lightweight(name, &object, true).unwrap();
    }

    pub fn annotated_tag(&self, name: &str, target: Oid) {
        let object = self.repo.find_object(target, None).unwrap();
        let signature = Signature::now("Test", "test@example.com").unwrap();
        self.repo
            .tag(name, &object, &signature, "release", true)
            .unwrap();
    }

    pub fn checkout(&self, name: &str) {
        self.repo.set_head(&format!("refs/heads/{}", name)).unwrap();
    }

    pub fn detach(&self, oid: Oid) {
        self.repo.set_head_detached(oid).unwrap();
    }
}

/// master tagged `tag`, develop two commits ahead of it.
/// Returns (repo, tagged master commit, develop tip).
pub fn gitflow_repo(tag: &str) -> (TestRepo, Oid, Oid) {
    let mut repo = TestRepo::new();
    let root = repo.commit(&[], "initial");
    let released = repo.linear(root, 2, "master");
    repo.branch("master", released);
    repo.tag(tag, released);

    let develop = repo.linear(released, 2, "develop");
    repo.branch("develop", develop);
    repo.checkout("master");
    (repo, released, develop)
}
