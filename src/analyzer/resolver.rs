use std::fmt;
use std::path::Path;

use git2::Oid;

use crate::analyzer::builder::build_version;
use crate::analyzer::distance::count_distance;
use crate::analyzer::graph::CommitGraph;
use crate::analyzer::locator::VersionPointLocator;
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::context::BuildContext;
use crate::domain::{BranchClassifier, BranchRef, BranchRole, SemanticVersion, VersionAnchor};
use crate::error::{Result, VersionError};
use crate::format::{self, RepoFacts, Rendered};
use crate::git::{Git2Repository, Repository};

/// Branch name reported when HEAD is detached
pub const DETACHED_HEAD: &str = "HEAD";

/// Everything computed for one branch
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVersion {
    pub branch_name: String,
    pub role: BranchRole,
    pub anchor: VersionAnchor,
    pub version: SemanticVersion,
    pub sha: Oid,
    pub commits_since_version_source: u32,
    pub is_dirty: bool,
    pub warnings: Vec<BoundaryWarning>,
}

impl ResolvedVersion {
    pub fn facts(&self) -> RepoFacts {
        RepoFacts {
            branch_name: self.branch_name.clone(),
            sha: self.sha.to_string(),
            commits_since_version_source: self.commits_since_version_source,
        }
    }
}

/// Why a run produced no version without failing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipReason {
    pub path: String,
    pub reason: String,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "versioning skipped for '{}': {}",
            self.path, self.reason
        )
    }
}

/// Result of a resolution run. Fatal conditions are the `Err` side of
/// [crate::Result], so a skip can never be mistaken for a failure or a success.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Resolved(ResolvedVersion),
    Skipped(SkipReason),
}

/// Drives classification, anchor location, distance counting and assembly
pub struct VersionResolver {
    config: Config,
    classifier: BranchClassifier,
    context: BuildContext,
}

impl VersionResolver {
    pub fn new(config: Config, context: BuildContext) -> Result<Self> {
        let classifier = BranchClassifier::new(&config.branches)?;
        Ok(VersionResolver {
            config,
            classifier,
            context,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn classify(&self, branch_name: &str) -> BranchRole {
        self.classifier.classify(branch_name)
    }

    /// Resolve the version of the checked-out branch
    pub fn resolve<R: Repository + ?Sized>(&self, repo: &R) -> Result<ResolvedVersion> {
        let mut warnings = Vec::new();
        let head = repo.head_commit()?;
        let branch = match repo.head_branch_name()? {
            Some(name) => BranchRef::new(name, head),
            None => {
                warnings.push(BoundaryWarning::DetachedHead {
                    sha: head.to_string(),
                });
                BranchRef::new(DETACHED_HEAD, head)
            }
        };
        self.resolve_ref(repo, &branch, warnings)
    }

    /// Resolve the version of a named local branch
    pub fn resolve_branch<R: Repository + ?Sized>(
        &self,
        repo: &R,
        name: &str,
    ) -> Result<ResolvedVersion> {
        let branch = repo
            .find_branch(name)?
            .ok_or_else(|| VersionError::BranchNotFound(name.to_string()))?;
        self.resolve_ref(repo, &branch, Vec::new())
    }

    fn resolve_ref<R: Repository + ?Sized>(
        &self,
        repo: &R,
        branch: &BranchRef,
        mut warnings: Vec<BoundaryWarning>,
    ) -> Result<ResolvedVersion> {
        let role = self.classifier.classify(&branch.name);
        tracing::debug!(branch = %branch.name, %role, "classified branch");

        let mut graph = CommitGraph::new(repo);
        let locator = VersionPointLocator::new(&self.config, &self.classifier);
        let anchor = locator.locate(&mut graph, branch, role, &mut warnings)?;
        let distance = count_distance(&mut graph, &branch.name, anchor.commit, branch.tip)?;
        let version = build_version(role, &anchor, distance);

        let is_dirty = repo.is_dirty()?;
        if is_dirty {
            warnings.push(BoundaryWarning::DirtyWorkingTree);
        }

        tracing::info!(branch = %branch.name, %role, %version, "resolved version");
        Ok(ResolvedVersion {
            branch_name: branch.name.clone(),
            role,
            anchor,
            version,
            sha: branch.tip,
            commits_since_version_source: distance,
            is_dirty,
            warnings,
        })
    }

    /// Render the informational version string for a resolved version
    pub fn render(&self, template: &str, resolved: &ResolvedVersion) -> Rendered {
        format::resolve(
            template,
            &resolved.facts(),
            &resolved.version,
            &self.config.labels,
        )
    }

    /// Open the repository containing `path` and resolve HEAD.
    ///
    /// A missing repository or one without commits skips versioning, except
    /// on a build agent where it is fatal.
    pub fn resolve_path(&self, path: &Path) -> Result<Outcome> {
        match open_repository(path)? {
            Ok(repo) => Ok(Outcome::Resolved(self.resolve(&repo)?)),
            Err(reason) => Ok(Outcome::Skipped(skip_or_fail(&self.context, reason)?)),
        }
    }
}

/// A run with nothing to version is skipped locally and fatal on a build agent
pub fn skip_or_fail(context: &BuildContext, reason: SkipReason) -> Result<SkipReason> {
    if context.is_build_agent() {
        return Err(VersionError::RepositoryUnavailable {
            path: reason.path,
            reason: reason.reason,
        });
    }
    tracing::info!("{}", reason);
    Ok(reason)
}

/// Opens a repository that has at least one commit.
///
/// The inner `Err` is the "nothing to version" case; the outer one carries
/// real git failures.
pub fn open_repository(path: &Path) -> Result<std::result::Result<Git2Repository, SkipReason>> {
    let skip = |reason: String| SkipReason {
        path: path.display().to_string(),
        reason,
    };

    let repo = match Git2Repository::open(path) {
        Ok(repo) => repo,
        Err(VersionError::Git(e)) if e.code() == git2::ErrorCode::NotFound => {
            return Ok(Err(skip("no git repository found".to_string())));
        }
        Err(e) => return Err(e),
    };

    if repo.is_empty()? {
        return Ok(Err(skip("repository has no commits".to_string())));
    }
    Ok(Ok(repo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Stage;
    use crate::git::MockRepository;

    fn resolver() -> VersionResolver {
        VersionResolver::new(Config::default(), BuildContext::local()).unwrap()
    }

    #[test]
    fn test_resolve_checked_out_feature() {
        let mut repo = MockRepository::new();
        let root = repo.commit(&[], "initial");
        repo.add_tag("v1.2.0", root);
        repo.set_branch("main", root);
        repo.set_branch("develop", root);
        let tip = repo.linear(root, 5, "feature");
        repo.set_branch("feature/x", tip);
        repo.checkout("feature/x");

        let resolved = resolver().resolve(&repo).unwrap();
        assert_eq!(resolved.role, BranchRole::Feature);
        assert_eq!(resolved.version.to_string(), "1.3.0-Alpha.5");
        assert_eq!(resolved.sha, tip);
        assert_eq!(resolved.commits_since_version_source, 5);
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn test_detached_head_is_unknown_and_warned() {
        let mut repo = MockRepository::new();
        let root = repo.commit(&[], "initial");
        repo.set_branch("main", root);
        repo.set_branch("develop", root);
        let tip = repo.commit(&[root], "detached work");
        repo.detach(tip);

        let resolved = resolver().resolve(&repo).unwrap();
        assert_eq!(resolved.branch_name, DETACHED_HEAD);
        assert_eq!(resolved.role, BranchRole::Unknown);
        assert_eq!(resolved.version.stage, Stage::Unstable);
        assert!(resolved
            .warnings
            .iter()
            .any(|w| matches!(w, BoundaryWarning::DetachedHead { .. })));
    }

    #[test]
    fn test_dirty_tree_is_reported() {
        let mut repo = MockRepository::new();
        let root = repo.commit(&[], "initial");
        repo.set_branch("main", root);
        repo.checkout("main");
        repo.set_dirty(true);

        let resolved = resolver().resolve(&repo).unwrap();
        assert!(resolved.is_dirty);
        assert!(resolved
            .warnings
            .contains(&BoundaryWarning::DirtyWorkingTree));
    }

    #[test]
    fn test_resolve_named_branch() {
        let mut repo = MockRepository::new();
        let root = repo.commit(&[], "initial");
        repo.add_tag("v2.0.0", root);
        repo.set_branch("main", root);
        let fix = repo.commit(&[root], "fix");
        repo.set_branch("hotfix/2.0.1", fix);
        repo.checkout("main");

        let resolved = resolver().resolve_branch(&repo, "hotfix/2.0.1").unwrap();
        assert_eq!(resolved.version.to_string(), "2.0.1-Beta.1");
    }

    #[test]
    fn test_resolve_unknown_named_branch() {
        let mut repo = MockRepository::new();
        let root = repo.commit(&[], "initial");
        repo.set_branch("main", root);

        let err = resolver().resolve_branch(&repo, "feature/gone").unwrap_err();
        assert!(matches!(err, VersionError::BranchNotFound(ref name) if name == "feature/gone"));
    }

    #[test]
    fn test_render_uses_facts() {
        let mut repo = MockRepository::new();
        let root = repo.commit(&[], "initial");
        repo.set_branch("main", root);
        repo.checkout("main");

        let resolver = resolver();
        let resolved = resolver.resolve(&repo).unwrap();
        let rendered = resolver.render("{BranchName}@{Major}.{Minor}.{Patch}", &resolved);
        assert_eq!(rendered.text, "main@0.1.0");
    }

    #[test]
    fn test_skip_on_local_machine() {
        let reason = SkipReason {
            path: ".".to_string(),
            reason: "repository has no commits".to_string(),
        };
        let skipped = skip_or_fail(&BuildContext::local(), reason.clone()).unwrap();
        assert_eq!(skipped, reason);
    }

    #[test]
    fn test_build_agent_escalates_skip() {
        let reason = SkipReason {
            path: ".".to_string(),
            reason: "no git repository found".to_string(),
        };
        let err = skip_or_fail(&BuildContext::agent("CI"), reason).unwrap_err();
        assert!(matches!(err, VersionError::RepositoryUnavailable { .. }));
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason {
            path: "/tmp/x".to_string(),
            reason: "no git repository found".to_string(),
        };
        assert_eq!(
            reason.to_string(),
            "versioning skipped for '/tmp/x': no git repository found"
        );
    }
}
