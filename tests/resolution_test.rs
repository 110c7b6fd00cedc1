mod common;

use common::{gitflow_repo, TestRepo};
use gitflow_version::boundary::BoundaryWarning;
use gitflow_version::config::Config;
use gitflow_version::context::BuildContext;
use gitflow_version::domain::{BranchRole, SemanticVersion, Stage};
use gitflow_version::git::Git2Repository;
use gitflow_version::{VersionError, VersionResolver};

fn resolver(config: Config) -> VersionResolver {
    VersionResolver::new(config, BuildContext::local()).unwrap()
}

fn open(repo: &TestRepo) -> Git2Repository {
    Git2Repository::open(repo.path()).unwrap()
}

#[test]
fn test_untagged_mainline_starts_at_initial_version() {
    let mut repo = TestRepo::new();
    let root = repo.commit(&[], "initial");
    let tip = repo.linear(root, 3, "work");
    repo.branch("master", tip);
    repo.checkout("master");

    let resolved = resolver(Config::default()).resolve(&open(&repo)).unwrap();

    assert_eq!(resolved.role, BranchRole::Mainline);
    assert_eq!(resolved.version.to_string(), "0.1.0");
    assert_eq!(resolved.anchor.commit, root);
    assert_eq!(resolved.commits_since_version_source, 3);
    assert!(resolved.warnings.contains(&BoundaryWarning::NoVersionTag {
        branch: "master".to_string()
    }));
}

#[test]
fn test_tagged_mainline_is_final() {
    let (repo, released, _) = gitflow_repo("v1.2.0");

    let resolved = resolver(Config::default()).resolve(&open(&repo)).unwrap();

    assert_eq!(resolved.version.to_string(), "1.2.0");
    assert_eq!(resolved.version.stage, Stage::Final);
    assert_eq!(resolved.sha, released);
    assert!(resolved.warnings.is_empty());
}

#[test]
fn test_annotated_tag_is_peeled() {
    let mut repo = TestRepo::new();
    let root = repo.commit(&[], "initial");
    repo.branch("main", root);
    repo.annotated_tag("v2.0.0", root);
    repo.checkout("main");

    let resolved = resolver(Config::default()).resolve(&open(&repo)).unwrap();
    assert_eq!(resolved.version.to_string(), "2.0.0");
}

#[test]
fn test_development_targets_next_minor() {
    let (repo, _, develop) = gitflow_repo("v1.2.0");
    repo.checkout("develop");

    let resolved = resolver(Config::default()).resolve(&open(&repo)).unwrap();

    assert_eq!(resolved.role, BranchRole::Development);
    assert_eq!(
        resolved.version,
        SemanticVersion::new(1, 3, 0).with_stage(Stage::Unstable, 2)
    );
    assert_eq!(resolved.sha, develop);
}

#[test]
fn test_release_branch_counts_commits_since_fork() {
    let (mut repo, _, develop) = gitflow_repo("v1.1.0");
    let tip = repo.linear(develop, 3, "stabilise");
    repo.branch("release/1.2.0", tip);
    repo.checkout("release/1.2.0");

    let resolved = resolver(Config::default()).resolve(&open(&repo)).unwrap();

    assert_eq!(resolved.role, BranchRole::Release);
    assert_eq!(resolved.version.to_string(), "1.2.0-Beta.3");
    assert_eq!(resolved.anchor.commit, develop);
}

#[test]
fn test_release_without_version_falls_back_to_next_minor() {
    let (mut repo, _, develop) = gitflow_repo("v1.1.0");
    let tip = repo.linear(develop, 1, "stabilise");
    repo.branch("release/next", tip);

    let resolved = resolver(Config::default())
        .resolve_branch(&open(&repo), "release/next")
        .unwrap();

    assert_eq!(resolved.version.to_string(), "1.2.0-Beta.1");
    assert!(resolved.warnings.iter().any(|w| matches!(
        w,
        BoundaryWarning::UnparsableBranchName { branch, .. } if branch == "release/next"
    )));
}

#[test]
fn test_strict_mode_rejects_unversioned_release() {
    let (mut repo, _, develop) = gitflow_repo("v1.1.0");
    let tip = repo.linear(develop, 1, "stabilise");
    repo.branch("release/next", tip);

    let mut config = Config::default();
    config.behavior.strict = true;
    let err = resolver(config)
        .resolve_branch(&open(&repo), "release/next")
        .unwrap_err();

    assert!(matches!(err, VersionError::UnparsableBranchName { .. }));
}

#[test]
fn test_hotfix_at_fork_point_is_beta_zero() {
    let (repo, released, _) = gitflow_repo("v1.2.0");
    repo.branch("hotfix/1.2.1", released);
    repo.checkout("hotfix/1.2.1");

    let resolved = resolver(Config::default()).resolve(&open(&repo)).unwrap();

    assert_eq!(resolved.role, BranchRole::Hotfix);
    assert_eq!(resolved.version.to_string(), "1.2.1-Beta.0");
    assert_eq!(resolved.commits_since_version_source, 0);
}

#[test]
fn test_feature_branch_renders_branch_name() {
    let (mut repo, _, develop) = gitflow_repo("v1.2.0");
    let tip = repo.linear(develop, 5, "feature work");
    repo.branch("feature/x", tip);
    repo.checkout("feature/x");

    let resolver = resolver(Config::default());
    let resolved = resolver.resolve(&open(&repo)).unwrap();
    assert_eq!(resolved.role, BranchRole::Feature);
    assert_eq!(resolved.version.to_string(), "1.3.0-Alpha.5");

    let rendered = resolver.render(
        "{Major}.{Minor}.{Patch}-{Stage}.{PreRelease}+{BranchName}",
        &resolved,
    );
    assert_eq!(rendered.text, "1.3.0-Alpha.5+feature/x");
    assert!(rendered.warnings.is_empty());
}

#[test]
fn test_merged_commits_do_not_inflate_pre_release() {
    let (mut repo, _, develop) = gitflow_repo("v1.2.0");
    let feature = repo.linear(develop, 2, "feature work");
    let side = repo.linear(develop, 50, "side work");
    let merge = repo.commit(&[feature, side], "merge side work");
    repo.branch("feature/merged", merge);

    let resolved = resolver(Config::default())
        .resolve_branch(&open(&repo), "feature/merged")
        .unwrap();

    assert_eq!(resolved.commits_since_version_source, 3);
    assert_eq!(resolved.version.to_string(), "1.3.0-Alpha.3");
}

#[test]
fn test_feature_without_develop_is_missing_branch() {
    let mut repo = TestRepo::new();
    let root = repo.commit(&[], "initial");
    repo.branch("master", root);
    repo.tag("v1.0.0", root);
    let tip = repo.linear(root, 2, "feature work");
    repo.branch("feature/orphan", tip);
    repo.checkout("feature/orphan");

    let err = resolver(Config::default()).resolve(&open(&repo)).unwrap_err();

    match err {
        VersionError::MissingBranch {
            branch,
            role,
            reference,
        } => {
            assert_eq!(branch, "feature/orphan");
            assert_eq!(role, BranchRole::Feature);
            assert_eq!(reference, "develop");
        }
        other => panic!("expected MissingBranch, got {:?}", other),
    }
}

#[test]
fn test_detached_head_follows_develop() {
    let (repo, _, develop) = gitflow_repo("v1.2.0");
    repo.detach(develop);

    let resolved = resolver(Config::default()).resolve(&open(&repo)).unwrap();

    assert_eq!(resolved.role, BranchRole::Unknown);
    assert_eq!(resolved.branch_name, "HEAD");
    assert_eq!(resolved.version.minor, 3);
    assert!(resolved
        .warnings
        .iter()
        .any(|w| matches!(w, BoundaryWarning::DetachedHead { .. })));
}

#[test]
fn test_resolution_is_repeatable() {
    let (mut repo, _, develop) = gitflow_repo("v1.2.0");
    let tip = repo.linear(develop, 4, "feature work");
    repo.branch("feature/again", tip);

    let resolver = resolver(Config::default());
    let git = open(&repo);
    let first = resolver.resolve_branch(&git, "feature/again").unwrap();
    let second = resolver.resolve_branch(&git, "feature/again").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_rendered_version_round_trips() {
    let (mut repo, _, develop) = gitflow_repo("v1.1.0");
    let tip = repo.linear(develop, 7, "stabilise");
    repo.branch("release/1.2.0", tip);

    let resolver = resolver(Config::default());
    let resolved = resolver
        .resolve_branch(&open(&repo), "release/1.2.0")
        .unwrap();
    let rendered = resolver.render("", &resolved);

    let parsed: SemanticVersion = rendered.text.parse().unwrap();
    assert_eq!(parsed, resolved.version);
}

#[test]
fn test_resolve_path_reports_outcome() {
    use gitflow_version::Outcome;

    let (repo, _, _) = gitflow_repo("v1.2.0");
    let resolver = resolver(Config::default());

    match resolver.resolve_path(repo.path()).unwrap() {
        Outcome::Resolved(resolved) => assert_eq!(resolved.version.to_string(), "1.2.0"),
        Outcome::Skipped(reason) => panic!("unexpected skip: {}", reason),
    }

    let empty = tempfile::TempDir::new().unwrap();
    assert!(matches!(
        resolver.resolve_path(empty.path()).unwrap(),
        Outcome::Skipped(_)
    ));
}

#[test]
fn test_pull_request_branch_is_alpha_from_develop() {
    let (mut repo, _, develop) = gitflow_repo("v1.2.0");
    let tip = repo.linear(develop, 4, "review");
    repo.branch("pull/42", tip);

    let resolved = resolver(Config::default())
        .resolve_branch(&open(&repo), "pull/42")
        .unwrap();

    assert_eq!(resolved.role, BranchRole::PullRequest);
    assert_eq!(resolved.version.to_string(), "1.3.0-Alpha.4");
}

#[test]
fn test_pull_request_without_develop_is_missing_branch() {
    let mut repo = TestRepo::new();
    let root = repo.commit(&[], "initial");
    repo.branch("master", root);
    repo.tag("v1.0.0", root);
    let tip = repo.linear(root, 1, "review");
    repo.branch("pull/42", tip);

    let err = resolver(Config::default())
        .resolve_branch(&open(&repo), "pull/42")
        .unwrap_err();
    assert!(matches!(
        err,
        VersionError::MissingBranch {
            role: BranchRole::PullRequest,
            ..
        }
    ));
}

#[test]
fn test_tag_at_numeric_limit_is_an_error() {
    let (repo, _, _) = gitflow_repo("v1.4294967295.0");
    repo.checkout("develop");

    let err = resolver(Config::default()).resolve(&open(&repo)).unwrap_err();
    assert!(matches!(err, VersionError::Version(_)));
}
