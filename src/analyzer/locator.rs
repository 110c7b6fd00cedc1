//! Finds where a branch's version lineage starts

use std::collections::HashMap;

use git2::Oid;

use crate::analyzer::graph::CommitGraph;
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{
    parse_branch_version, BranchClassifier, BranchRef, BranchRole, SemanticVersion,
    VersionAnchor, VersionTag,
};
use crate::error::{Result, VersionError};
use crate::git::Repository;

/// Version of a mainline without any release tag
pub const INITIAL_VERSION: SemanticVersion = SemanticVersion::new(0, 1, 0);

/// Locates the [VersionAnchor] of a branch according to its role
pub struct VersionPointLocator<'a> {
    config: &'a Config,
    classifier: &'a BranchClassifier,
}

impl<'a> VersionPointLocator<'a> {
    pub fn new(config: &'a Config, classifier: &'a BranchClassifier) -> Self {
        VersionPointLocator { config, classifier }
    }

    /// Locate the anchor of `branch`.
    ///
    /// Non-fatal findings (unparsable branch names outside strict mode, an
    /// untagged mainline) are pushed onto `warnings`.
    pub fn locate<R: Repository + ?Sized>(
        &self,
        graph: &mut CommitGraph<'_, R>,
        branch: &BranchRef,
        role: BranchRole,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<VersionAnchor> {
        let anchor = match role {
            BranchRole::Mainline => self.mainline_anchor(graph, branch, warnings)?,
            BranchRole::Development => {
                let mainline = self.require_mainline(graph, branch, role)?;
                self.development_anchor(graph, branch, &mainline, warnings)?
            }
            BranchRole::Release => self.release_anchor(graph, branch, warnings)?,
            BranchRole::Hotfix => self.hotfix_anchor(graph, branch, warnings)?,
            BranchRole::Feature | BranchRole::PullRequest => {
                let develop = self.require_development(graph, branch, role)?;
                self.derived_from_development(graph, branch, role, &develop, warnings)?
            }
            BranchRole::Unknown => self.unknown_anchor(graph, branch, warnings)?,
        };

        tracing::debug!(
            branch = %branch.name,
            %role,
            anchor = %anchor.commit,
            base = %anchor.base,
            "located version anchor"
        );
        Ok(anchor)
    }

    /// Newest commit reachable from the mainline tip that carries a release tag,
    /// or `0.1.0` at the root commit.
    fn mainline_anchor<R: Repository + ?Sized>(
        &self,
        graph: &mut CommitGraph<'_, R>,
        mainline: &BranchRef,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<VersionAnchor> {
        let tagged = self.version_tags(graph.repository())?;
        let found = graph.newest_matching(mainline.tip, |oid| tagged.contains_key(&oid))?;

        match found.and_then(|oid| tagged.get(&oid).map(|v| (oid, *v))) {
            Some((commit, base)) => Ok(VersionAnchor { commit, base }),
            None => {
                let warning = BoundaryWarning::NoVersionTag {
                    branch: mainline.name.clone(),
                };
                if !warnings.contains(&warning) {
                    warnings.push(warning);
                }
                Ok(VersionAnchor {
                    commit: graph.first_parent_root(mainline.tip)?,
                    base: INITIAL_VERSION,
                })
            }
        }
    }

    /// Release tags by commit; the highest version wins when a commit has several
    fn version_tags<R: Repository + ?Sized>(
        &self,
        repo: &R,
    ) -> Result<HashMap<Oid, SemanticVersion>> {
        let mut tagged: HashMap<Oid, SemanticVersion> = HashMap::new();
        for tag in repo.tags()? {
            let Some(VersionTag {
                name,
                target,
                version,
            }) = VersionTag::from_ref(&tag, &self.config.tags.prefix)
            else {
                continue;
            };
            tracing::trace!(tag = %name, %version, "found release tag");
            tagged
                .entry(target)
                .and_modify(|existing| {
                    if version.core() > existing.core() {
                        *existing = version;
                    }
                })
                .or_insert(version);
        }
        Ok(tagged)
    }

    /// Development tracks the next minor after the mainline's current version
    fn development_anchor<R: Repository + ?Sized>(
        &self,
        graph: &mut CommitGraph<'_, R>,
        develop: &BranchRef,
        mainline: &BranchRef,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<VersionAnchor> {
        let released = self.mainline_anchor(graph, mainline, warnings)?;
        let commit = self.merge_base(graph, develop, mainline)?;
        Ok(VersionAnchor {
            commit,
            base: released.base.next_minor()?,
        })
    }

    fn release_anchor<R: Repository + ?Sized>(
        &self,
        graph: &mut CommitGraph<'_, R>,
        branch: &BranchRef,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<VersionAnchor> {
        let role = BranchRole::Release;
        let reference = match self.find_development(graph)? {
            Some(develop) => develop,
            None => self.find_mainline(graph)?.ok_or_else(|| {
                VersionError::missing_branch(
                    &branch.name,
                    role,
                    self.reference_names(&[
                        &self.config.branches.development,
                        &self.config.branches.mainline,
                    ]),
                )
            })?,
        };

        let base = match self.version_from_name(branch, role)? {
            Some(version) => version,
            None => {
                let mainline = self.require_mainline(graph, branch, role)?;
                let fallback = self
                    .mainline_anchor(graph, &mainline, warnings)?
                    .base
                    .next_minor()?;
                self.warn_fallback(branch, role, fallback, warnings);
                fallback
            }
        };

        let commit = self.merge_base(graph, branch, &reference)?;
        Ok(VersionAnchor { commit, base })
    }

    fn hotfix_anchor<R: Repository + ?Sized>(
        &self,
        graph: &mut CommitGraph<'_, R>,
        branch: &BranchRef,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<VersionAnchor> {
        let role = BranchRole::Hotfix;
        let mainline = self.require_mainline(graph, branch, role)?;

        let base = match self.version_from_name(branch, role)? {
            Some(version) => version,
            None => {
                let fallback = self
                    .mainline_anchor(graph, &mainline, warnings)?
                    .base
                    .next_patch()?;
                self.warn_fallback(branch, role, fallback, warnings);
                fallback
            }
        };

        let commit = self.merge_base(graph, branch, &mainline)?;
        Ok(VersionAnchor { commit, base })
    }

    /// Feature and pull request branches inherit develop's version numbers
    fn derived_from_development<R: Repository + ?Sized>(
        &self,
        graph: &mut CommitGraph<'_, R>,
        branch: &BranchRef,
        role: BranchRole,
        develop: &BranchRef,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<VersionAnchor> {
        let mainline = self.require_mainline(graph, branch, role)?;
        let develop_anchor = self.development_anchor(graph, develop, &mainline, warnings)?;
        let commit = self.merge_base(graph, branch, develop)?;
        Ok(VersionAnchor {
            commit,
            base: develop_anchor.base,
        })
    }

    fn unknown_anchor<R: Repository + ?Sized>(
        &self,
        graph: &mut CommitGraph<'_, R>,
        branch: &BranchRef,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<VersionAnchor> {
        let role = BranchRole::Unknown;
        if let Some(develop) = self.find_development(graph)? {
            return self.derived_from_development(graph, branch, role, &develop, warnings);
        }

        let mainline = self.require_mainline(graph, branch, role)?;
        let released = self.mainline_anchor(graph, &mainline, warnings)?;
        let commit = self.merge_base(graph, branch, &mainline)?;
        Ok(VersionAnchor {
            commit,
            base: released.base.next_minor()?,
        })
    }

    fn version_from_name(
        &self,
        branch: &BranchRef,
        role: BranchRole,
    ) -> Result<Option<SemanticVersion>> {
        let fragment = self.classifier.version_fragment(&branch.name, role);
        if let Some(version) = fragment.and_then(parse_branch_version) {
            return Ok(Some(version));
        }

        if self.config.behavior.strict {
            return Err(VersionError::UnparsableBranchName {
                branch: branch.name.clone(),
                role,
                reason: format!(
                    "expected Major.Minor[.Patch] after the prefix, found '{}'",
                    fragment.unwrap_or("")
                ),
            });
        }
        Ok(None)
    }

    fn warn_fallback(
        &self,
        branch: &BranchRef,
        role: BranchRole,
        fallback: SemanticVersion,
        warnings: &mut Vec<BoundaryWarning>,
    ) {
        let warning = BoundaryWarning::UnparsableBranchName {
            branch: branch.name.clone(),
            role,
            fallback,
        };
        tracing::warn!("{}", warning);
        warnings.push(warning);
    }

    fn merge_base<R: Repository + ?Sized>(
        &self,
        graph: &mut CommitGraph<'_, R>,
        branch: &BranchRef,
        reference: &BranchRef,
    ) -> Result<Oid> {
        graph
            .merge_base(branch.tip, reference.tip)?
            .ok_or_else(|| VersionError::unreachable_anchor(&branch.name, reference.tip, branch.tip))
    }

    fn find_mainline<R: Repository + ?Sized>(
        &self,
        graph: &CommitGraph<'_, R>,
    ) -> Result<Option<BranchRef>> {
        find_first(graph.repository(), &self.config.branches.mainline)
    }

    fn find_development<R: Repository + ?Sized>(
        &self,
        graph: &CommitGraph<'_, R>,
    ) -> Result<Option<BranchRef>> {
        find_first(graph.repository(), &self.config.branches.development)
    }

    fn require_mainline<R: Repository + ?Sized>(
        &self,
        graph: &CommitGraph<'_, R>,
        branch: &BranchRef,
        role: BranchRole,
    ) -> Result<BranchRef> {
        self.find_mainline(graph)?.ok_or_else(|| {
            VersionError::missing_branch(
                &branch.name,
                role,
                self.reference_names(&[&self.config.branches.mainline]),
            )
        })
    }

    fn require_development<R: Repository + ?Sized>(
        &self,
        graph: &CommitGraph<'_, R>,
        branch: &BranchRef,
        role: BranchRole,
    ) -> Result<BranchRef> {
        self.find_development(graph)?.ok_or_else(|| {
            VersionError::missing_branch(
                &branch.name,
                role,
                self.reference_names(&[&self.config.branches.development]),
            )
        })
    }

    fn reference_names(&self, groups: &[&Vec<String>]) -> String {
        groups
            .iter()
            .flat_map(|names| names.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

/// First configured name that exists as a local branch
fn find_first<R: Repository + ?Sized>(repo: &R, names: &[String]) -> Result<Option<BranchRef>> {
    for name in names {
        if let Some(branch) = repo.find_branch(name)? {
            return Ok(Some(branch));
        }
    }
    Ok(None)
}
