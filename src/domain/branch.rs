use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::config::BranchConventions;
use crate::domain::Stage;
use crate::error::{Result, VersionError};

/// Role a branch plays in the GitFlow convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchRole {
    Mainline,
    Development,
    Release,
    Hotfix,
    Feature,
    PullRequest,
    Unknown,
}

impl BranchRole {
    /// Version stage produced by branches of this role
    pub fn stage(&self) -> Stage {
        match self {
            BranchRole::Mainline => Stage::Final,
            BranchRole::Release | BranchRole::Hotfix => Stage::Beta,
            BranchRole::Feature | BranchRole::PullRequest => Stage::Alpha,
            BranchRole::Development | BranchRole::Unknown => Stage::Unstable,
        }
    }
}

impl fmt::Display for BranchRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BranchRole::Mainline => "Mainline",
            BranchRole::Development => "Development",
            BranchRole::Release => "Release",
            BranchRole::Hotfix => "Hotfix",
            BranchRole::Feature => "Feature",
            BranchRole::PullRequest => "PullRequest",
            BranchRole::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Maps branch names to roles using the configured naming conventions.
///
/// Matching is case-insensitive. Mainline and development names must match the
/// whole branch name, role prefixes match its start, and the pull request
/// pattern is a regular expression. The first matching rule wins in the order
/// Mainline, Development, Release, Hotfix, PullRequest, Feature.
#[derive(Debug, Clone)]
pub struct BranchClassifier {
    mainline: Vec<String>,
    development: Vec<String>,
    release_prefix: String,
    hotfix_prefix: String,
    feature_prefix: String,
    pull_request: Regex,
}

impl BranchClassifier {
    pub fn new(conventions: &BranchConventions) -> Result<Self> {
        let pull_request = RegexBuilder::new(&conventions.pull_request_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                VersionError::config(format!(
                    "Invalid pull_request_pattern '{}': {}",
                    conventions.pull_request_pattern, e
                ))
            })?;

        Ok(BranchClassifier {
            mainline: lowercase_all(&conventions.mainline),
            development: lowercase_all(&conventions.development),
            release_prefix: conventions.release_prefix.to_lowercase(),
            hotfix_prefix: conventions.hotfix_prefix.to_lowercase(),
            feature_prefix: conventions.feature_prefix.to_lowercase(),
            pull_request,
        })
    }

    pub fn classify(&self, branch_name: &str) -> BranchRole {
        let name = normalize_branch_name(branch_name).to_lowercase();

        if self.mainline.iter().any(|m| *m == name) {
            BranchRole::Mainline
        } else if self.development.iter().any(|d| *d == name) {
            BranchRole::Development
        } else if has_prefix(&name, &self.release_prefix) {
            BranchRole::Release
        } else if has_prefix(&name, &self.hotfix_prefix) {
            BranchRole::Hotfix
        } else if self.pull_request.is_match(&name) {
            BranchRole::PullRequest
        } else if has_prefix(&name, &self.feature_prefix) {
            BranchRole::Feature
        } else {
            BranchRole::Unknown
        }
    }

    /// Returns the part of a release or hotfix branch name after its prefix.
    pub fn version_fragment<'a>(&self, branch_name: &'a str, role: BranchRole) -> Option<&'a str> {
        let prefix = match role {
            BranchRole::Release => &self.release_prefix,
            BranchRole::Hotfix => &self.hotfix_prefix,
            _ => return None,
        };
        let name = normalize_branch_name(branch_name);
        if has_prefix(&name.to_lowercase(), prefix) {
            name.get(prefix.len()..)
        } else {
            None
        }
    }
}

/// One-shot classification when no classifier is kept around.
pub fn classify(branch_name: &str, conventions: &BranchConventions) -> Result<BranchRole> {
    Ok(BranchClassifier::new(conventions)?.classify(branch_name))
}

/// Strips a leading `refs/heads/` so full reference names classify like short names.
pub fn normalize_branch_name(branch_name: &str) -> &str {
    branch_name.strip_prefix("refs/heads/").unwrap_or(branch_name)
}

fn has_prefix(name: &str, prefix: &str) -> bool {
    !prefix.is_empty() && name.starts_with(prefix)
}

fn lowercase_all(names: &[String]) -> Vec<String> {
    names.iter().map(|n| n.to_lowercase()).collect()
}
