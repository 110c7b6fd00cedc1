//! Token substitution for version templates
//!
//! A template is free text with `{Token}` placeholders, e.g.
//! `{Major}.{Minor}.{Patch}-{Stage}.{PreRelease}+{ShortSha}`. Tokens are
//! case-sensitive. Unknown tokens stay in the output untouched so existing
//! custom strings never break a build.

use crate::boundary::BoundaryWarning;
use crate::config::StageLabels;
use crate::domain::SemanticVersion;

/// Template used for final versions when none is configured
pub const DEFAULT_FINAL_TEMPLATE: &str = "{Major}.{Minor}.{Patch}";

/// Template used for pre-release versions when none is configured
pub const DEFAULT_PRE_RELEASE_TEMPLATE: &str = "{Major}.{Minor}.{Patch}-{Stage}.{PreRelease}";

const SHORT_SHA_LEN: usize = 7;

/// Repository facts available to templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFacts {
    pub branch_name: String,
    pub sha: String,
    pub commits_since_version_source: u32,
}

/// Recognised template tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Major,
    Minor,
    Patch,
    Stage,
    PreRelease,
    BranchName,
    Sha,
    ShortSha,
    CommitsSinceVersionSource,
}

impl Token {
    pub fn from_name(name: &str) -> Option<Token> {
        let token = match name {
            "Major" => Token::Major,
            "Minor" => Token::Minor,
            "Patch" => Token::Patch,
            "Stage" => Token::Stage,
            "PreRelease" => Token::PreRelease,
            "BranchName" => Token::BranchName,
            "Sha" => Token::Sha,
            "ShortSha" => Token::ShortSha,
            "CommitsSinceVersionSource" => Token::CommitsSinceVersionSource,
            _ => return None,
        };
        Some(token)
    }

    fn value(
        &self,
        facts: &RepoFacts,
        version: &SemanticVersion,
        labels: &StageLabels,
    ) -> String {
        match self {
            Token::Major => version.major.to_string(),
            Token::Minor => version.minor.to_string(),
            Token::Patch => version.patch.to_string(),
            Token::Stage => labels.label(version.stage).to_string(),
            Token::PreRelease => version
                .pre_release
                .filter(|_| !version.stage.is_final())
                .map(|n| n.to_string())
                .unwrap_or_default(),
            Token::BranchName => facts.branch_name.clone(),
            Token::Sha => facts.sha.clone(),
            Token::ShortSha => facts
                .sha
                .get(..SHORT_SHA_LEN)
                .unwrap_or(&facts.sha)
                .to_string(),
            Token::CommitsSinceVersionSource => facts.commits_since_version_source.to_string(),
        }
    }
}

/// Result of rendering a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub warnings: Vec<BoundaryWarning>,
}

/// Template selected when the caller supplies an empty one
pub fn default_template(version: &SemanticVersion) -> &'static str {
    if version.stage.is_final() {
        DEFAULT_FINAL_TEMPLATE
    } else {
        DEFAULT_PRE_RELEASE_TEMPLATE
    }
}

/// Expand every recognised token in `template`.
///
/// A single left-to-right scan: substituted values are never rescanned, so a
/// branch name that happens to contain `{Major}` is emitted literally.
/// Braces around text containing whitespace or another `{` are copied
/// through; any other unrecognised name is reported as an unknown token.
pub fn resolve(
    template: &str,
    facts: &RepoFacts,
    version: &SemanticVersion,
    labels: &StageLabels,
) -> Rendered {
    let template = if template.is_empty() {
        default_template(version)
    } else {
        template
    };

    let mut text = String::with_capacity(template.len() + 16);
    let mut warnings = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        text.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find('}') else {
            text.push_str(&rest[open..]);
            rest = "";
            break;
        };

        let name = &after[..close];
        if !is_token_name(name) {
            text.push('{');
            rest = after;
            continue;
        }

        match Token::from_name(name) {
            Some(token) => text.push_str(&token.value(facts, version, labels)),
            None => {
                tracing::warn!(token = name, "unknown token left verbatim");
                text.push_str(&rest[open..open + close + 2]);
                warnings.push(BoundaryWarning::UnknownToken {
                    token: name.to_string(),
                });
            }
        }
        rest = &after[close + 1..];
    }
    text.push_str(rest);

    Rendered { text, warnings }
}

fn is_token_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c.is_whitespace() || c == '{')
}
