//! Versions encoded in reference names (tags and release/hotfix branches)

use std::sync::OnceLock;

use git2::Oid;
use regex::Regex;

use crate::domain::{SemanticVersion, TagRef};

/// A tag whose name parses as a final semantic version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    pub name: String,
    pub target: Oid,
    pub version: SemanticVersion,
}

impl VersionTag {
    /// `None` when the tag name is not a release version
    pub fn from_ref(tag: &TagRef, prefix: &str) -> Option<Self> {
        parse_tag_version(&tag.name, prefix).map(|version| VersionTag {
            name: tag.name.clone(),
            target: tag.target,
            version,
        })
    }
}

/// Parse a final version from a tag name (e.g., "v1.2.3" -> 1.2.3).
///
/// The configured prefix is stripped case-insensitively. Tags carrying a
/// pre-release component are not release tags and yield `None`; build
/// metadata is ignored.
pub fn parse_tag_version(tag: &str, prefix: &str) -> Option<SemanticVersion> {
    let clean = strip_prefix_ignore_case(tag, prefix);
    let parsed = semver::Version::parse(clean).ok()?;
    if !parsed.pre.is_empty() {
        return None;
    }

    Some(SemanticVersion::new(
        u32::try_from(parsed.major).ok()?,
        u32::try_from(parsed.minor).ok()?,
        u32::try_from(parsed.patch).ok()?,
    ))
}

/// Parse `Major.Minor[.Patch]` from the part of a branch name after its role prefix.
///
/// Accepts an optional leading `v` and trailing text after the numbers
/// (`1.2`, `v1.2.3`, `1.2.0-rc`). Patch defaults to zero.
pub fn parse_branch_version(fragment: &str) -> Option<SemanticVersion> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"^[vV]?(\d+)\.(\d+)(?:\.(\d+))?(?:$|[^\d.])").expect("static regex is valid")
    });

    let captures = re.captures(fragment)?;
    let major = captures.get(1)?.as_str().parse::<u32>().ok()?;
    let minor = captures.get(2)?.as_str().parse::<u32>().ok()?;
    let patch = match captures.get(3) {
        Some(m) => m.as_str().parse::<u32>().ok()?,
        None => 0,
    };

    Some(SemanticVersion::new(major, minor, patch))
}

fn strip_prefix_ignore_case<'a>(name: &'a str, prefix: &str) -> &'a str {
    match name.get(..prefix.len()) {
        Some(head) if !prefix.is_empty() && head.eq_ignore_ascii_case(prefix) => {
            &name[prefix.len()..]
        }
        _ => name,
    }
}
