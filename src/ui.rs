//! Terminal output. Status and warnings go to stderr; stdout carries only
//! the version output so it can be captured by build scripts.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::orchestration::VersionReport;

/// Prefix of every variable written by [format_env]
pub const ENV_PREFIX: &str = "GITFLOW_";

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Human readable summary of a resolved version
pub fn display_summary(report: &VersionReport) {
    let resolved = &report.resolved;
    eprintln!(
        "{} {} ({})",
        style("Branch:").bold(),
        resolved.branch_name,
        resolved.role
    );
    eprintln!(
        "{} {} at {}",
        style("Version source:").bold(),
        resolved.anchor.base,
        short_sha(&resolved.anchor.commit.to_string())
    );
    eprintln!(
        "{} {}",
        style("Commits since version source:").bold(),
        resolved.commits_since_version_source
    );
    eprintln!(
        "{} {}",
        style("Numeric version:").bold(),
        style(report.numeric).cyan()
    );
}

/// `KEY=VALUE` lines for build scripts, one variable per line.
///
/// `STAGE` carries the configured label; `SEMVER` always uses the canonical
/// stage names so it stays parseable.
pub fn format_env(report: &VersionReport) -> String {
    let resolved = &report.resolved;
    let version = &resolved.version;
    let sha = resolved.sha.to_string();

    let pairs: Vec<(&str, String)> = vec![
        ("MAJOR", version.major.to_string()),
        ("MINOR", version.minor.to_string()),
        ("PATCH", version.patch.to_string()),
        ("STAGE", report.stage_label.clone()),
        (
            "PRERELEASE",
            version.pre_release.map(|n| n.to_string()).unwrap_or_default(),
        ),
        ("SEMVER", version.to_string()),
        ("NUMERIC_VERSION", report.numeric.to_string()),
        ("INFORMATIONAL_VERSION", report.informational.clone()),
        ("BRANCH_NAME", resolved.branch_name.clone()),
        ("SHORT_SHA", short_sha(&sha).to_string()),
        ("SHA", sha.clone()),
        (
            "COMMITS_SINCE_VERSION_SOURCE",
            resolved.commits_since_version_source.to_string(),
        ),
        ("IS_DIRTY", resolved.is_dirty.to_string()),
    ];

    pairs
        .into_iter()
        .map(|(key, value)| format!("{}{}={}\n", ENV_PREFIX, key, value))
        .collect()
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ResolvedVersion;
    use crate::domain::{BranchRole, SemanticVersion, Stage, VersionAnchor};
    use git2::Oid;

    fn report() -> VersionReport {
        let sha = Oid::from_str("0123456789abcdef0123456789abcdef01234567").unwrap();
        let version = SemanticVersion::new(1, 2, 0).with_stage(Stage::Beta, 3);
        VersionReport {
            resolved: ResolvedVersion {
                branch_name: "release/1.2.0".to_string(),
                role: BranchRole::Release,
                anchor: VersionAnchor {
                    commit: sha,
                    base: SemanticVersion::new(1, 2, 0),
                },
                version,
                sha,
                commits_since_version_source: 3,
                is_dirty: false,
                warnings: Vec::new(),
            },
            informational: "1.2.0-Beta.3".to_string(),
            numeric: version.numeric(false),
            stage_label: "rc".to_string(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_format_env() {
        let env = format_env(&report());
        assert!(env.contains("GITFLOW_SEMVER=1.2.0-Beta.3\n"));
        assert!(env.contains("GITFLOW_STAGE=rc\n"));
        assert!(env.contains("GITFLOW_PRERELEASE=3\n"));
        assert!(env.contains("GITFLOW_NUMERIC_VERSION=1.2.0.3\n"));
        assert!(env.contains("GITFLOW_SHORT_SHA=0123456\n"));
        assert!(env.contains("GITFLOW_BRANCH_NAME=release/1.2.0\n"));
        assert!(env.contains("GITFLOW_IS_DIRTY=false\n"));
        assert!(env.lines().all(|line| line.starts_with(ENV_PREFIX)));
    }

    #[test]
    fn test_short_sha() {
        assert_eq!(short_sha("0123456789"), "0123456");
        assert_eq!(short_sha("abc"), "abc");
    }
}
