use crate::error::{Result, VersionError};
use std::fmt;
use std::str::FromStr;

/// Pre-release maturity of a version. Only `Final` is a real release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Final,
    Beta,
    Alpha,
    Unstable,
}

impl Stage {
    pub fn is_final(&self) -> bool {
        matches!(self, Stage::Final)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Final => "Final",
            Stage::Beta => "Beta",
            Stage::Alpha => "Alpha",
            Stage::Unstable => "Unstable",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "final" => Ok(Stage::Final),
            "beta" => Ok(Stage::Beta),
            "alpha" => Ok(Stage::Alpha),
            "unstable" => Ok(Stage::Unstable),
            _ => Err(VersionError::version(format!("Unknown stage: '{}'", s))),
        }
    }
}

/// Semantic version computed for a branch.
///
/// `pre_release` is present exactly when the stage is not `Final`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub stage: Stage,
    pub pre_release: Option<u32>,
}

impl SemanticVersion {
    /// A final (non pre-release) version
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            stage: Stage::Final,
            pre_release: None,
        }
    }

    /// Same numbers, different stage. The pre-release number is reset to
    /// `Some(pre_release)` for non-final stages and dropped otherwise.
    pub fn with_stage(&self, stage: Stage, pre_release: u32) -> Self {
        SemanticVersion {
            stage,
            pre_release: if stage.is_final() {
                None
            } else {
                Some(pre_release)
            },
            ..*self
        }
    }

    /// Version the development line works towards after this one
    pub fn next_minor(&self) -> Result<Self> {
        let minor = self.minor.checked_add(1).ok_or_else(|| {
            VersionError::version(format!("Minor version of {} cannot be incremented", self))
        })?;
        Ok(SemanticVersion::new(self.major, minor, 0))
    }

    pub fn next_patch(&self) -> Result<Self> {
        let patch = self.patch.checked_add(1).ok_or_else(|| {
            VersionError::version(format!("Patch version of {} cannot be incremented", self))
        })?;
        Ok(SemanticVersion::new(self.major, self.minor, patch))
    }

    /// Major.Minor.Patch only
    pub fn core(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }

    /// Four-part numeric form for binary metadata.
    ///
    /// Strong-named consumers need strict compatibility between builds of the
    /// same version, so the pre-release number is dropped for them.
    pub fn numeric(&self, strong_named: bool) -> NumericVersion {
        let revision = if strong_named {
            0
        } else {
            self.pre_release.unwrap_or(0)
        };
        NumericVersion {
            major: self.major,
            minor: self.minor,
            patch: self.patch,
            revision,
        }
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        match self.pre_release {
            Some(n) if !self.stage.is_final() => write!(f, "-{}.{}", self.stage, n),
            _ => Ok(()),
        }
    }
}

impl FromStr for SemanticVersion {
    type Err = VersionError;

    /// Parses `1.2.3` or `1.2.3-Beta.4`
    fn from_str(s: &str) -> Result<Self> {
        let (core, pre) = match s.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (s, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() != 3 {
            return Err(VersionError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                s
            )));
        }
        let number = |part: &str, what: &str| {
            part.parse::<u32>()
                .map_err(|_| VersionError::version(format!("Invalid {} version: {}", what, part)))
        };
        let version = SemanticVersion::new(
            number(parts[0], "major")?,
            number(parts[1], "minor")?,
            number(parts[2], "patch")?,
        );

        match pre {
            None => Ok(version),
            Some(pre) => {
                let (stage, n) = pre.split_once('.').ok_or_else(|| {
                    VersionError::version(format!("Invalid pre-release '{}' in '{}'", pre, s))
                })?;
                let stage: Stage = stage.parse()?;
                if stage.is_final() {
                    return Err(VersionError::version(format!(
                        "Final versions carry no pre-release: '{}'",
                        s
                    )));
                }
                Ok(version.with_stage(stage, number(n, "pre-release")?))
            }
        }
    }
}

/// Four-part numeric version written into binary metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub revision: u32,
}

impl fmt::Display for NumericVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.revision
        )
    }
}

/// A commit together with the version its lineage starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionAnchor {
    pub commit: git2::Oid,
    pub base: SemanticVersion,
}
