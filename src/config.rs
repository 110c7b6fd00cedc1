use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{BranchClassifier, Stage};
use crate::error::{Result, VersionError};

/// File name looked up in the repository work directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "gitflow-version.toml";

/// Represents the complete configuration for gitflow-version.
///
/// Contains branch naming conventions, tag parsing, stage label overrides and behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub branches: BranchConventions,

    #[serde(default)]
    pub tags: TagConfig,

    #[serde(default)]
    pub labels: StageLabels,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_mainline() -> Vec<String> {
    vec!["master".to_string(), "main".to_string()]
}

fn default_development() -> Vec<String> {
    vec!["develop".to_string()]
}

fn default_release_prefix() -> String {
    "release/".to_string()
}

fn default_hotfix_prefix() -> String {
    "hotfix/".to_string()
}

fn default_feature_prefix() -> String {
    "feature/".to_string()
}

fn default_pull_request_pattern() -> String {
    "^(pull|pull-requests|pr)[/-]".to_string()
}

/// Branch naming conventions used to classify branches.
///
/// Mainline and development entries are whole branch names; the other roles
/// are recognised by prefix, pull requests by a regular expression.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchConventions {
    #[serde(default = "default_mainline")]
    pub mainline: Vec<String>,

    #[serde(default = "default_development")]
    pub development: Vec<String>,

    #[serde(default = "default_release_prefix")]
    pub release_prefix: String,

    #[serde(default = "default_hotfix_prefix")]
    pub hotfix_prefix: String,

    #[serde(default = "default_feature_prefix")]
    pub feature_prefix: String,

    #[serde(default = "default_pull_request_pattern")]
    pub pull_request_pattern: String,
}

impl Default for BranchConventions {
    fn default() -> Self {
        BranchConventions {
            mainline: default_mainline(),
            development: default_development(),
            release_prefix: default_release_prefix(),
            hotfix_prefix: default_hotfix_prefix(),
            feature_prefix: default_feature_prefix(),
            pull_request_pattern: default_pull_request_pattern(),
        }
    }
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

/// How version tags are named on the mainline
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagConfig {
    #[serde(default = "default_tag_prefix")]
    pub prefix: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        TagConfig {
            prefix: default_tag_prefix(),
        }
    }
}

/// Optional overrides for the text rendered by the `{Stage}` token
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct StageLabels {
    #[serde(default)]
    pub r#final: Option<String>,
    #[serde(default)]
    pub beta: Option<String>,
    #[serde(default)]
    pub alpha: Option<String>,
    #[serde(default)]
    pub unstable: Option<String>,
}

impl StageLabels {
    pub fn label(&self, stage: Stage) -> &str {
        let custom = match stage {
            Stage::Final => self.r#final.as_deref(),
            Stage::Beta => self.beta.as_deref(),
            Stage::Alpha => self.alpha.as_deref(),
            Stage::Unstable => self.unstable.as_deref(),
        };
        custom.unwrap_or_else(|| stage.name())
    }
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BehaviorConfig {
    /// Treat release/hotfix branch names without a version as fatal
    #[serde(default)]
    pub strict: bool,

    /// Informational version template; empty selects the default template
    #[serde(default)]
    pub template: String,

    /// Drop the pre-release number from the numeric version
    #[serde(default)]
    pub strong_named: bool,
}

impl Config {
    /// Checks settings that can only be validated after parsing
    pub fn validate(&self) -> Result<()> {
        BranchClassifier::new(&self.branches)?;
        if self.branches.mainline.is_empty() {
            return Err(VersionError::config(
                "branches.mainline must name at least one branch",
            ));
        }
        Ok(())
    }
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(text).map_err(|e| VersionError::config(format!("Invalid TOML: {}", e)))?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitflow-version.toml` in the repository work directory
/// 3. `gitflow-version.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `work_dir` - Optional repository work directory
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>, work_dir: Option<&Path>) -> Result<Config> {
    match find_config_file(config_path, work_dir) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            let text = fs::read_to_string(&path).map_err(|e| {
                VersionError::config(format!("Cannot read '{}': {}", path.display(), e))
            })?;
            parse_config(&text)
        }
        None => Ok(Config::default()),
    }
}

fn find_config_file(config_path: Option<&Path>, work_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(path.to_path_buf());
    }

    if let Some(dir) = work_dir {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            return Some(candidate);
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|candidate| candidate.exists())
}
