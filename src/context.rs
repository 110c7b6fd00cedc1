//! Process-wide facts decided once at start-up and injected into the resolver

use std::env;

/// Environment variables that identify an automated build agent
const BUILD_AGENT_VARIABLES: &[&str] = &[
    "TEAMCITY_VERSION",
    "TF_BUILD",
    "GITHUB_ACTIONS",
    "JENKINS_URL",
    "GITLAB_CI",
    "CI",
];

/// Where the resolver is running.
///
/// On a build agent a missing or empty repository is fatal: automated builds
/// must not silently ship unversioned artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildContext {
    /// Name of the variable (or flag) that identified the build agent
    pub build_agent: Option<String>,
}

impl BuildContext {
    /// Interactive developer machine
    pub fn local() -> Self {
        BuildContext { build_agent: None }
    }

    /// Explicitly marked build agent
    pub fn agent(name: impl Into<String>) -> Self {
        BuildContext {
            build_agent: Some(name.into()),
        }
    }

    /// Inspect the process environment
    pub fn detect() -> Self {
        let build_agent = BUILD_AGENT_VARIABLES
            .iter()
            .find(|name| {
                env::var(name)
                    .map(|value| !value.is_empty() && !value.eq_ignore_ascii_case("false"))
                    .unwrap_or(false)
            })
            .map(|name| name.to_string());

        if let Some(name) = &build_agent {
            tracing::debug!(variable = %name, "build agent detected");
        }
        BuildContext { build_agent }
    }

    pub fn is_build_agent(&self) -> bool {
        self.build_agent.is_some()
    }
}
