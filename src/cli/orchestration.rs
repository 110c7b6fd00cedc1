//! Main workflow orchestration logic
//!
//! Keeps the resolve-and-render workflow separate from argument parsing and
//! terminal output so it can be driven programmatically without clap.

use std::path::PathBuf;

use crate::analyzer::{open_repository, skip_or_fail, ResolvedVersion, SkipReason, VersionResolver};
use crate::boundary::BoundaryWarning;
use crate::config::{self, Config};
use crate::context::BuildContext;
use crate::domain::NumericVersion;
use crate::error::Result;

/// Arguments for the resolve workflow
///
/// Mirrors the CLI Args in a format suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolveWorkflowArgs {
    /// Directory inside the repository
    pub path: PathBuf,

    /// Path to custom config file
    pub config_path: Option<PathBuf>,

    /// Resolve this branch instead of HEAD
    pub branch: Option<String>,

    /// Informational version template; overrides the configured one
    pub template: Option<String>,

    /// Force strict branch name parsing
    pub strict: bool,

    /// Force a strong-named numeric version
    pub strong_named: bool,
}

/// Everything the metadata writers need from a resolved run
#[derive(Debug, Clone, PartialEq)]
pub struct VersionReport {
    pub resolved: ResolvedVersion,
    /// Rendered informational version
    pub informational: String,
    pub numeric: NumericVersion,
    /// Stage text after `[labels]` overrides, as rendered by `{Stage}`
    pub stage_label: String,
    /// Resolution and rendering warnings, in the order they were found
    pub warnings: Vec<BoundaryWarning>,
}

/// Result of the resolve workflow
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowResult {
    Versioned(VersionReport),
    Skipped(SkipReason),
}

/// Apply command line overrides on top of the loaded configuration
pub fn apply_overrides(mut config: Config, args: &ResolveWorkflowArgs) -> Config {
    if args.strict {
        config.behavior.strict = true;
    }
    if args.strong_named {
        config.behavior.strong_named = true;
    }
    if let Some(template) = &args.template {
        config.behavior.template = template.clone();
    }
    config
}

/// Main resolve workflow
///
/// 1. Open the repository (skip or fail when there is nothing to version)
/// 2. Load configuration from the repository work directory
/// 3. Resolve HEAD or the requested branch
/// 4. Render the informational version and compute the numeric version
pub fn run_resolve_workflow(
    args: &ResolveWorkflowArgs,
    context: &BuildContext,
) -> Result<WorkflowResult> {
    let repo = match open_repository(&args.path)? {
        Ok(repo) => repo,
        Err(reason) => return Ok(WorkflowResult::Skipped(skip_or_fail(context, reason)?)),
    };

    let loaded = config::load_config(args.config_path.as_deref(), repo.work_dir())?;
    let config = apply_overrides(loaded, args);
    let resolver = VersionResolver::new(config, context.clone())?;

    let resolved = match &args.branch {
        Some(branch) => resolver.resolve_branch(&repo, branch)?,
        None => resolver.resolve(&repo)?,
    };

    Ok(WorkflowResult::Versioned(report(&resolver, resolved)))
}

fn report(resolver: &VersionResolver, resolved: ResolvedVersion) -> VersionReport {
    let behavior = &resolver.config().behavior;
    let rendered = resolver.render(&behavior.template, &resolved);
    let numeric = resolved.version.numeric(behavior.strong_named);
    let stage_label = resolver
        .config()
        .labels
        .label(resolved.version.stage)
        .to_string();

    let mut warnings = resolved.warnings.clone();
    warnings.extend(rendered.warnings);

    VersionReport {
        resolved,
        informational: rendered.text,
        numeric,
        stage_label,
        warnings,
    }
}
