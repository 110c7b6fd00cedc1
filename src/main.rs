use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use gitflow_version::cli::{run_resolve_workflow, ResolveWorkflowArgs, WorkflowResult};
use gitflow_version::context::BuildContext;
use gitflow_version::{logging, ui};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Informational version on stdout, summary on stderr
    Text,
    /// GITFLOW_* variables for build scripts
    Env,
}

#[derive(clap::Parser)]
#[command(
    name = "gitflow-version",
    version,
    about = "Derive a semantic version from GitFlow branch topology"
)]
struct Args {
    #[arg(short, long, default_value = ".", help = "Directory inside the repository")]
    path: PathBuf,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Resolve this branch instead of HEAD")]
    branch: Option<String>,

    #[arg(short, long, help = "Informational version template")]
    template: Option<String>,

    #[arg(long, help = "Fail when a release or hotfix name has no version")]
    strict: bool,

    #[arg(long, help = "Drop the pre-release counter from the numeric version")]
    strong_named: bool,

    #[arg(long, help = "Treat this run as an automated build")]
    build_agent: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = logging::init_tracing(args.verbose) {
        eprintln!("{}", e);
    }

    let context = if args.build_agent {
        BuildContext::agent("--build-agent")
    } else {
        BuildContext::detect()
    };

    let workflow_args = ResolveWorkflowArgs {
        path: args.path,
        config_path: args.config,
        branch: args.branch,
        template: args.template,
        strict: args.strict,
        strong_named: args.strong_named,
    };

    let result = match run_resolve_workflow(&workflow_args, &context) {
        Ok(result) => result,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    match result {
        WorkflowResult::Skipped(reason) => {
            ui::display_status(&reason.to_string());
        }
        WorkflowResult::Versioned(report) => {
            for warning in &report.warnings {
                ui::display_boundary_warning(warning);
            }
            match args.output {
                OutputFormat::Text => {
                    ui::display_summary(&report);
                    println!("{}", report.informational);
                }
                OutputFormat::Env => print!("{}", ui::format_env(&report)),
            }
        }
    }

    Ok(())
}
