use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git_stamp::cli::orchestration::{run_stamp_workflow, StampWorkflowArgs};
use git_stamp::config::{self, OutputFormat, Overrides};
use git_stamp::git::{Git2Repository, GitCli, RepositoryReader};
use git_stamp::{output, ui};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Run the git binary
    Cli,
    /// Read the repository through libgit2
    Git2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Github,
    Env,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Github => OutputFormat::Github,
            Format::Env => OutputFormat::Env,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(clap::Parser)]
#[command(
    name = "git-stamp",
    version,
    about = "Derive a semver build stamp from the state of a git checkout"
)]
struct Args {
    #[arg(
        short,
        long,
        help = "Repository root (defaults to $GITHUB_WORKSPACE, then the current directory)"
    )]
    repo: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Use this commit instead of HEAD (falls back to $GIT_COMMIT)")]
    commit: Option<String>,

    #[arg(long, help = "Force the tree state: clean or dirty (falls back to $GIT_TREE_STATE)")]
    tree_state: Option<String>,

    #[arg(long, value_enum, default_value_t = Backend::Cli, help = "How the repository is read")]
    backend: Backend,

    #[arg(short, long, value_enum, help = "Output format (overrides the config file)")]
    format: Option<Format>,

    #[arg(long, help = "Skip fetching the full history")]
    no_unshallow: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "git_stamp=warn",
        1 => "git_stamp=info",
        _ => "git_stamp=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let in_github_actions = env_value("GITHUB_ACTIONS").as_deref() == Some("true");

    match run(args, in_github_actions) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            ui::report_failure(&format!("{:#}", e), in_github_actions);
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when outputs were emitted but the version is not valid semver.
fn run(args: Args, in_github_actions: bool) -> Result<bool> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    let cwd = env::current_dir().ok();
    let workspace = env_value("GITHUB_WORKSPACE");
    let repo =
        config::resolve_repo_path(args.repo.as_deref(), workspace.as_deref(), cwd.as_deref())?;

    let commit_env = env_value("GIT_COMMIT");
    let tree_state_env = env_value("GIT_TREE_STATE");
    let overrides = Overrides::resolve(
        args.commit.as_deref(),
        commit_env.as_deref(),
        args.tree_state.as_deref(),
        tree_state_env.as_deref(),
    )?;

    let reader: Box<dyn RepositoryReader> = match args.backend {
        Backend::Cli => Box::new(GitCli::new(&repo)),
        Backend::Git2 => Box::new(
            Git2Repository::open(&repo)
                .with_context(|| format!("Git repository error at '{}'", repo.display()))?,
        ),
    };

    let workflow_args = StampWorkflowArgs {
        repo: repo.clone(),
        overrides,
        unshallow: !args.no_unshallow,
    };

    ui::display_status(&format!("Deriving version for {}", repo.display()));
    let result =
        run_stamp_workflow(reader.as_ref(), &workflow_args, &config, chrono::Utc::now())?;

    for warning in result.warnings.iter().filter(|w| !w.is_failure()) {
        ui::display_boundary_warning(warning);
    }

    let format = args.format.map(OutputFormat::from).unwrap_or(config.output.format);
    let github_output = env_value("GITHUB_OUTPUT").map(PathBuf::from);
    let mut sink = output::sink_for(format, github_output);
    sink.emit(&result.outputs).context("Failed to write outputs")?;

    ui::display_outputs(&result.outputs);

    if let Some(message) = result.failure_message() {
        ui::report_failure(&message, in_github_actions);
        return Ok(false);
    }

    ui::display_success(&format!("Stamped {}", result.outputs.scm_revision));
    Ok(true)
}
