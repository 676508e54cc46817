use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Compact,
}

#[derive(Parser)]
#[command(name = "bkmon")]
#[command(about = "Buildkite pipeline status for your terminal dashboard", version)]
#[command(after_help = "EXAMPLES:
    bkmon pipelines                   List pipelines you can watch
    bkmon status                      Status of the configured projects
    bkmon status acme/web acme/api    Status of specific projects
    bkmon watch --interval 30         Refresh status every 30 seconds")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json, compact)
    #[arg(long, short = 'o', global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Output as JSON (alias for --format json)
    #[arg(long, global = true, hide = true)]
    pub json: bool,

    /// Show debug logs and detailed error information
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Get the effective output format, considering --json flag
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every pipeline visible to your token
    #[command(after_help = "EXAMPLES:
    bkmon pipelines
    bkmon pipelines --json")]
    Pipelines,
    /// Show the latest build status of each project
    #[command(after_help = "EXAMPLES:
    bkmon status
    bkmon status acme/web acme/api
    bkmon status -o compact")]
    Status(ProjectArgs),
    /// Poll project status repeatedly
    #[command(after_help = "EXAMPLES:
    bkmon watch
    bkmon watch acme/web --interval 15")]
    Watch(WatchArgs),
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    bkmon completions bash > ~/.bash_completion.d/bkmon
    bkmon completions zsh > ~/.zfunc/_bkmon
    bkmon completions fish > ~/.config/fish/completions/bkmon.fish")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    bkmon init")]
    Init,
}

#[derive(Args, Clone)]
pub struct ProjectArgs {
    /// Projects as <org>/<pipeline> (defaults to the configured list)
    pub projects: Vec<String>,
}

#[derive(Args, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub projects: ProjectArgs,

    /// Seconds between polls (defaults to the configured interval)
    #[arg(long, short)]
    pub interval: Option<u64>,
}
