use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "roadie")]
#[command(version)]
#[command(about = "Provision the SUMO traffic simulator from source", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full provisioning plan (default when no command is given)
    Up(UpArgs),

    /// Show the provisioning plan without executing it
    Plan(PlanArgs),

    /// Print the environment exports for the install directory
    Env(EnvArgs),

    /// Check that the external tools the plan invokes are available
    Doctor,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Default)]
pub struct UpArgs {
    /// Dry run - show what would be done
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompts
    #[arg(short, long)]
    pub yes: bool,

    /// Skip specific stages (comma-separated: packages,sources,configure,compile)
    #[arg(long)]
    pub skip: Option<String>,

    /// Only run specific stages (comma-separated)
    #[arg(long)]
    pub only: Option<String>,

    /// Override the install directory
    #[arg(long)]
    pub install_dir: Option<String>,

    /// Parallel jobs for the compile step (defaults to CPU count)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Parser, Default)]
pub struct PlanArgs {
    /// Skip specific stages (comma-separated: packages,sources,configure,compile)
    #[arg(long)]
    pub skip: Option<String>,

    /// Only show specific stages (comma-separated)
    #[arg(long)]
    pub only: Option<String>,

    /// Override the install directory
    #[arg(long)]
    pub install_dir: Option<String>,
}

#[derive(Parser, Default)]
pub struct EnvArgs {
    /// Override the install directory
    #[arg(long)]
    pub install_dir: Option<String>,
}
