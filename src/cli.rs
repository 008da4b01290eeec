//! Command-line surface.

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};

#[derive(Debug, Parser)]
#[command(version, about = "Compile a source directory into a Roblox XML model")]
pub struct Cli {
    /// Verbosity, `-v` through `-vvvv` and `-q` through `-qqqq`
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
    /// Folder holding the source tree and the optional rbxbuild.json
    #[arg(default_value = ".")]
    pub folder: String,

    /// Destination path for the assembled document; repeat for multiple
    /// copies. Overrides the project file.
    #[arg(short, long)]
    pub output: Vec<String>,

    /// Only compile files whose name matches this regex
    #[arg(long)]
    pub filter: Option<String>,

    /// Skip the best-effort script syntax scan
    #[arg(long)]
    pub no_syntax_check: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compile the source tree once
    Build(BuildArgs),
    /// Compile, then recompile whenever the source tree changes
    Watch(BuildArgs),
}
