use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sandworm",
    version,
    about = "Project file concatenator",
    long_about = "sandworm concatenates a project's text files into a single document with a\ndirectory-tree header and per-file separators, and keeps that document\nsynchronized with a Claude project. Running without a subcommand is\nequivalent to 'push'.",
    after_help = "EXAMPLES:\n  sandworm                     Generate and push the current directory\n  sandworm generate ../app     Generate ../app into sandworm.txt\n  sandworm push -k             Push and keep the generated file\n  sandworm config set processor.print_line_numbers true"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Root directory to process when no subcommand is given.
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    #[clap(flatten)]
    pub shared: SharedOpts,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

/// Options shared by the generate and push commands. The line-number and
/// symlink pairs are tri-state: when neither flag of a pair is given, the
/// value stored in config (or the compiled-in default) applies.
#[derive(Args, Debug, Clone, Default)]
pub struct SharedOpts {
    #[arg(
        short = 'o',
        long,
        global = true,
        value_name = "FILE",
        help = "Output file (default depends on the command).",
        help_heading = "Output"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Ignore file (default: .sandwormignore, then .gitignore).",
        help_heading = "File Selection"
    )]
    pub ignore: Option<PathBuf>,

    #[arg(
        short = 'k',
        long,
        global = true,
        help = "Keep the generated file after pushing.",
        help_heading = "Output"
    )]
    pub keep: bool,

    #[arg(
        long,
        global = true,
        overrides_with = "no_line_numbers",
        help = "Prefix file contents with line numbers.",
        help_heading = "Output"
    )]
    pub line_numbers: bool,

    #[arg(
        long,
        global = true,
        overrides_with = "line_numbers",
        help = "Disable line numbers (overrides stored config).",
        help_heading = "Output"
    )]
    pub no_line_numbers: bool,

    #[arg(
        long,
        global = true,
        overrides_with = "no_follow_symlinks",
        help = "Follow symbolic links during traversal.",
        help_heading = "File Selection"
    )]
    pub follow_symlinks: bool,

    #[arg(
        long,
        global = true,
        overrides_with = "follow_symlinks",
        help = "Do not follow symbolic links (overrides stored config).",
        help_heading = "File Selection"
    )]
    pub no_follow_symlinks: bool,
}

impl SharedOpts {
    pub fn line_numbers(&self) -> Option<bool> {
        if self.line_numbers {
            Some(true)
        } else if self.no_line_numbers {
            Some(false)
        } else {
            None
        }
    }

    pub fn follow_symlinks(&self) -> Option<bool> {
        if self.follow_symlinks {
            Some(true)
        } else if self.no_follow_symlinks {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(visible_alias = "g", about = "Generate the concatenated file only.")]
    Generate(DirArg),

    #[command(
        visible_alias = "p",
        about = "Generate and push to the configured Claude project."
    )]
    Push(DirArg),

    #[command(about = "Remove all documents from the Claude project.")]
    Purge,

    #[command(about = "Configure Claude credentials and project selection.")]
    Setup,

    #[command(about = "Manage persistent configuration values.")]
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct DirArg {
    #[arg(
        value_name = "DIRECTORY",
        help = "Root directory to process (default: current dir)."
    )]
    pub directory: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    #[command(about = "List all configuration options and their current values.")]
    List,

    #[command(about = "Get a configuration value.")]
    Get { key: String },

    #[command(about = "Set a configuration value.")]
    Set { key: String, value: String },

    #[command(about = "Unset a configuration value.")]
    Unset { key: String },
}
