//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Flatten trees into nested-set encodings and walk them
#[derive(Parser, Debug)]
#[command(name = "nested-sets")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Explicit config file, layered over the global one
    #[arg(short, long, global = true, env = "NESTED_SETS_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a nested set and print its entries
    Build {
        #[command(flatten)]
        source: TreeSource,
        /// Print entries as TOML instead of a table
        #[arg(long)]
        toml: bool,
    },

    /// Show the source tree and its nested set side by side
    Tree {
        #[command(flatten)]
        source: TreeSource,
    },

    /// Step through the nested set, extracting subtrees at the given ids
    Walk {
        #[command(flatten)]
        source: TreeSource,
        /// Ids whose subtree is extracted when the cursor reaches them
        #[arg(short, long, value_delimiter = ',')]
        extract: Vec<i64>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Where the input tree comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct TreeSource {
    /// Use the six-node sample tree 1 -> {2 -> {3, 4}, 5 -> {6}}
    #[arg(long, conflicts_with_all = ["depth", "fanout"])]
    pub sample: bool,

    /// Levels below the root of the generated tree (default from settings)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Children per internal node of the generated tree (default from settings)
    #[arg(long)]
    pub fanout: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective settings
    Show,
    /// Print a commented template config file
    Template,
    /// Print the global config file location
    Path,
}
