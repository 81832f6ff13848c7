//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::InsertMode;

/// Binary search tree playground: ordered and leftmost-corrupt insertion, validation, adaptive search and level layout
#[derive(Parser, Debug)]
#[command(name = "treeartist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output on stderr, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Additional config file, layered over the global one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Insertion policy as given on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Keep the search order
    Ordered,
    /// Always insert at the leftmost position
    #[value(alias = "corrupt")]
    LeftmostCorrupt,
}

impl From<ModeArg> for InsertMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Ordered => InsertMode::Ordered,
            ModeArg::LeftmostCorrupt => InsertMode::LeftmostCorrupt,
        }
    }
}

/// How to build the tree a command works on.
#[derive(Args, Debug, Clone)]
pub struct TreeInput {
    /// Initial values, e.g. "5, 3, 7"
    #[arg(allow_hyphen_values = true)]
    pub values: String,

    /// Insertion policy for the initial values (default from config)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Values inserted at the leftmost position after the initial build
    #[arg(long = "corrupt", value_delimiter = ',', allow_negative_numbers = true)]
    pub corrupt: Vec<i64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display the tree with height and validity
    Show {
        #[command(flatten)]
        input: TreeInput,
    },

    /// Print the labeled preorder outline and the height
    Outline {
        #[command(flatten)]
        input: TreeInput,
    },

    /// List level slots, `-` marks an empty slot
    Levels {
        #[command(flatten)]
        input: TreeInput,
        /// Only this level (1 = root)
        #[arg(short, long)]
        level: Option<usize>,
    },

    /// Look up a value
    Search {
        #[command(flatten)]
        input: TreeInput,
        /// Value to look for
        #[arg(short = 'v', long = "value", allow_negative_numbers = true)]
        target: i64,
    },

    /// Check the search tree order
    Validate {
        #[command(flatten)]
        input: TreeInput,
    },

    /// Print canvas, node and edge coordinates
    Layout {
        #[command(flatten)]
        input: TreeInput,
    },

    /// Read values from stdin and grow the tree step by step
    Interactive {
        /// Insertion policy (default from config)
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,
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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a config template
    Template,

    /// Show config paths
    Path,
}
