//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;

/// Named-node trees: inspect tree literals, resolve paths, bubble events
#[derive(Parser, Debug)]
#[command(name = "nodetree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Directory with a local .nodetree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a tree literal
    Show {
        /// Tree literal (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Override the configured output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print the node at a path below the root
    Get {
        /// Tree literal (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node path relative to the root, e.g. dir1/file1
        path: String,
    },

    /// Find the first node (pre-order) whose data equals a value
    Find {
        /// Tree literal (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Data to match; parsed as JSON, else taken as a string
        data: String,
    },

    /// List the paths of all leaf nodes
    Leaves {
        /// Tree literal (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Remove the node at a path and print the remaining tree literal
    Remove {
        /// Tree literal (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node path relative to the root
        path: String,
        /// Write the result here instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Emit an event at a node and show how it bubbles to the root
    Emit {
        /// Tree literal (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node path relative to the root (empty = root)
        path: String,
        /// Event name
        event: String,
        /// Event payload (JSON)
        #[arg(short, long)]
        payload: Option<String>,
    },

    /// Build and print the sample Root/Child tree
    Demo,

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
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Show the global config file location
    Path,
}
