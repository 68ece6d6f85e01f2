//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Concept map toolkit: generate, inspect, and export mind map diagrams
#[derive(Parser, Debug)]
#[command(name = "conceptmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-d, -dd, -ddd)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a concept tree from text and/or a file
    Generate {
        /// Concept description, e.g. "Photosynthesis"
        concept: Option<String>,

        /// PDF or image to submit alongside (or instead of) the text
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,

        /// Write the normalized tree to a JSON file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Skip the service, always use the local placeholder tree
        #[arg(long)]
        offline: bool,

        /// Print the tree as JSON instead of an ASCII tree
        #[arg(long)]
        json: bool,
    },

    /// Show a stored tree file as an ASCII tree
    Show {
        /// Tree JSON file (any recognized payload shape)
        tree: PathBuf,
    },

    /// Compute and print node positions for a stored tree
    Layout {
        /// Tree JSON file
        tree: PathBuf,

        /// Canvas width override
        #[arg(long)]
        width: Option<f32>,

        /// Canvas height override
        #[arg(long)]
        height: Option<f32>,

        /// Print positions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a stored tree to a PNG image
    Export {
        /// Tree JSON file
        tree: PathBuf,

        /// Output image path (default: concept-map.png)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Copy the image to the system clipboard
        #[arg(long)]
        clipboard: bool,

        /// Collapse these nodes (by label) before rendering
        #[arg(long, value_delimiter = ',')]
        collapse: Vec<String>,

        /// Zoom factor applied to the view (clamped to configured bounds)
        #[arg(long)]
        zoom: Option<f32>,

        /// Pan offset: DX DY
        #[arg(long, num_args = 2, value_names = ["DX", "DY"], allow_negative_numbers = true)]
        pan: Option<Vec<f32>>,
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

    /// Show effective settings
    Info,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init,

    /// Show config path
    Path,
}
