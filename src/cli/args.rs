//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate living documentation from source code
#[derive(Parser, Debug)]
#[command(name = "livingdoc")]
#[command(about = "Generate living documentation from source code")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Options shared by every generator
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Config file path (defaults to ./livingdoc.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source directory to scan (can be repeated)
    #[arg(short, long)]
    pub source: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Draw the hexagonal architecture as a living diagram
    Diagram {
        #[command(flatten)]
        common: CommonArgs,

        /// Namespace prefix of types included in the diagram
        #[arg(long)]
        prefix: Option<String>,

        /// Last namespace segment of the core domain
        #[arg(long)]
        core_domain: Option<String>,

        /// Namespace suffix drawn as a named cluster (can be repeated)
        #[arg(long)]
        cluster: Vec<String>,

        /// Namespace regex to leave out (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// Read type descriptors from a JSON file instead of scanning sources
        #[arg(long)]
        descriptors: Option<PathBuf>,

        /// Also write the raw DOT file
        #[arg(long)]
        emit_dot: bool,
    },

    /// Generate the glossary of marked types
    Glossary {
        #[command(flatten)]
        common: CommonArgs,

        /// Marker identifying glossary types
        #[arg(long)]
        annotation: Option<String>,

        /// Output format (html, asciidoc)
        #[arg(long)]
        format: Option<String>,
    },

    /// Generate the guided tours
    Tour {
        #[command(flatten)]
        common: CommonArgs,

        /// Namespace prefix of types browsed for tour steps
        #[arg(long)]
        prefix: Option<String>,

        /// Marker identifying tour steps
        #[arg(long)]
        annotation: Option<String>,

        /// Root link to the repository, used in step links
        #[arg(long)]
        repository_link: Option<String>,

        /// Strapdown theme name
        #[arg(long)]
        theme: Option<String>,
    },

    /// Generate the word cloud
    Wordcloud {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Scan sources and save the type descriptors as JSON
    Extract {
        #[command(flatten)]
        common: CommonArgs,

        /// Descriptor file to write
        #[arg(long, default_value = "descriptors.json")]
        out: PathBuf,
    },

    /// Run every generator
    All {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Show version information
    Version,
}
