//! Livingdoc - living documentation generated from source code
//!
//! Scans a Java source tree into type descriptors and produces a glossary,
//! guided tours, a word cloud and a diagram of the hexagonal architecture
//! rendered as Graphviz DOT.

pub mod cli;
pub mod config;
pub mod diagram;
pub mod docs;
pub mod error;
pub mod output;
pub mod parser;

// Re-export main types
pub use config::Config;
pub use diagram::{DiagramGenerator, Digraph, EdgeStyle, Layer, Partitioner};
pub use docs::{GlossaryGenerator, TourGenerator, WordCloudGenerator};
pub use error::{Error, Result};
pub use output::TemplateEngine;
pub use parser::{SourceScanner, TypeDescriptor};
