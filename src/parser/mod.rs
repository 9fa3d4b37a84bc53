// Parser module for extracting type descriptors from source files

pub mod ast;
pub mod descriptors;
mod java;
mod scanner;

pub use ast::*;
pub use java::JavaParser;
pub use scanner::{ScanMode, SourceScanner};
