// Source tree scanning
//
// Walks the configured source directories and turns every Java file into
// type descriptors, in a stable (sorted) order.

use crate::error::{Error, Result};
use crate::parser::ast::TypeDescriptor;
use crate::parser::java::{resolve_on_demand_imports, JavaParser};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// How a file that cannot be parsed is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Any unreadable or unparsable file aborts the scan
    #[default]
    Strict,
    /// Such files are skipped with a warning
    Lenient,
}

/// Scans source directories into type descriptors
pub struct SourceScanner {
    directories: Vec<PathBuf>,
    mode: ScanMode,
    verbose: bool,
}

impl SourceScanner {
    /// Create a scanner over the given source directories
    pub fn new(directories: Vec<PathBuf>) -> Self {
        Self {
            directories,
            mode: ScanMode::Strict,
            verbose: false,
        }
    }

    /// Set how parse failures are handled
    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    /// Show a progress bar while parsing
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Discover all Java files below the source directories
    pub fn discover_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for dir in &self.directories {
            if !dir.exists() {
                return Err(Error::PathNotFound(dir.clone()));
            }

            for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
                let entry = entry?;
                let path = entry.path();
                if entry.file_type().is_file() && is_java_file(path) {
                    files.push(path.to_path_buf());
                }
            }
        }

        Ok(files)
    }

    /// Parse every discovered file
    pub fn scan(&self) -> Result<Vec<TypeDescriptor>> {
        let files = self.discover_files()?;
        let mut parser = JavaParser::new()?;
        let mut types = Vec::new();

        let progress = if self.verbose {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .map_err(|e| Error::other(format!("invalid progress template: {}", e)))?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        for path in &files {
            if let Some(ref pb) = progress {
                let msg = path.file_name().unwrap_or_default().to_string_lossy().to_string();
                pb.set_message(msg);
                pb.inc(1);
            }

            match parser.parse_file(path) {
                Ok(parsed) => {
                    debug!(path = %path.display(), types = parsed.len(), "parsed source file");
                    types.extend(parsed);
                }
                Err(e) if self.mode == ScanMode::Lenient => {
                    warn!("skipping {}: {}", path.display(), e);
                }
                Err(e) => {
                    if let Some(pb) = progress {
                        pb.abandon();
                    }
                    return Err(e);
                }
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        resolve_on_demand_imports(&mut types);
        Ok(types)
    }
}

fn is_java_file(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "java")
}
