// Word cloud of the vocabulary used in the source code
//
// Counts meaningful words across the source files, leaving out language
// keywords and common stopwords.

use crate::config::WordCloudConfig;
use crate::error::{Error, Result};
use crate::output::{write_output, Page, TemplateEngine};
use glob::Pattern;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Page title
pub const TITLE: &str = "Word Cloud";
const OUTPUT_FILE: &str = "wordcloud.html";
/// Font size of the most frequent word
const MAX_SIZE: f64 = 50.0;

const DELIMITERS: &str = ";:.,?!<>=+-^&|*/\"\t\r\n {}[]()";

const KEYWORDS: &[&str] = &[
    "abstract", "continue", "for", "new", "switch", "assert", "default", "if", "package",
    "synchronized", "boolean", "do", "goto", "private", "this", "break", "double", "implements",
    "protected", "throw", "byte", "else", "import", "public", "throws", "case", "enum",
    "instanceof", "return", "transient", "catch", "extends", "int", "short", "try", "char",
    "final", "interface", "static", "void", "class", "finally", "long", "strictfp", "volatile",
    "const", "float", "native", "super", "while",
];

const STOPWORDS: &[&str] = &[
    "id", "the", "it", "is", "to", "with", "what's", "by", "or", "and", "both", "be", "of", "in",
    "obj", "string", "hashcode", "equals", "other", "tostring", "false", "true", "object",
    "annotations",
];

/// Word counts of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordBag {
    counts: BTreeMap<String, usize>,
    max: usize,
}

/// One word of the cloud
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeightedWord {
    pub text: String,
    pub size: f64,
}

impl WordBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize `content` and count its meaningful words
    pub fn add_text(&mut self, content: &str) {
        for token in content.split(|c: char| DELIMITERS.contains(c)) {
            let word = token.trim().to_lowercase();
            if !is_meaningful(&word) {
                continue;
            }
            let count = self.counts.entry(word).or_insert(0);
            *count += 1;
            self.max = self.max.max(*count);
        }
    }

    pub fn count(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Highest count of any word
    pub fn max(&self) -> usize {
        self.max
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Words sized relative to the most frequent one, alphabetically
    pub fn weighted(&self) -> Vec<WeightedWord> {
        if self.max == 0 {
            return Vec::new();
        }
        let scaling = MAX_SIZE / self.max as f64;
        self.counts
            .iter()
            .map(|(text, &count)| WeightedWord {
                text: text.clone(),
                size: scaling * count as f64,
            })
            .collect()
    }

    /// JSON array of `{"text", "size"}` objects
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.weighted())?)
    }
}

fn is_meaningful(token: &str) -> bool {
    if token.chars().count() <= 1 {
        return false;
    }
    if token.starts_with('@') {
        return false;
    }
    if token.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }
    !KEYWORDS.contains(&token) && !STOPWORDS.contains(&token)
}

/// Word cloud generator
pub struct WordCloudGenerator {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl WordCloudGenerator {
    pub fn new(config: &WordCloudConfig) -> Result<Self> {
        let include = compile(&config.include)?;
        let exclude = compile(&config.exclude)?;
        Ok(Self { include, exclude })
    }

    /// Files under `root` selected by the include/exclude patterns, sorted
    pub fn select_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.exists() {
            return Err(Error::PathNotFound(root.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let included = self.include.iter().any(|p| p.matches_path(relative));
            let excluded = self.exclude.iter().any(|p| p.matches_path(relative));
            if included && !excluded {
                files.push(entry.path().to_path_buf());
            }
        }
        Ok(files)
    }

    /// Count words in every selected file of every source directory
    pub fn scan(&self, directories: &[PathBuf]) -> Result<WordBag> {
        let mut bag = WordBag::new();
        for dir in directories {
            for file in self.select_files(dir)? {
                debug!(file = %file.display(), "counting words");
                let content = std::fs::read_to_string(&file)
                    .map_err(|e| Error::parse(&file, format!("cannot read file: {}", e)))?;
                bag.add_text(&content);
            }
        }
        Ok(bag)
    }

    /// Scan the sources and write the word cloud page
    pub fn generate(
        &self,
        directories: &[PathBuf],
        engine: &TemplateEngine,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let bag = self.scan(directories)?;
        let html = engine.render_page(Page::WordCloud, TITLE, &bag.to_json()?)?;
        let path = write_output(output_dir, OUTPUT_FILE, &html)?;
        info!(words = bag.len(), "word cloud written to {}", path.display());
        Ok(path)
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(Error::from))
        .collect()
}
