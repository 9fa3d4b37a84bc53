use crate::diagram::CORE_CLUSTER;
use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "livingdoc.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub diagram: DiagramConfig,
    pub glossary: GlossaryConfig,
    pub tour: TourConfig,
    pub wordcloud: WordCloudConfig,
}

/// Where the source tree lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub directories: Vec<PathBuf>,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

/// Hexagonal architecture diagram settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Namespace prefix of types included in the diagram
    pub prefix: String,
    /// Last namespace segment of the core domain types
    pub core_domain: String,
    /// Namespace suffixes drawn as named clusters
    pub clusters: Vec<String>,
    /// Namespaces to exclude, as full-match regular expressions
    pub package_excludes: Vec<String>,
    /// Also write the raw graph description next to the page
    pub emit_dot: bool,
}

/// Glossary settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlossaryConfig {
    pub annotation: String,
    pub format: GlossaryFormat,
}

/// Guided tour settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    pub prefix: String,
    pub annotation: String,
    /// Root link to the repository browser, used for step links
    pub repository_link: String,
    /// Strapdown theme name
    pub theme: String,
}

/// Word cloud settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WordCloudConfig {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

/// Glossary output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GlossaryFormat {
    #[default]
    Html,
    Asciidoc,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            directories: vec![PathBuf::from("src/main/java")],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("target/generated-docs"),
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            core_domain: "domain".to_string(),
            clusters: vec![],
            package_excludes: vec![],
            emit_dot: false,
        }
    }
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            annotation: "Glossary".to_string(),
            format: GlossaryFormat::default(),
        }
    }
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            annotation: "GuidedTour".to_string(),
            repository_link: String::new(),
            theme: "united".to_string(),
        }
    }
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            include: vec!["**/*.java".to_string()],
            exclude: vec!["**/package-info.java".to_string()],
        }
    }
}

/// Values given on the command line, applied over the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub sources: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub prefix: Option<String>,
    pub core_domain: Option<String>,
    pub clusters: Vec<String>,
    pub package_excludes: Vec<String>,
    pub emit_dot: bool,
    pub glossary_annotation: Option<String>,
    pub glossary_format: Option<String>,
    pub tour_prefix: Option<String>,
    pub tour_annotation: Option<String>,
    pub repository_link: Option<String>,
    pub theme: Option<String>,
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file, or return defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: CliOverrides) {
        if !cli.sources.is_empty() {
            self.source.directories = cli.sources;
        }

        if let Some(out) = cli.output {
            self.output.directory = out;
        }

        if let Some(prefix) = cli.prefix {
            self.diagram.prefix = prefix;
        }

        if let Some(core) = cli.core_domain {
            self.diagram.core_domain = core;
        }

        self.diagram.clusters.extend(cli.clusters);
        self.diagram.package_excludes.extend(cli.package_excludes);

        if cli.emit_dot {
            self.diagram.emit_dot = true;
        }

        if let Some(annotation) = cli.glossary_annotation {
            self.glossary.annotation = annotation;
        }

        if let Some(fmt) = cli.glossary_format {
            self.glossary.format = match fmt.as_str() {
                "asciidoc" | "adoc" => GlossaryFormat::Asciidoc,
                _ => GlossaryFormat::Html,
            };
        }

        if let Some(prefix) = cli.tour_prefix {
            self.tour.prefix = prefix;
        }

        if let Some(annotation) = cli.tour_annotation {
            self.tour.annotation = annotation;
        }

        if let Some(link) = cli.repository_link {
            self.tour.repository_link = link;
        }

        if let Some(theme) = cli.theme {
            self.tour.theme = theme;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.source.directories.is_empty() {
            return Err(Error::config_validation(
                "at least one source directory required",
            ));
        }

        let core = &self.diagram.core_domain;
        if core.is_empty() {
            return Err(Error::config_validation("core_domain must not be empty"));
        }
        if core.contains('.') {
            return Err(Error::config_validation(format!(
                "core_domain '{}' must be a single namespace segment",
                core
            )));
        }

        for cluster in &self.diagram.clusters {
            if cluster.is_empty() || cluster.contains('.') {
                return Err(Error::config_validation(format!(
                    "cluster suffix '{}' must be a single namespace segment",
                    cluster
                )));
            }
            if cluster == CORE_CLUSTER {
                return Err(Error::config_validation(format!(
                    "cluster suffix '{}' is reserved for the core domain",
                    cluster
                )));
            }
        }

        for pattern in &self.diagram.package_excludes {
            Regex::new(pattern).map_err(|e| {
                Error::config_validation(format!("invalid package exclude '{}': {}", pattern, e))
            })?;
        }

        if self.glossary.annotation.is_empty() {
            return Err(Error::config_validation("glossary annotation must not be empty"));
        }

        if self.tour.annotation.is_empty() {
            return Err(Error::config_validation("tour annotation must not be empty"));
        }

        if self.tour.theme.is_empty() {
            return Err(Error::config_validation("tour theme must not be empty"));
        }

        if self.wordcloud.include.is_empty() {
            return Err(Error::config_validation(
                "at least one wordcloud include pattern required",
            ));
        }

        Ok(())
    }
}
