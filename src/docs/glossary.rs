// Living glossary
//
// Every type carrying the glossary marker becomes a term, described by its
// documentation comment.

use crate::config::{GlossaryConfig, GlossaryFormat};
use crate::error::Result;
use crate::output::{write_output, GlossaryEntry, TemplateEngine};
use crate::parser::TypeDescriptor;
use std::path::{Path, PathBuf};
use tracing::info;

/// Page title and output file stem
pub const TITLE: &str = "Glossary";
const OUTPUT_STEM: &str = "glossary";

/// Glossary generator
pub struct GlossaryGenerator {
    annotation: String,
    format: GlossaryFormat,
}

impl GlossaryGenerator {
    pub fn new(config: &GlossaryConfig) -> Self {
        Self {
            annotation: config.annotation.clone(),
            format: config.format,
        }
    }

    /// Terms in scan order
    pub fn entries(&self, types: &[TypeDescriptor]) -> Vec<GlossaryEntry> {
        types
            .iter()
            .filter(|ty| ty.marker(&self.annotation).is_some())
            .map(|ty| GlossaryEntry {
                name: ty.simple_name.clone(),
                comment: ty.comment.clone().unwrap_or_default(),
            })
            .collect()
    }

    /// Write the glossary in the configured format
    pub fn generate(
        &self,
        types: &[TypeDescriptor],
        engine: &TemplateEngine,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let entries = self.entries(types);

        let path = match self.format {
            GlossaryFormat::Html => {
                let html = engine.render_glossary(TITLE, &entries)?;
                write_output(output_dir, &format!("{}.html", OUTPUT_STEM), &html)?
            }
            GlossaryFormat::Asciidoc => {
                let adoc = to_asciidoc(&entries);
                write_output(output_dir, &format!("{}.adoc", OUTPUT_STEM), &adoc)?
            }
        };

        info!(terms = entries.len(), "glossary written to {}", path.display());
        Ok(path)
    }
}

/// AsciiDoc document: a level-1 section per term
pub fn to_asciidoc(entries: &[GlossaryEntry]) -> String {
    let mut doc = format!("= {}\n\n", TITLE);
    for entry in entries {
        doc.push_str(&format!("== {}\n\n{}\n\n", entry.name, entry.comment));
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Marker;
    use tempfile::TempDir;

    fn types() -> Vec<TypeDescriptor> {
        vec![
            TypeDescriptor::new("a.b.domain", "Order")
                .with_marker(Marker::new("io.livingdoc.Glossary"))
                .with_comment("A request to buy goods."),
            TypeDescriptor::new("a.b.domain", "OrderMapper"),
            TypeDescriptor::new("a.b.domain", "Customer").with_marker(Marker::new("Glossary")),
        ]
    }

    #[test]
    fn test_entries_follow_marker() {
        let generator = GlossaryGenerator::new(&GlossaryConfig::default());
        let entries = generator.entries(&types());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Order");
        assert_eq!(entries[0].comment, "A request to buy goods.");
        assert_eq!(entries[1].name, "Customer");
        assert_eq!(entries[1].comment, "");
    }

    #[test]
    fn test_custom_annotation() {
        let config = GlossaryConfig {
            annotation: "CoreConcept".to_string(),
            ..Default::default()
        };
        let generator = GlossaryGenerator::new(&config);
        assert!(generator.entries(&types()).is_empty());
    }

    #[test]
    fn test_to_asciidoc() {
        let entries = vec![GlossaryEntry {
            name: "Order".to_string(),
            comment: "A request.".to_string(),
        }];
        assert_eq!(to_asciidoc(&entries), "= Glossary\n\n== Order\n\nA request.\n\n");
    }

    #[test]
    fn test_generate_html() {
        let dir = TempDir::new().unwrap();
        let engine = TemplateEngine::new().unwrap();
        let path = GlossaryGenerator::new(&GlossaryConfig::default())
            .generate(&types(), &engine, dir.path())
            .unwrap();
        assert_eq!(path, dir.path().join("glossary.html"));
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("A request to buy goods."));
    }

    #[test]
    fn test_generate_asciidoc() {
        let dir = TempDir::new().unwrap();
        let engine = TemplateEngine::new().unwrap();
        let config = GlossaryConfig {
            format: GlossaryFormat::Asciidoc,
            ..Default::default()
        };
        let path = GlossaryGenerator::new(&config)
            .generate(&types(), &engine, dir.path())
            .unwrap();
        assert_eq!(path, dir.path().join("glossary.adoc"));
        let adoc = std::fs::read_to_string(path).unwrap();
        assert!(adoc.starts_with("= Glossary\n"));
        assert!(adoc.contains("== Customer"));
    }
}
