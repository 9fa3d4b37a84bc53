// Template engine for generating HTML output

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera, Value};
use tracing::debug;

/// Single-body pages: a title plus one pre-rendered body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Graphviz text rendered client-side
    Diagram,
    /// JSON word list rendered client-side
    WordCloud,
}

impl Page {
    fn template(self) -> &'static str {
        match self {
            Page::Diagram => "diagram.html",
            Page::WordCloud => "wordcloud.html",
        }
    }

    /// Body as a script literal: DOT text becomes a JSON string, the word
    /// list already is JSON
    fn script_literal(self, body: &str) -> Result<String> {
        let literal = match self {
            Page::Diagram => serde_json::to_string(body)?,
            Page::WordCloud => body.to_string(),
        };
        Ok(escape_script(&literal))
    }
}

/// One glossary term
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GlossaryEntry {
    pub name: String,
    pub comment: String,
}

/// Template engine wrapping Tera with embedded templates
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Create a new template engine with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("diagram.html", include_str!("../../templates/diagram.html.tera")),
            ("strapdown.html", include_str!("../../templates/strapdown.html.tera")),
            ("wordcloud.html", include_str!("../../templates/wordcloud.html.tera")),
            ("glossary.html", include_str!("../../templates/glossary.html.tera")),
        ])?;

        tera.register_filter("slugify", slugify_filter);

        Ok(Self { tera })
    }

    /// Fill a single-body page with a title and body
    pub fn render_page(&self, page: Page, title: &str, body: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("title", title);
        context.insert("body", &page.script_literal(body)?);

        Ok(self.tera.render(page.template(), &context)?)
    }

    /// Render a markdown page displayed with a strapdown theme
    pub fn render_markdown(&self, title: &str, theme: &str, body: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("title", title);
        context.insert("theme", theme);
        context.insert("body", body);

        Ok(self.tera.render("strapdown.html", &context)?)
    }

    /// Render the glossary page
    pub fn render_glossary(&self, title: &str, entries: &[GlossaryEntry]) -> Result<String> {
        let mut context = Context::new();
        context.insert("title", title);
        context.insert("entries", entries);

        Ok(self.tera.render("glossary.html", &context)?)
    }
}

/// Write `text` to `dir/file_name`, creating the directory first
pub fn write_output(dir: &Path, file_name: &str, text: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| Error::output(dir, e))?;

    let path = dir.join(file_name);
    let mut contents = text.to_string();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    fs::write(&path, contents).map_err(|e| Error::output(&path, e))?;

    debug!(path = %path.display(), "wrote output file");
    Ok(path)
}

/// Keep `</script>` inside a literal from closing the script element
fn escape_script(literal: &str) -> String {
    literal.replace("</", "<\\/")
}

/// Convert text to URL-friendly slug
fn slugify_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value.as_str().unwrap_or("");
    Ok(Value::String(slugify(s)))
}

/// Convert text to URL-friendly slug
pub fn slugify(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
