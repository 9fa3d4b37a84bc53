// Guided tours
//
// Types and methods carrying the tour marker become numbered steps of a
// named tour. Each tour is rendered as one markdown page.

use crate::config::TourConfig;
use crate::error::{Error, Result};
use crate::output::{write_output, TemplateEngine};
use crate::parser::{Marker, TypeDescriptor, TypeKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SEP: &str = "\n\n";

/// Marker parameters of one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourStep {
    pub tour: String,
    pub rank: i64,
    pub description: Option<String>,
}

impl TourStep {
    /// Read a step from marker parameters `name`, `rank` and `description`
    pub fn from_marker(marker: &Marker) -> Result<Self> {
        let tour = marker
            .param("name")
            .map(|n| n.replace('"', ""))
            .ok_or_else(|| Error::marker(format!("{} has no tour name", marker.name)))?;

        let rank_text = marker
            .param("rank")
            .ok_or_else(|| Error::marker(format!("step of tour '{}' has no rank", tour)))?;
        let rank = rank_text.trim().parse::<i64>().map_err(|_| {
            Error::marker(format!("rank '{}' of tour '{}' is not a number", rank_text, tour))
        })?;

        let description = marker
            .param("description")
            .map(|d| d.replace('"', "").trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            tour,
            rank,
            description,
        })
    }
}

/// Steps of one tour by rank
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tour {
    steps: BTreeMap<i64, String>,
}

impl Tour {
    /// Add a step; a repeated rank replaces the earlier step
    pub fn put(&mut self, rank: i64, content: String) -> Option<String> {
        self.steps.insert(rank, content)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Markdown body: one numbered section per step, in rank order
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for (count, step) in self.steps.values().enumerate() {
            out.push_str(SEP);
            out.push_str(&format!("## {}. {}\n", count + 1, step));
        }
        out
    }
}

/// Guided tour generator
pub struct TourGenerator {
    prefix: String,
    annotation: String,
    repository_link: String,
    theme: String,
}

impl TourGenerator {
    pub fn new(config: &TourConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            annotation: config.annotation.clone(),
            repository_link: config.repository_link.trim_end_matches('/').to_string(),
            theme: config.theme.clone(),
        }
    }

    /// Collect all tours, keyed by tour name
    pub fn collect(&self, types: &[TypeDescriptor]) -> Result<BTreeMap<String, Tour>> {
        let mut tours: BTreeMap<String, Tour> = BTreeMap::new();

        for ty in types.iter().filter(|ty| ty.namespace.starts_with(&self.prefix)) {
            if let Some(marker) = ty.marker(&self.annotation) {
                let step = TourStep::from_marker(marker)?;
                let comment = ty.comment.as_deref().map(block_quote);
                let content = self.step_content(&step, &ty.simple_name, ty, ty.line, comment);
                add_step(&mut tours, step, content, &ty.name);
            }

            if matches!(ty.kind, TypeKind::Enum | TypeKind::Interface) {
                continue;
            }

            for method in &ty.methods {
                if let Some(marker) = method.marker(&self.annotation) {
                    let step = TourStep::from_marker(marker)?;
                    let code = method.code.as_deref().map(code_block);
                    let content = self.step_content(&step, &method.signature, ty, method.line, code);
                    add_step(&mut tours, step, content, &method.signature);
                }
            }
        }

        Ok(tours)
    }

    /// Write one page per tour, in tour name order
    pub fn generate(
        &self,
        types: &[TypeDescriptor],
        engine: &TemplateEngine,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let tours = self.collect(types)?;
        let mut written = Vec::new();

        for (name, tour) in &tours {
            let html = engine.render_markdown(name, &self.theme, &tour.to_markdown())?;
            let path = write_output(output_dir, &tour_file_name(name), &html)?;
            info!(steps = tour.len(), "tour '{}' written to {}", name, path.display());
            written.push(path);
        }

        Ok(written)
    }

    fn step_content(
        &self,
        step: &TourStep,
        name: &str,
        ty: &TypeDescriptor,
        line: usize,
        detail: Option<String>,
    ) -> String {
        let mut content = self.link_source(name, ty, line);
        if let Some(description) = &step.description {
            content.push_str(SEP);
            content.push_str(&format!("*{}*", description));
        }
        if let Some(detail) = detail {
            content.push_str(SEP);
            content.push_str(&detail);
        }
        content.push_str(SEP);
        content
    }

    fn link_source(&self, name: &str, ty: &TypeDescriptor, line: usize) -> String {
        format!(
            "[{}]({}/src/main/java/{}.java#L{})",
            name,
            self.repository_link,
            ty.source_path(),
            line
        )
    }
}

fn add_step(tours: &mut BTreeMap<String, Tour>, step: TourStep, content: String, site: &str) {
    debug!(tour = %step.tour, rank = step.rank, site, "tour step");
    tours.entry(step.tour).or_default().put(step.rank, content);
}

/// Output file for a tour: spaces become underscores
pub fn tour_file_name(tour: &str) -> String {
    let stem: String = tour
        .chars()
        .map(|c| if c.is_whitespace() || c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}.html", stem)
}

fn block_quote(text: &str) -> String {
    format!("> {}", text.replace('\n', "\n> "))
}

fn code_block(code: &str) -> String {
    format!("```\n{}\n```", code)
}
