// Living diagram of a hexagonal architecture
//
// Types are laid out by namespace conventions: the core domain cluster
// first, then named clusters, then everything else at top level. All nodes
// exist before any edge is wired.

pub mod associations;
pub mod dot;
pub mod partition;
pub mod styles;

pub use associations::{associations, EdgeIntent};
pub use dot::{Cluster, ClusterMut, Digraph, Edge, Node, Scope};
pub use partition::{Exclusion, Layer, Partitioner};
pub use styles::EdgeStyle;

use crate::config::DiagramConfig;
use crate::error::{Error, Result};
use crate::output::{write_output, Page, TemplateEngine};
use crate::parser::TypeDescriptor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Title of the generated page
pub const TITLE: &str = "Living Diagram";
/// Name of the rendered graph
pub const GRAPH_NAME: &str = "Hexagonal Architecture";
/// Id of the core domain cluster
pub const CORE_CLUSTER: &str = "hexagon";
/// Label of the core domain cluster
pub const CORE_LABEL: &str = "Core Domain";
/// Generated page file name
pub const OUTPUT_FILE: &str = "livingdiagram.html";
/// Raw graph description file name
pub const DOT_FILE: &str = "livingdiagram.dot";

/// Files written by one diagram run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramReport {
    pub page: PathBuf,
    pub dot: Option<PathBuf>,
    pub nodes: usize,
    pub edges: usize,
}

/// Builds and writes the architecture diagram
pub struct DiagramGenerator {
    partitioner: Partitioner,
    emit_dot: bool,
}

impl DiagramGenerator {
    /// Create a generator from diagram settings
    pub fn new(config: &DiagramConfig) -> Result<Self> {
        // named clusters share the id space of the core cluster
        if let Some(cluster) = config.clusters.iter().find(|c| c.as_str() == CORE_CLUSTER) {
            return Err(Error::config_validation(format!(
                "cluster suffix '{}' is reserved for the core domain",
                cluster
            )));
        }

        let partitioner = Partitioner::new(
            &config.prefix,
            &config.core_domain,
            &config.clusters,
            &config.package_excludes,
        )?;

        Ok(Self {
            partitioner,
            emit_dot: config.emit_dot,
        })
    }

    /// Build the graph for a set of types
    pub fn build(&self, types: &[TypeDescriptor]) -> Digraph {
        let mut core = Vec::new();
        let mut clustered: Vec<(String, &TypeDescriptor)> = Vec::new();
        let mut other = Vec::new();
        // every non-core type, in scan order
        let mut outer = Vec::new();

        for ty in types {
            let layer = self.partitioner.classify(ty);
            debug!(name = %ty.name, ?layer, "classified type");
            match layer {
                Layer::Core => core.push(ty),
                Layer::Cluster(suffix) => {
                    clustered.push((suffix, ty));
                    outer.push(ty);
                }
                Layer::Other => {
                    other.push(ty);
                    outer.push(ty);
                }
                Layer::Excluded(_) => {}
            }
        }

        let mut graph = Digraph::new(GRAPH_NAME);
        graph.set_option("rankdir", "LR");

        graph.add_cluster(CORE_CLUSTER).set_label(CORE_LABEL);
        for suffix in self.partitioner.clusters() {
            graph.add_cluster(suffix).set_label(suffix);
        }

        // domain model elements first
        {
            let mut cluster = graph.add_cluster(CORE_CLUSTER);
            for ty in &core {
                add_type_node(cluster.add_node(&ty.name), ty);
            }
        }

        for (suffix, ty) in &clustered {
            let mut cluster = graph.add_cluster(suffix);
            add_type_node(cluster.add_node(&ty.name), ty);
        }

        for ty in &other {
            add_type_node(graph.add_node(&ty.name), ty);
        }

        // then wire them together
        for ty in &outer {
            self.add_associations(&mut graph, ty);
        }
        for ty in &core {
            self.add_associations(&mut graph, ty);
        }

        graph
    }

    /// Build and render the graph description text
    pub fn render(&self, types: &[TypeDescriptor]) -> String {
        self.build(types).render()
    }

    /// Render the diagram page and write it to `output_dir`
    pub fn generate(
        &self,
        types: &[TypeDescriptor],
        engine: &TemplateEngine,
        output_dir: &Path,
    ) -> Result<DiagramReport> {
        let graph = self.build(types);
        let content = graph.render();

        let text = engine.render_page(Page::Diagram, TITLE, content.trim())?;
        let page = write_output(output_dir, OUTPUT_FILE, &text)?;

        let dot = if self.emit_dot {
            Some(write_output(output_dir, DOT_FILE, &content)?)
        } else {
            None
        };

        info!(
            nodes = graph.node_count(),
            edges = graph.edges().len(),
            "diagram written to {}",
            page.display()
        );

        Ok(DiagramReport {
            page,
            dot,
            nodes: graph.node_count(),
            edges: graph.edges().len(),
        })
    }

    fn add_associations(&self, graph: &mut Digraph, ty: &TypeDescriptor) {
        for edge in associations(ty) {
            if self.partitioner.is_excluded_reference(&edge.from)
                || self.partitioner.is_excluded_reference(&edge.to)
            {
                continue;
            }
            graph.add_association(&edge.from, &edge.to, None, None, edge.style);
        }
    }
}

fn add_type_node(node: &mut Node, ty: &TypeDescriptor) {
    node.set_label(&ty.simple_name).set_comment(&ty.simple_name);
}
