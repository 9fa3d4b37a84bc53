// In-memory directed graph with clusters, rendered to Graphviz DOT text.
//
// Node identity is global to the document: adding a node that already
// exists anywhere in the graph returns the existing node, so a node can
// only ever live in the scope it was first added to. Everything renders
// in insertion order.

use crate::diagram::styles::EdgeStyle;
use std::collections::HashMap;
use std::fmt::Write;

/// A node statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: String,
    label: Option<String>,
    comment: Option<String>,
}

impl Node {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            label: None,
            comment: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Set the display label
    pub fn set_label(&mut self, label: &str) -> &mut Self {
        self.label = Some(label.to_string());
        self
    }

    /// Set the tooltip comment
    pub fn set_comment(&mut self, comment: &str) -> &mut Self {
        self.comment = Some(comment.to_string());
        self
    }
}

/// A named sub-graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    id: String,
    label: Option<String>,
    /// Indexes into the graph's node table
    members: Vec<usize>,
}

impl Cluster {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// A directed edge statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub comment: Option<String>,
    pub style: EdgeStyle,
}

/// Where a node is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    TopLevel,
    Cluster(usize),
}

/// A directed graph
#[derive(Debug, Clone)]
pub struct Digraph {
    name: String,
    options: Vec<(String, String)>,
    clusters: Vec<Cluster>,
    nodes: Vec<(Node, Scope)>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
}

/// Mutable handle on one cluster of a graph
pub struct ClusterMut<'g> {
    graph: &'g mut Digraph,
    cluster: usize,
}

impl<'g> ClusterMut<'g> {
    /// Set the cluster label
    pub fn set_label(&mut self, label: &str) -> &mut Self {
        self.graph.clusters[self.cluster].label = Some(label.to_string());
        self
    }

    /// Create a node inside this cluster, or return the existing node with
    /// that identity wherever it was first added
    pub fn add_node(&mut self, id: &str) -> &mut Node {
        self.graph.node_in(id, Scope::Cluster(self.cluster))
    }

    pub fn id(&self) -> &str {
        &self.graph.clusters[self.cluster].id
    }
}

impl Digraph {
    /// Create an empty graph
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            options: Vec::new(),
            clusters: Vec::new(),
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set a graph-level attribute such as `rankdir=LR`
    pub fn set_option(&mut self, key: &str, value: &str) -> &mut Self {
        match self.options.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value.to_string(),
            None => self.options.push((key.to_string(), value.to_string())),
        }
        self
    }

    /// Create a cluster, or return the existing one with that id
    pub fn add_cluster(&mut self, id: &str) -> ClusterMut<'_> {
        let cluster = match self.clusters.iter().position(|c| c.id == id) {
            Some(existing) => existing,
            None => {
                self.clusters.push(Cluster {
                    id: id.to_string(),
                    label: None,
                    members: Vec::new(),
                });
                self.clusters.len() - 1
            }
        };
        ClusterMut {
            graph: self,
            cluster,
        }
    }

    /// Get an existing cluster
    pub fn cluster(&mut self, id: &str) -> Option<ClusterMut<'_>> {
        let cluster = self.clusters.iter().position(|c| c.id == id)?;
        Some(ClusterMut {
            graph: self,
            cluster,
        })
    }

    /// Create a top-level node, or return the existing node with that identity
    pub fn add_node(&mut self, id: &str) -> &mut Node {
        self.node_in(id, Scope::TopLevel)
    }

    fn node_in(&mut self, id: &str, scope: Scope) -> &mut Node {
        let idx = match self.index.get(id) {
            Some(&idx) => idx,
            None => {
                let idx = self.nodes.len();
                self.nodes.push((Node::new(id), scope));
                self.index.insert(id.to_string(), idx);
                if let Scope::Cluster(cluster) = scope {
                    self.clusters[cluster].members.push(idx);
                }
                idx
            }
        };
        &mut self.nodes[idx].0
    }

    /// Append a directed edge. Endpoints need not exist as nodes.
    pub fn add_association(
        &mut self,
        from: &str,
        to: &str,
        label: Option<&str>,
        comment: Option<&str>,
        style: EdgeStyle,
    ) {
        self.edges.push(Edge {
            from: from.to_string(),
            to: to.to_string(),
            label: label.map(str::to_string),
            comment: comment.map(str::to_string),
            style,
        });
    }

    /// Look up a node by identity
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx].0)
    }

    /// Where a node was placed
    pub fn scope_of(&self, id: &str) -> Option<Scope> {
        self.index.get(id).map(|&idx| self.nodes[idx].1)
    }

    /// Id of the cluster a node belongs to, if any
    pub fn cluster_of(&self, id: &str) -> Option<&str> {
        match self.scope_of(id)? {
            Scope::Cluster(cluster) => Some(&self.clusters[cluster].id),
            Scope::TopLevel => None,
        }
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Nodes of one cluster, in insertion order
    pub fn cluster_nodes<'a>(&'a self, cluster: &'a Cluster) -> impl Iterator<Item = &'a Node> + 'a {
        cluster.members.iter().map(move |&idx| &self.nodes[idx].0)
    }

    /// Nodes outside any cluster, in insertion order
    pub fn top_level_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(|(_, scope)| *scope == Scope::TopLevel)
            .map(|(node, _)| node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Render the graph as DOT text
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(256 + 64 * (self.nodes.len() + self.edges.len()));
        let _ = writeln!(out, "digraph {} {{", quote(&self.name));

        for (key, value) in &self.options {
            let _ = writeln!(out, "  {}={};", key, quote_value(value));
        }

        for cluster in &self.clusters {
            let _ = writeln!(out, "  subgraph {} {{", quote(&format!("cluster_{}", cluster.id)));
            if let Some(label) = &cluster.label {
                let _ = writeln!(out, "    label={};", quote(label));
            }
            for node in self.cluster_nodes(cluster) {
                write_node(&mut out, node, 2);
            }
            out.push_str("  }\n");
        }

        for node in self.top_level_nodes() {
            write_node(&mut out, node, 1);
        }

        for edge in &self.edges {
            write_edge(&mut out, edge);
        }

        out.push_str("}\n");
        out
    }
}

fn write_node(out: &mut String, node: &Node, level: usize) {
    write_indent(out, level);
    out.push_str(&quote(&node.id));

    let mut attrs = Vec::new();
    if let Some(label) = &node.label {
        attrs.push(format!("label={}", quote(label)));
    }
    if let Some(comment) = &node.comment {
        attrs.push(format!("comment={}", quote(comment)));
    }
    if !attrs.is_empty() {
        let _ = write!(out, " [{}]", attrs.join(", "));
    }
    out.push_str(";\n");
}

fn write_edge(out: &mut String, edge: &Edge) {
    write_indent(out, 1);
    let _ = write!(out, "{} -> {}", quote(&edge.from), quote(&edge.to));

    let mut attrs: Vec<String> = edge
        .style
        .attributes()
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    if let Some(label) = &edge.label {
        attrs.push(format!("label={}", quote(label)));
    }
    if let Some(comment) = &edge.comment {
        attrs.push(format!("comment={}", quote(comment)));
    }
    let _ = writeln!(out, " [{}];", attrs.join(", "));
}

fn write_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

/// Quote a DOT identifier or string value
pub fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => {}
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Plain alphanumeric values stay bare (`rankdir=LR`), anything else is quoted
fn quote_value(s: &str) -> String {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
        s.to_string()
    } else {
        quote(s)
    }
}
