// Architecture partitioning
//
// Classifies scanned types into the layers of a hexagonal architecture by
// namespace naming conventions. Rules apply in order: exclusion, core
// domain suffix, named cluster suffix, everything else.

use crate::error::Result;
use crate::parser::{namespace_of, TypeDescriptor};
use regex::Regex;

/// Why a type is left out of the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    OutsidePrefix,
    TestArtifact,
    /// Namespace matches a denylist pattern
    Pattern,
    /// Namespace-level pseudo-type
    NamespaceMarker,
}

/// The layer a type is drawn in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer {
    Excluded(Exclusion),
    Core,
    /// Named cluster, by suffix
    Cluster(String),
    Other,
}

/// Classifies types by namespace convention
#[derive(Debug, Clone)]
pub struct Partitioner {
    prefix: String,
    core_suffix: String,
    clusters: Vec<String>,
    excludes: Vec<Regex>,
}

impl Partitioner {
    /// Create a partitioner. Exclusion patterns must match the whole
    /// namespace.
    pub fn new(
        prefix: &str,
        core_suffix: &str,
        clusters: &[String],
        excludes: &[String],
    ) -> Result<Self> {
        let excludes = excludes
            .iter()
            .map(|pattern| Regex::new(&format!("^(?:{})$", pattern)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            prefix: prefix.to_string(),
            core_suffix: core_suffix.to_string(),
            clusters: clusters.to_vec(),
            excludes,
        })
    }

    pub fn core_suffix(&self) -> &str {
        &self.core_suffix
    }

    /// Named cluster suffixes, in configured order
    pub fn clusters(&self) -> &[String] {
        &self.clusters
    }

    /// Classify one type
    pub fn classify(&self, ty: &TypeDescriptor) -> Layer {
        let namespace = ty.namespace.as_str();

        if !namespace.starts_with(&self.prefix) {
            return Layer::Excluded(Exclusion::OutsidePrefix);
        }
        if ty.is_test_artifact() {
            return Layer::Excluded(Exclusion::TestArtifact);
        }
        if self.matches_exclude(namespace) {
            return Layer::Excluded(Exclusion::Pattern);
        }
        if ty.is_namespace_marker() {
            return Layer::Excluded(Exclusion::NamespaceMarker);
        }

        if has_segment_suffix(namespace, &self.core_suffix) {
            return Layer::Core;
        }

        self.clusters
            .iter()
            .find(|suffix| has_segment_suffix(namespace, suffix))
            .map_or(Layer::Other, |suffix| Layer::Cluster(suffix.clone()))
    }

    /// Whether an edge endpoint lies in an excluded namespace
    pub fn is_excluded_reference(&self, identity: &str) -> bool {
        self.matches_exclude(namespace_of(identity))
    }

    fn matches_exclude(&self, namespace: &str) -> bool {
        self.excludes.iter().any(|re| re.is_match(namespace))
    }
}

/// `a.b.domain` ends with segment `domain`; `a.b.subdomain` does not
fn has_segment_suffix(namespace: &str, suffix: &str) -> bool {
    namespace
        .strip_suffix(suffix)
        .map_or(false, |head| head.ends_with('.'))
}
