// Descriptor types for scanned source code
//
// These are structural facts about one source type, independent of any live
// runtime representation. They are serializable so an extraction pass can
// hand them to the generators ahead of time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Reserved simple name of namespace-level pseudo-types
pub const NAMESPACE_MARKER: &str = "package-info";

/// Simple-name suffixes identifying test artifacts
pub const TEST_SUFFIXES: &[&str] = &["Test", "IT"];

/// A structural description of one type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeDescriptor {
    /// Fully-qualified name, the identity of the type
    pub name: String,
    /// Enclosing namespace (empty for the default namespace)
    pub namespace: String,
    /// Display name
    pub simple_name: String,
    #[serde(default)]
    pub kind: TypeKind,
    /// Declared fields, in declaration order
    #[serde(default)]
    pub fields: Vec<FieldRef>,
    /// Identities of implemented contracts, in declaration order
    #[serde(default)]
    pub implements: Vec<String>,
    /// Declarative markers attached to the type
    #[serde(default)]
    pub markers: Vec<Marker>,
    /// Documentation comment
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
    /// Source file the type was read from
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// 1-based line of the declaration
    #[serde(default)]
    pub line: usize,
    /// Packages imported on demand by the compilation unit
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_demand_imports: Vec<String>,
}

impl TypeDescriptor {
    /// Create a descriptor for `simple_name` inside `namespace`
    pub fn new(namespace: &str, simple_name: &str) -> Self {
        Self {
            name: qualify(namespace, simple_name),
            namespace: namespace.to_string(),
            simple_name: simple_name.to_string(),
            kind: TypeKind::Class,
            fields: Vec::new(),
            implements: Vec::new(),
            markers: Vec::new(),
            comment: None,
            methods: Vec::new(),
            path: None,
            line: 0,
            on_demand_imports: Vec::new(),
        }
    }

    /// Set the kind of type
    pub fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Add a field typed with a reference type
    pub fn with_field(mut self, name: &str, type_name: &str) -> Self {
        self.fields.push(FieldRef::reference(name, type_name));
        self
    }

    /// Add a field typed with a primitive
    pub fn with_primitive_field(mut self, name: &str, type_name: &str) -> Self {
        self.fields.push(FieldRef::primitive(name, type_name));
        self
    }

    /// Add an implemented contract
    pub fn implementing(mut self, contract: &str) -> Self {
        self.implements.push(contract.to_string());
        self
    }

    /// Attach a marker
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Set the documentation comment
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Is this a namespace-level pseudo-type rather than a real type
    pub fn is_namespace_marker(&self) -> bool {
        self.simple_name.eq_ignore_ascii_case(NAMESPACE_MARKER)
    }

    /// Is this a test class
    pub fn is_test_artifact(&self) -> bool {
        TEST_SUFFIXES
            .iter()
            .any(|suffix| self.simple_name.ends_with(suffix))
    }

    /// Find the first marker matching `name`
    pub fn marker(&self, name: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.matches(name))
    }

    /// Fully-qualified path with `/` separators, as used in source links
    pub fn source_path(&self) -> String {
        self.name.replace('.', "/")
    }
}

/// Kind of declared type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
    /// Namespace-level pseudo-type (package-info)
    Namespace,
}

/// A declared field and the type it references
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldRef {
    pub name: String,
    /// Identity of the declared type
    pub type_name: String,
    #[serde(default)]
    pub primitive: bool,
}

impl FieldRef {
    pub fn reference(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            primitive: false,
        }
    }

    pub fn primitive(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            primitive: true,
        }
    }
}

/// A declarative marker with named parameters (an annotation in Java)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    /// Marker type name, qualified when it could be resolved
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl Marker {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            params: BTreeMap::new(),
        }
    }

    /// Add a named parameter
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    /// Get a named parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Check whether this marker is `wanted`.
    ///
    /// Either side may be simple or qualified: `Glossary` matches
    /// `com.acme.Glossary`, and `com.acme.Glossary` matches an unresolved
    /// `Glossary`.
    pub fn matches(&self, wanted: &str) -> bool {
        self.name == wanted
            || is_dotted_suffix(&self.name, wanted)
            || is_dotted_suffix(wanted, &self.name)
    }
}

/// A method, kept for guided tour steps
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodDescriptor {
    pub name: String,
    /// Call signature, e.g. `place(order, customer)`
    pub signature: String,
    /// Method body text
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl MethodDescriptor {
    /// Find the first marker matching `name`
    pub fn marker(&self, name: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.matches(name))
    }
}

/// Join a namespace and a simple name into a qualified name
pub fn qualify(namespace: &str, simple_name: &str) -> String {
    if namespace.is_empty() {
        simple_name.to_string()
    } else {
        format!("{}.{}", namespace, simple_name)
    }
}

/// Namespace part of a qualified identity (`a.b.C` -> `a.b`, `C[]` -> ``)
pub fn namespace_of(identity: &str) -> &str {
    let identity = identity.trim_end_matches("[]");
    match identity.rfind('.') {
        Some(idx) => &identity[..idx],
        None => "",
    }
}

fn is_dotted_suffix(full: &str, tail: &str) -> bool {
    full.len() > tail.len()
        && full.ends_with(tail)
        && full.as_bytes()[full.len() - tail.len() - 1] == b'.'
}
