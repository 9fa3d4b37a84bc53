// Java parser using tree-sitter
//
// Extracts one TypeDescriptor per top-level type declaration of a
// compilation unit. Type references are resolved to qualified names the
// way the compiler would for the common cases: single-type imports, then
// java.lang, then the enclosing package.

use crate::error::{Error, Result};
use crate::parser::ast::{
    namespace_of, qualify, FieldRef, Marker, MethodDescriptor, TypeDescriptor, TypeKind, NAMESPACE_MARKER,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tree_sitter::{Node, Parser};

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

const JAVA_LANG: &[&str] = &[
    "Boolean",
    "Byte",
    "Character",
    "CharSequence",
    "Class",
    "Comparable",
    "Deprecated",
    "Double",
    "Enum",
    "Exception",
    "Float",
    "FunctionalInterface",
    "Integer",
    "Iterable",
    "Long",
    "Number",
    "Object",
    "Override",
    "Record",
    "Runnable",
    "RuntimeException",
    "Short",
    "String",
    "StringBuilder",
    "SuppressWarnings",
    "Throwable",
    "Void",
];

/// Parser for Java source files
pub struct JavaParser {
    parser: Parser,
}

impl JavaParser {
    /// Create a new Java parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_java::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::scan(format!("Failed to set Java language: {}", e)))?;

        Ok(Self { parser })
    }

    /// Parse a Java file
    pub fn parse_file(&mut self, path: &Path) -> Result<Vec<TypeDescriptor>> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::parse(path, format!("cannot read file: {}", e)))?;
        self.parse_source(&source, path)
    }

    /// Parse Java source code; `path` names the compilation unit
    pub fn parse_source(&mut self, source: &str, path: &Path) -> Result<Vec<TypeDescriptor>> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| Error::parse(path, "parser returned no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            let line = first_error_line(&root).unwrap_or(1);
            return Err(Error::parse(path, format!("syntax error near line {}", line)));
        }

        let mut resolver = Resolver::default();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "package_declaration" => {
                    if let Some(name) = package_name(&child, source) {
                        resolver.package = name;
                    }
                }
                "import_declaration" => resolver.add_import(&child, source),
                _ => {}
            }
        }

        let mut types = Vec::new();

        let is_package_info = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map_or(false, |s| s == NAMESPACE_MARKER);
        if is_package_info {
            types.push(namespace_marker(&root, source, &resolver, path));
            return Ok(types);
        }

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            let kind = match child.kind() {
                "class_declaration" => TypeKind::Class,
                "interface_declaration" => TypeKind::Interface,
                "enum_declaration" => TypeKind::Enum,
                "record_declaration" => TypeKind::Record,
                "annotation_type_declaration" => TypeKind::Annotation,
                _ => continue,
            };
            if let Some(mut ty) = parse_type(&child, kind, source, &resolver) {
                ty.path = Some(path.to_path_buf());
                types.push(ty);
            }
        }

        Ok(types)
    }
}

/// Resolves simple type names to qualified names within one compilation unit
#[derive(Debug, Default)]
struct Resolver {
    package: String,
    imports: HashMap<String, String>,
    /// Packages imported on demand (`import a.b.*;`), in declaration order
    on_demand: Vec<String>,
    type_params: HashSet<String>,
}

impl Resolver {
    fn add_import(&mut self, node: &Node, source: &str) {
        let mut is_static = false;
        let mut is_wildcard = false;
        let mut name = None;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "static" => is_static = true,
                "asterisk" => is_wildcard = true,
                "identifier" | "scoped_identifier" => name = text(&child, source),
                _ => {}
            }
        }

        // Static imports name members, not types
        if is_static {
            return;
        }
        if is_wildcard {
            self.on_demand.extend(name);
            return;
        }
        if let Some(qualified) = name {
            let simple = qualified.rsplit('.').next().unwrap_or(&qualified).to_string();
            self.imports.insert(simple, qualified);
        }
    }

    fn resolve(&self, name: &str) -> String {
        let (head, rest) = match name.find('.') {
            Some(idx) => (&name[..idx], Some(&name[idx..])),
            None => (name, None),
        };

        // Lowercase head means the reference is already qualified
        if rest.is_some() && head.starts_with(|c: char| c.is_lowercase()) {
            return name.to_string();
        }

        let resolved_head = if self.type_params.contains(head) {
            "java.lang.Object".to_string()
        } else if let Some(imported) = self.imports.get(head) {
            imported.clone()
        } else if JAVA_LANG.contains(&head) {
            format!("java.lang.{}", head)
        } else {
            qualify(&self.package, head)
        };

        match rest {
            Some(rest) => format!("{}{}", resolved_head, rest),
            None => resolved_head,
        }
    }
}

fn package_name(node: &Node, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    let result = node
        .children(&mut cursor)
        .find(|c| c.kind() == "identifier" || c.kind() == "scoped_identifier")
        .and_then(|c| text(&c, source));
    result
}

/// Build the pseudo-type of a package-info compilation unit
fn namespace_marker(root: &Node, source: &str, resolver: &Resolver, path: &Path) -> TypeDescriptor {
    let mut ty = TypeDescriptor::new(&resolver.package, NAMESPACE_MARKER).with_kind(TypeKind::Namespace);
    ty.path = Some(path.to_path_buf());

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "package_declaration" {
            ty.markers = parse_markers(&child, source, resolver);
            ty.comment = javadoc(&child, source);
            ty.line = child.start_position().row + 1;
        }
    }
    ty
}

/// Parse a top-level type declaration
fn parse_type(node: &Node, kind: TypeKind, source: &str, resolver: &Resolver) -> Option<TypeDescriptor> {
    let name_node = node.child_by_field_name("name")?;
    let simple_name = text(&name_node, source)?;

    // Type parameters shadow same-named types for the whole declaration
    let scoped = Resolver {
        package: resolver.package.clone(),
        imports: resolver.imports.clone(),
        on_demand: resolver.on_demand.clone(),
        type_params: type_parameters(node, source),
    };
    let resolver = &scoped;

    let mut ty = TypeDescriptor::new(&resolver.package, &simple_name).with_kind(kind);
    ty.line = name_node.start_position().row + 1;
    ty.comment = javadoc(node, source);
    ty.on_demand_imports = resolver.on_demand.clone();

    if let Some(modifiers) = child_of_kind(node, "modifiers") {
        ty.markers = parse_markers(&modifiers, source, resolver);
    }

    ty.implements = contracts(node, kind, source, resolver);

    // record components are the record's fields
    if kind == TypeKind::Record {
        if let Some(params) = node.child_by_field_name("parameters") {
            ty.fields.extend(parse_components(&params, source, resolver));
        }
    }

    if let Some(body) = node.child_by_field_name("body") {
        parse_body(&body, &mut ty, source, resolver);
    }

    Some(ty)
}

/// Names of the declaration's type parameters
fn type_parameters(node: &Node, source: &str) -> HashSet<String> {
    let mut names = HashSet::new();
    if let Some(params) = node.child_by_field_name("type_parameters") {
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if param.kind() != "type_parameter" {
                continue;
            }
            let mut inner = param.walk();
            let name = param
                .named_children(&mut inner)
                .find(|c| c.kind() == "type_identifier" || c.kind() == "identifier")
                .and_then(|c| text(&c, source));
            if let Some(name) = name {
                names.insert(name);
            }
        }
    }
    names
}

/// Implemented (classes, enums, records) or extended (interfaces) contracts
fn contracts(node: &Node, kind: TypeKind, source: &str, resolver: &Resolver) -> Vec<String> {
    let list = match kind {
        TypeKind::Interface => child_of_kind(node, "extends_interfaces"),
        _ => node
            .child_by_field_name("interfaces")
            .or_else(|| child_of_kind(node, "super_interfaces")),
    };

    let Some(list) = list else {
        return Vec::new();
    };
    let Some(type_list) = child_of_kind(&list, "type_list") else {
        return Vec::new();
    };

    let mut result = Vec::new();
    let mut cursor = type_list.walk();
    for ty in type_list.named_children(&mut cursor) {
        if let Some((name, _)) = type_ref(&ty, source, resolver) {
            result.push(name);
        }
    }
    result
}

/// Walk a type body collecting fields and methods
fn parse_body(body: &Node, ty: &mut TypeDescriptor, source: &str, resolver: &Resolver) {
    let mut cursor = body.walk();
    for member in body.children(&mut cursor) {
        match member.kind() {
            "field_declaration" | "constant_declaration" => {
                ty.fields.extend(parse_fields(&member, source, resolver));
            }
            "method_declaration" => {
                if let Some(method) = parse_method(&member, source, resolver) {
                    ty.methods.push(method);
                }
            }
            // enum constants are followed by regular members
            "enum_body_declarations" => parse_body(&member, ty, source, resolver),
            _ => {}
        }
    }
}

/// One FieldRef per declarator: `int x, y;` declares two fields
fn parse_fields(node: &Node, source: &str, resolver: &Resolver) -> Vec<FieldRef> {
    let Some(type_node) = node.child_by_field_name("type") else {
        return Vec::new();
    };
    let Some((type_name, primitive)) = type_ref(&type_node, source, resolver) else {
        return Vec::new();
    };

    let mut fields = Vec::new();
    let mut cursor = node.walk();
    for declarator in node.children_by_field_name("declarator", &mut cursor) {
        let Some(name) = declarator
            .child_by_field_name("name")
            .and_then(|n| text(&n, source))
        else {
            continue;
        };

        // `int values[]` makes the field an array
        let is_array = declarator.child_by_field_name("dimensions").is_some();
        fields.push(field_ref(&name, &type_name, primitive, is_array));
    }
    fields
}

/// Components of a record header: `record Order(Customer customer, int qty)`
fn parse_components(params: &Node, source: &str, resolver: &Resolver) -> Vec<FieldRef> {
    let mut fields = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        if param.kind() != "formal_parameter" {
            continue;
        }
        let Some(name) = param.child_by_field_name("name").and_then(|n| text(&n, source)) else {
            continue;
        };
        let Some((type_name, primitive)) = param
            .child_by_field_name("type")
            .and_then(|t| type_ref(&t, source, resolver))
        else {
            continue;
        };
        let is_array = param.child_by_field_name("dimensions").is_some();
        fields.push(field_ref(&name, &type_name, primitive, is_array));
    }
    fields
}

fn field_ref(name: &str, type_name: &str, primitive: bool, is_array: bool) -> FieldRef {
    if is_array {
        FieldRef::reference(name, &format!("{}[]", type_name))
    } else if primitive {
        FieldRef::primitive(name, type_name)
    } else {
        FieldRef::reference(name, type_name)
    }
}

fn parse_method(node: &Node, source: &str, resolver: &Resolver) -> Option<MethodDescriptor> {
    let name_node = node.child_by_field_name("name")?;
    let name = text(&name_node, source)?;

    let mut params = Vec::new();
    if let Some(formal) = node.child_by_field_name("parameters") {
        let mut cursor = formal.walk();
        for param in formal.named_children(&mut cursor) {
            let param_name = match param.kind() {
                "formal_parameter" => param.child_by_field_name("name"),
                "spread_parameter" => child_of_kind(&param, "variable_declarator")
                    .and_then(|d| d.child_by_field_name("name")),
                _ => None,
            };
            if let Some(param_name) = param_name.and_then(|n| text(&n, source)) {
                params.push(param_name);
            }
        }
    }

    let markers = child_of_kind(node, "modifiers")
        .map(|m| parse_markers(&m, source, resolver))
        .unwrap_or_default();

    Some(MethodDescriptor {
        signature: format!("{}({})", name, params.join(", ")),
        name,
        code: text(node, source),
        line: name_node.start_position().row + 1,
        markers,
    })
}

/// Annotations found directly under `node`
fn parse_markers(node: &Node, source: &str, resolver: &Resolver) -> Vec<Marker> {
    let mut markers = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "annotation" && child.kind() != "marker_annotation" {
            continue;
        }
        let Some(name) = child
            .child_by_field_name("name")
            .and_then(|n| text(&n, source))
        else {
            continue;
        };

        let mut marker = Marker::new(&resolver.resolve(&name));
        if let Some(args) = child.child_by_field_name("arguments") {
            let mut args_cursor = args.walk();
            for arg in args.named_children(&mut args_cursor) {
                if arg.kind() == "element_value_pair" {
                    let key = arg.child_by_field_name("key").and_then(|k| text(&k, source));
                    let value = arg.child_by_field_name("value").and_then(|v| text(&v, source));
                    if let (Some(key), Some(value)) = (key, value) {
                        marker.params.insert(key, unquote(&value));
                    }
                } else if let Some(value) = text(&arg, source) {
                    // single unnamed element: @Glossary("...")
                    marker.params.insert("value".to_string(), unquote(&value));
                }
            }
        }
        markers.push(marker);
    }
    markers
}

/// Resolve a type node to (identity, is_primitive)
fn type_ref(node: &Node, source: &str, resolver: &Resolver) -> Option<(String, bool)> {
    match node.kind() {
        "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {
            let name = text(node, source)?;
            let primitive = PRIMITIVES.contains(&name.as_str());
            Some((name, primitive))
        }
        "type_identifier" | "scoped_type_identifier" => {
            let name: String = text(node, source)?
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            Some((resolver.resolve(&name), false))
        }
        "generic_type" => {
            // erasure: List<Order> references List
            let mut cursor = node.walk();
            let raw = node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "type_identifier" || c.kind() == "scoped_type_identifier")?;
            type_ref(&raw, source, resolver)
        }
        "array_type" => {
            let element = node.child_by_field_name("element")?;
            let (name, _) = type_ref(&element, source, resolver)?;
            let dims = node
                .child_by_field_name("dimensions")
                .and_then(|d| text(&d, source))
                .map_or(1, |d| d.matches('[').count().max(1));
            Some((format!("{}{}", name, "[]".repeat(dims)), false))
        }
        "annotated_type" => {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .filter(|c| c.kind() != "annotation" && c.kind() != "marker_annotation")
                .last()?;
            type_ref(&inner, source, resolver)
        }
        _ => text(node, source).map(|t| (t, false)),
    }
}

/// Javadoc immediately preceding a declaration
fn javadoc(node: &Node, source: &str) -> Option<String> {
    let prev = node.prev_sibling()?;
    if !matches!(prev.kind(), "block_comment" | "comment") {
        return None;
    }
    let raw = text(&prev, source)?;
    if !raw.starts_with("/**") {
        return None;
    }
    clean_javadoc(&raw)
}

/// Strip comment delimiters, leading stars and block tags
fn clean_javadoc(raw: &str) -> Option<String> {
    let body = raw.trim_start_matches("/**").trim_end_matches("*/");
    let mut lines = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        let line = line.strip_prefix('*').unwrap_or(line).trim();
        if line.starts_with('@') {
            break;
        }
        lines.push(line);
    }
    let text = lines.join("\n").trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn unquote(value: &str) -> String {
    value.trim().trim_matches('"').to_string()
}

fn child_of_kind<'a>(node: &Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn text(node: &Node, source: &str) -> Option<String> {
    node.utf8_text(source.as_bytes()).ok().map(str::to_string)
}

fn first_error_line(node: &Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error_line)
}

/// Re-resolve same-package fallbacks through on-demand imports.
///
/// A simple name that is neither imported nor in `java.lang` resolves to
/// the enclosing package while parsing. Once every scanned type is known,
/// such a name that is not declared there is redirected to the first
/// on-demand package that does declare it. Names found nowhere are left as
/// they are.
pub fn resolve_on_demand_imports(types: &mut [TypeDescriptor]) {
    let known: HashSet<String> = types.iter().map(|ty| ty.name.clone()).collect();

    for ty in types.iter_mut() {
        if ty.on_demand_imports.is_empty() {
            continue;
        }
        let namespace = ty.namespace.as_str();
        let packages = ty.on_demand_imports.as_slice();

        for field in ty.fields.iter_mut().filter(|f| !f.primitive) {
            if let Some(found) = on_demand_target(&field.type_name, namespace, packages, &known) {
                field.type_name = found;
            }
        }
        for contract in ty.implements.iter_mut() {
            if let Some(found) = on_demand_target(contract, namespace, packages, &known) {
                *contract = found;
            }
        }
    }
}

fn on_demand_target(
    type_name: &str,
    namespace: &str,
    packages: &[String],
    known: &HashSet<String>,
) -> Option<String> {
    let base = type_name.trim_end_matches("[]");
    let dims = &type_name[base.len()..];
    if known.contains(base) || namespace_of(base) != namespace {
        return None;
    }

    let simple = base.rsplit('.').next().unwrap_or(base);
    packages
        .iter()
        .map(|package| qualify(package, simple))
        .find(|candidate| known.contains(candidate))
        .map(|found| format!("{}{}", found, dims))
}
