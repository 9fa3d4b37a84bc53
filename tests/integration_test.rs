// Integration tests for livingdoc

use assert_cmd::Command;
use livingdoc::config::{DiagramConfig, GlossaryConfig, TourConfig, WordCloudConfig};
use livingdoc::parser::{descriptors, ScanMode, TypeKind};
use livingdoc::{
    DiagramGenerator, Error, GlossaryGenerator, SourceScanner, TemplateEngine, TourGenerator,
    TypeDescriptor, WordCloudGenerator,
};
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixtures_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn order_sources() -> PathBuf {
    fixtures_path("order_system/src/main/java")
}

fn scan_order_system() -> Vec<TypeDescriptor> {
    SourceScanner::new(vec![order_sources()])
        .scan()
        .expect("Scan failed")
}

fn diagram_config() -> DiagramConfig {
    DiagramConfig {
        prefix: "com.acme.shop".to_string(),
        clusters: vec!["infra".to_string()],
        ..Default::default()
    }
}

// ============================================================================
// Scanning Tests
// ============================================================================

#[test]
fn test_scan_order_system() {
    let types = scan_order_system();
    let names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();

    assert_eq!(
        names,
        vec![
            "com.acme.shop.domain.Customer",
            "com.acme.shop.domain.Order",
            "com.acme.shop.domain.OrderLine",
            "com.acme.shop.domain.OrderRepository",
            "com.acme.shop.domain.OrderTest",
            "com.acme.shop.domain.package-info",
            "com.acme.shop.infra.JdbcOrderRepository",
            "com.acme.shop.ports.OrderService",
        ]
    );
}

#[test]
fn test_scan_extracts_structure() {
    let types = scan_order_system();
    let order = types.iter().find(|t| t.simple_name == "Order").unwrap();

    let fields: Vec<(&str, &str, bool)> = order
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.type_name.as_str(), f.primitive))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("customer", "com.acme.shop.domain.Customer", false),
            ("lines", "java.util.List", false),
            ("quantity", "int", true),
        ]
    );
    assert_eq!(
        order.comment.as_deref(),
        Some("A customer request to buy products.\nPlaced once, then fulfilled.")
    );
    assert!(order.marker("Glossary").is_some());
    assert_eq!(order.methods[0].signature, "place(buyer)");

    let repo = types
        .iter()
        .find(|t| t.simple_name == "JdbcOrderRepository")
        .unwrap();
    assert_eq!(repo.implements, vec!["com.acme.shop.domain.OrderRepository"]);

    let line = types.iter().find(|t| t.simple_name == "OrderLine").unwrap();
    assert_eq!(line.kind, TypeKind::Record);
    let components: Vec<(&str, &str)> = line
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.type_name.as_str()))
        .collect();
    assert_eq!(components, vec![("product", "java.lang.String"), ("amount", "int")]);

    let marker = types.iter().find(|t| t.is_namespace_marker()).unwrap();
    assert_eq!(marker.kind, TypeKind::Namespace);
    assert_eq!(marker.namespace, "com.acme.shop.domain");
}

#[test]
fn test_strict_scan_fails_on_broken_file() {
    let result = SourceScanner::new(vec![fixtures_path("broken_project/src")]).scan();
    assert!(matches!(result, Err(Error::Parse { .. })));
}

#[test]
fn test_lenient_scan_skips_broken_file() {
    let types = SourceScanner::new(vec![fixtures_path("broken_project/src")])
        .with_mode(ScanMode::Lenient)
        .scan()
        .expect("Lenient scan failed");
    assert!(types.is_empty());
}

#[test]
fn test_scan_nonexistent_path() {
    let result = SourceScanner::new(vec![PathBuf::from("/nonexistent/path")]).scan();
    assert!(matches!(result, Err(Error::PathNotFound(_))));
}

// ============================================================================
// Diagram Tests
// ============================================================================

#[test]
fn test_diagram_of_order_system() {
    let types = scan_order_system();
    let generator = DiagramGenerator::new(&diagram_config()).unwrap();
    let graph = generator.build(&types);

    assert_eq!(graph.node_count(), 6);
    assert_eq!(graph.cluster_of("com.acme.shop.domain.Order"), Some("hexagon"));
    assert_eq!(
        graph.cluster_of("com.acme.shop.infra.JdbcOrderRepository"),
        Some("infra")
    );
    assert!(graph.node("com.acme.shop.ports.OrderService").is_some());
    assert_eq!(graph.cluster_of("com.acme.shop.ports.OrderService"), None);
    assert!(graph.node("com.acme.shop.domain.OrderTest").is_none());
    assert!(graph.node("com.acme.shop.domain.package-info").is_none());
}

#[test]
fn test_diagram_edges_in_wiring_order() {
    let types = scan_order_system();
    let dot = DiagramGenerator::new(&diagram_config()).unwrap().render(&types);

    let edges: Vec<&str> = dot.lines().filter(|l| l.contains(" -> ")).collect();
    assert_eq!(
        edges,
        vec![
            r#"  "com.acme.shop.domain.OrderRepository" -> "com.acme.shop.infra.JdbcOrderRepository" [arrowtail=empty, style=dashed, dir=back];"#,
            r#"  "com.acme.shop.ports.OrderService" -> "com.acme.shop.domain.OrderRepository" [arrowhead=vee, style=solid];"#,
            r#"  "com.acme.shop.domain.Order" -> "com.acme.shop.domain.Customer" [arrowhead=vee, style=solid];"#,
            r#"  "com.acme.shop.domain.Order" -> "java.util.List" [arrowhead=vee, style=solid];"#,
            r#"  "com.acme.shop.domain.OrderLine" -> "java.lang.String" [arrowhead=vee, style=solid];"#,
        ]
    );
}

#[test]
fn test_diagram_exclusion_drops_nodes_and_edges() {
    let types = scan_order_system();
    let config = DiagramConfig {
        package_excludes: vec![r"com\.acme\.shop\.infra".to_string(), r"java\..*".to_string()],
        ..diagram_config()
    };
    let dot = DiagramGenerator::new(&config).unwrap().render(&types);

    assert!(!dot.contains("JdbcOrderRepository"));
    assert!(!dot.contains("java.util.List"));
    // the cluster itself is still declared
    assert!(dot.contains(r#"subgraph "cluster_infra""#));
}

#[test]
fn test_diagram_resolves_wildcard_imports() {
    let types = SourceScanner::new(vec![fixtures_path("wildcard_project/src")])
        .scan()
        .expect("Scan failed");
    let config = DiagramConfig {
        prefix: "com.acme.billing".to_string(),
        ..Default::default()
    };
    let dot = DiagramGenerator::new(&config).unwrap().render(&types);

    let edges: Vec<&str> = dot.lines().filter(|l| l.contains(" -> ")).collect();
    assert_eq!(
        edges,
        vec![
            r#"  "com.acme.billing.infra.InvoiceStore" -> "com.acme.billing.domain.Invoice" [arrowhead=vee, style=solid];"#,
            r#"  "com.acme.billing.infra.InvoiceStore" -> "com.acme.billing.infra.Clock" [arrowhead=vee, style=solid];"#,
            r#"  "com.acme.billing.domain.Invoices" -> "com.acme.billing.infra.InvoiceStore" [arrowtail=empty, style=dashed, dir=back];"#,
        ]
    );
    assert!(!dot.contains("com.acme.billing.infra.Invoice\""));
}

#[test]
fn test_diagram_rejects_core_cluster_id_as_named_cluster() {
    let config = DiagramConfig {
        clusters: vec!["hexagon".to_string()],
        ..diagram_config()
    };
    assert!(matches!(
        DiagramGenerator::new(&config),
        Err(Error::ConfigValidation(_))
    ));
}

#[test]
fn test_diagram_is_deterministic() {
    let types = scan_order_system();
    let generator = DiagramGenerator::new(&diagram_config()).unwrap();
    assert_eq!(generator.render(&types), generator.render(&types));
}

#[test]
fn test_diagram_generation_writes_files() {
    let types = scan_order_system();
    let out = TempDir::new().unwrap();
    let engine = TemplateEngine::new().unwrap();
    let config = DiagramConfig {
        emit_dot: true,
        ..diagram_config()
    };

    let report = DiagramGenerator::new(&config)
        .unwrap()
        .generate(&types, &engine, out.path())
        .expect("Diagram generation failed");

    assert_eq!(report.page, out.path().join("livingdiagram.html"));
    assert_eq!(report.nodes, 6);
    assert_eq!(report.edges, 5);

    let html = fs::read_to_string(&report.page).unwrap();
    assert!(html.contains("<title>Living Diagram</title>"));
    assert!(html.contains("Core Domain"));

    let dot = fs::read_to_string(report.dot.unwrap()).unwrap();
    assert!(dot.starts_with("digraph \"Hexagonal Architecture\" {\n  rankdir=LR;\n"));
    assert!(dot.contains("  subgraph \"cluster_hexagon\" {\n    label=\"Core Domain\";\n"));
}

#[test]
fn test_descriptors_json_round_trip_gives_same_diagram() {
    let types = scan_order_system();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("descriptors.json");

    descriptors::save_json(&path, &types).unwrap();
    let loaded = descriptors::load_json(&path).unwrap();

    let generator = DiagramGenerator::new(&diagram_config()).unwrap();
    assert_eq!(generator.render(&types), generator.render(&loaded));
}

// ============================================================================
// Documentation Tests
// ============================================================================

#[test]
fn test_glossary_generation() {
    let types = scan_order_system();
    let out = TempDir::new().unwrap();
    let engine = TemplateEngine::new().unwrap();

    let path = GlossaryGenerator::new(&GlossaryConfig::default())
        .generate(&types, &engine, out.path())
        .unwrap();

    let html = fs::read_to_string(path).unwrap();
    assert!(html.contains("Someone who places orders."));
    assert!(html.contains("A customer request to buy products."));
    assert!(!html.contains("OrderRepository"));
    assert!(html.find("Customer").unwrap() < html.find("Placed once").unwrap());
}

#[test]
fn test_tour_generation() {
    let types = scan_order_system();
    let out = TempDir::new().unwrap();
    let engine = TemplateEngine::new().unwrap();
    let config = TourConfig {
        repository_link: "https://git.example.com/shop".to_string(),
        ..Default::default()
    };

    let written = TourGenerator::new(&config)
        .generate(&types, &engine, out.path())
        .unwrap();
    assert_eq!(written, vec![out.path().join("Quick_Tour.html")]);

    let html = fs::read_to_string(&written[0]).unwrap();
    assert!(html.contains(
        "## 1. [Order](https://git.example.com/shop/src/main/java/com/acme/shop/domain/Order.java#L13)"
    ));
    assert!(html.contains("*Where it all starts*"));
    assert!(html.contains("## 2. [place(buyer)]"));
    assert!(html.contains("## 3. [submit(order)]"));
    assert!(html.contains("*Saving the order*"));
}

#[test]
fn test_wordcloud_generation() {
    let out = TempDir::new().unwrap();
    let engine = TemplateEngine::new().unwrap();

    let generator = WordCloudGenerator::new(&WordCloudConfig::default()).unwrap();
    let bag = generator.scan(&[order_sources()]).unwrap();
    assert!(bag.count("order") > bag.count("customer"));
    assert_eq!(bag.count("public"), 0);
    // package-info.java is excluded by default
    assert_eq!(bag.count("taking"), 0);

    let path = generator
        .generate(&[order_sources()], &engine, out.path())
        .unwrap();
    let html = fs::read_to_string(path).unwrap();
    assert!(html.contains(r#"{"text":"order","size":"#));
}

// ============================================================================
// CLI Tests
// ============================================================================

fn livingdoc(cwd: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("livingdoc").unwrap();
    cmd.current_dir(cwd.path());
    cmd
}

#[test]
fn test_cli_version() {
    let cwd = TempDir::new().unwrap();
    livingdoc(&cwd)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_diagram() {
    let cwd = TempDir::new().unwrap();
    livingdoc(&cwd)
        .args(["diagram", "--source"])
        .arg(order_sources())
        .args(["--output", "docs", "--prefix", "com.acme.shop", "--cluster", "infra", "--emit-dot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Diagram written to:"))
        .stdout(predicate::str::contains("6 nodes, 5 edges"));

    assert!(cwd.path().join("docs/livingdiagram.html").exists());
    let dot = fs::read_to_string(cwd.path().join("docs/livingdiagram.dot")).unwrap();
    assert!(dot.contains(r#"subgraph "cluster_infra""#));
}

#[test]
fn test_cli_reads_config_file() {
    let cwd = TempDir::new().unwrap();
    let config = format!(
        r#"
[source]
directories = ["{}"]

[output]
directory = "site"

[diagram]
prefix = "com.acme.shop"
package_excludes = ["com\\.acme\\.shop\\.ports"]
"#,
        order_sources().display()
    );
    fs::write(cwd.path().join("livingdoc.toml"), config).unwrap();

    livingdoc(&cwd).arg("diagram").assert().success();

    let html = fs::read_to_string(cwd.path().join("site/livingdiagram.html")).unwrap();
    assert!(html.contains("JdbcOrderRepository"));
    assert!(!html.contains("OrderService"));
}

#[test]
fn test_cli_extract_then_diagram_from_descriptors() {
    let cwd = TempDir::new().unwrap();
    livingdoc(&cwd)
        .args(["extract", "--source"])
        .arg(order_sources())
        .args(["--out", "types.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8 descriptors written"));

    livingdoc(&cwd)
        .args(["diagram", "--descriptors", "types.json", "--output", "out"])
        .args(["--prefix", "com.acme.shop"])
        .assert()
        .success();

    assert!(cwd.path().join("out/livingdiagram.html").exists());
}

#[test]
fn test_cli_all() {
    let cwd = TempDir::new().unwrap();
    livingdoc(&cwd)
        .args(["all", "--source"])
        .arg(order_sources())
        .args(["--output", "docs"])
        .assert()
        .success();

    for file in ["glossary.html", "Quick_Tour.html", "wordcloud.html", "livingdiagram.html"] {
        assert!(cwd.path().join("docs").join(file).exists(), "missing {}", file);
    }
}

#[test]
fn test_cli_strict_diagram_fails_on_broken_source() {
    let cwd = TempDir::new().unwrap();
    livingdoc(&cwd)
        .args(["diagram", "--source"])
        .arg(fixtures_path("broken_project/src"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_cli_glossary_skips_broken_source() {
    let cwd = TempDir::new().unwrap();
    livingdoc(&cwd)
        .args(["glossary", "--source"])
        .arg(fixtures_path("broken_project/src"))
        .args(["--output", "docs"])
        .assert()
        .success();

    assert!(cwd.path().join("docs/glossary.html").exists());
}

#[test]
fn test_cli_invalid_exclude_pattern() {
    let cwd = TempDir::new().unwrap();
    livingdoc(&cwd)
        .args(["diagram", "--source"])
        .arg(order_sources())
        .args(["--exclude", "("])
        .assert()
        .failure();
}
