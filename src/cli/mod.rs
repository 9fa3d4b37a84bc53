//! CLI module for livingdoc

mod args;

pub use args::{Args, CommonArgs, Command};

use crate::config::{CliOverrides, Config, DEFAULT_CONFIG_FILE};
use crate::diagram::DiagramGenerator;
use crate::docs::{GlossaryGenerator, TourGenerator, WordCloudGenerator};
use crate::error::Result;
use crate::output::TemplateEngine;
use crate::parser::{descriptors, ScanMode, SourceScanner, TypeDescriptor};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Diagram {
            common,
            prefix,
            core_domain,
            cluster,
            exclude,
            descriptors,
            emit_dot,
        } => {
            let cfg = load_config(
                &common,
                CliOverrides {
                    prefix,
                    core_domain,
                    clusters: cluster,
                    package_excludes: exclude,
                    emit_dot,
                    ..Default::default()
                },
            )?;

            let types = match descriptors {
                Some(path) => {
                    println!("Loading descriptors from {}...", path.display());
                    descriptors::load_json(&path)?
                }
                None => scan(&cfg, ScanMode::Strict, common.verbose)?,
            };

            let engine = TemplateEngine::new()?;
            run_diagram(&cfg, &types, &engine)
        }

        Command::Glossary {
            common,
            annotation,
            format,
        } => {
            let cfg = load_config(
                &common,
                CliOverrides {
                    glossary_annotation: annotation,
                    glossary_format: format,
                    ..Default::default()
                },
            )?;
            let types = scan(&cfg, ScanMode::Lenient, common.verbose)?;
            let engine = TemplateEngine::new()?;
            run_glossary(&cfg, &types, &engine)
        }

        Command::Tour {
            common,
            prefix,
            annotation,
            repository_link,
            theme,
        } => {
            let cfg = load_config(
                &common,
                CliOverrides {
                    tour_prefix: prefix,
                    tour_annotation: annotation,
                    repository_link,
                    theme,
                    ..Default::default()
                },
            )?;
            let types = scan(&cfg, ScanMode::Lenient, common.verbose)?;
            let engine = TemplateEngine::new()?;
            run_tour(&cfg, &types, &engine)
        }

        Command::Wordcloud { common } => {
            let cfg = load_config(&common, CliOverrides::default())?;
            let engine = TemplateEngine::new()?;
            run_wordcloud(&cfg, &engine)
        }

        Command::Extract { common, out } => {
            let cfg = load_config(&common, CliOverrides::default())?;
            let types = scan(&cfg, ScanMode::Strict, common.verbose)?;
            descriptors::save_json(&out, &types)?;
            println!("{} descriptors written to: {}", types.len(), out.display());
            Ok(())
        }

        Command::All { common } => {
            let cfg = load_config(&common, CliOverrides::default())?;
            // the diagram needs every type, so one strict scan serves all generators
            let types = scan(&cfg, ScanMode::Strict, common.verbose)?;
            let engine = TemplateEngine::new()?;

            run_glossary(&cfg, &types, &engine)?;
            run_tour(&cfg, &types, &engine)?;
            run_wordcloud(&cfg, &engine)?;
            run_diagram(&cfg, &types, &engine)
        }

        Command::Version => {
            println!("livingdoc {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Install the tracing subscriber; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let default = if verbose { "livingdoc=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load the config file, apply CLI values and validate the result
fn load_config(common: &CommonArgs, mut overrides: CliOverrides) -> Result<Config> {
    init_logging(common.verbose);

    let mut cfg = match &common.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };

    overrides.sources = common.source.clone();
    overrides.output = common.output.clone();
    cfg.merge_cli(overrides);
    cfg.validate()?;

    if common.verbose {
        println!("Sources: {:?}", cfg.source.directories);
        println!("Output: {}", cfg.output.directory.display());
    }

    Ok(cfg)
}

fn scan(cfg: &Config, mode: ScanMode, verbose: bool) -> Result<Vec<TypeDescriptor>> {
    println!("Scanning sources...");
    let types = SourceScanner::new(cfg.source.directories.clone())
        .with_mode(mode)
        .with_verbose(verbose)
        .scan()?;
    println!("Found {} types", types.len());
    Ok(types)
}

fn run_diagram(cfg: &Config, types: &[TypeDescriptor], engine: &TemplateEngine) -> Result<()> {
    let report = DiagramGenerator::new(&cfg.diagram)?.generate(types, engine, &cfg.output.directory)?;
    println!(
        "Diagram written to: {} ({} nodes, {} edges)",
        report.page.display(),
        report.nodes,
        report.edges
    );
    if let Some(dot) = report.dot {
        println!("DOT written to: {}", dot.display());
    }
    Ok(())
}

fn run_glossary(cfg: &Config, types: &[TypeDescriptor], engine: &TemplateEngine) -> Result<()> {
    let path = GlossaryGenerator::new(&cfg.glossary).generate(types, engine, &cfg.output.directory)?;
    println!("Glossary written to: {}", path.display());
    Ok(())
}

fn run_tour(cfg: &Config, types: &[TypeDescriptor], engine: &TemplateEngine) -> Result<()> {
    let written: Vec<PathBuf> =
        TourGenerator::new(&cfg.tour).generate(types, engine, &cfg.output.directory)?;
    if written.is_empty() {
        println!("No guided tour steps found");
    }
    for path in written {
        println!("Tour written to: {}", path.display());
    }
    Ok(())
}

fn run_wordcloud(cfg: &Config, engine: &TemplateEngine) -> Result<()> {
    let path = WordCloudGenerator::new(&cfg.wordcloud)?.generate(
        &cfg.source.directories,
        engine,
        &cfg.output.directory,
    )?;
    println!("Word cloud written to: {}", path.display());
    Ok(())
}
