//! Pipeline Builder - Main Entry Point
//!
//! Command line front end for inspecting, validating and scheduling
//! pipeline templates.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pipeline_builder::{
    config::{AppConfig, EditorConfig, LoggingConfig},
    pipeline::{
        Catalog, GraphModel, IdRemapStrategy, Template, TemplateGallery, TemplateInstantiator,
        TopologicalScheduler,
    },
    BuilderError,
};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pipeline-builder")]
#[command(version)]
#[command(about = "Validate and schedule ML pipeline templates", long_about = None)]
struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(long, global = true, env = "PIPELINE_BUILDER_CONFIG")]
    config: Option<PathBuf>,

    /// Id remap strategy: offset, random or prefix:<p>
    #[arg(long, global = true)]
    strategy: Option<IdRemapStrategy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List gallery templates
    Templates,

    /// Print the execution order of a template
    Schedule {
        /// Template JSON file
        #[arg(required_unless_present = "builtin")]
        file: Option<PathBuf>,

        /// Name of a gallery template
        #[arg(short, long, conflicts_with = "file")]
        builtin: Option<String>,

        /// Print the schedule as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a template file and report every problem found
    Validate {
        /// Template JSON file
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, config_error) = load_config(cli.config.as_deref())?;
    let _guard = init_logging(&config.logging);
    if let Some(e) = config_error {
        tracing::warn!("Failed to load config, using defaults: {}", e);
    }

    let strategy = cli
        .strategy
        .clone()
        .unwrap_or_else(|| config.editor.remap_strategy.clone());

    match cli.command {
        Commands::Templates => {
            for template in load_gallery(&config.editor)?.templates() {
                println!(
                    "{:<28} {:<28} {} nodes, {} connections",
                    template.slug(),
                    template.name,
                    template.nodes.len(),
                    template.connections.len()
                );
                if !template.description.is_empty() {
                    println!("    {}", template.description);
                }
            }
        }
        Commands::Schedule {
            file,
            builtin,
            json,
        } => {
            let template = resolve_template(file, builtin, &config.editor)?;
            let graph = build_graph(&template, &config, strategy)?;
            let schedule = TopologicalScheduler::schedule(&graph)
                .with_context(|| format!("Failed to schedule '{}'", template.name))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&schedule)?);
            } else {
                for (step, id) in schedule.iter().enumerate() {
                    let kind = graph.node(id).map(|n| n.kind.as_str()).unwrap_or("?");
                    println!("{:>3}. {} ({})", step + 1, id, kind);
                }
            }
        }
        Commands::Validate { file } => {
            let template = Template::load(&file)?;
            let report = inspect(&template, &config, strategy)?;
            for warning in &report.warnings {
                println!("warning: {}", warning);
            }
            for error in &report.errors {
                println!("error: {}", error);
            }
            if !report.errors.is_empty() {
                bail!("{}: {} problem(s) found", file.display(), report.errors.len());
            }
            println!(
                "{}: ok ({} nodes, {} connections)",
                file.display(),
                template.nodes.len(),
                template.connections.len()
            );
        }
    }

    Ok(())
}

/// An explicit config file must load. The default location falls back to
/// defaults and hands the error back to be logged once logging is up.
fn load_config(path: Option<&Path>) -> anyhow::Result<(AppConfig, Option<BuilderError>)> {
    match path {
        Some(path) => {
            let config = AppConfig::load_from(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            Ok((config, None))
        }
        None => Ok(AppConfig::load_with_fallback()),
    }
}

fn load_gallery(editor: &EditorConfig) -> anyhow::Result<TemplateGallery> {
    match editor.templates_dir() {
        Some(dir) => TemplateGallery::load_dir(&dir)
            .with_context(|| format!("Failed to load templates from {}", dir.display())),
        None => Ok(TemplateGallery::builtin()),
    }
}

/// The template named on the command line. The gallery is only read for
/// `--builtin`.
fn resolve_template(
    file: Option<PathBuf>,
    builtin: Option<String>,
    editor: &EditorConfig,
) -> anyhow::Result<Template> {
    match (file, builtin) {
        (Some(path), _) => Ok(Template::load(path)?),
        (None, Some(name)) => Ok(load_gallery(editor)?.get(&name)?.clone()),
        (None, None) => bail!("either a template file or --builtin is required"),
    }
}

fn build_graph(
    template: &Template,
    config: &AppConfig,
    strategy: IdRemapStrategy,
) -> anyhow::Result<GraphModel<'static>> {
    let mut graph = GraphModel::new();
    graph.set_remap_strategy(strategy);
    graph.set_warn_unknown_controls(config.editor.warn_unknown_controls);
    graph
        .apply_template(template)
        .with_context(|| format!("Failed to instantiate '{}'", template.name))?;
    Ok(graph)
}

/// Findings of `validate`.
#[derive(Debug, Default)]
struct Report {
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Collect every problem with a template: all bad records first, then, if
/// it instantiates, unbound inputs and disconnected nodes.
fn inspect(
    template: &Template,
    config: &AppConfig,
    strategy: IdRemapStrategy,
) -> anyhow::Result<Report> {
    let mut report = Report::default();
    let problems = TemplateInstantiator::diagnose(template, Catalog::builtin());
    if !problems.is_empty() {
        report.errors = problems.iter().map(ToString::to_string).collect();
        return Ok(report);
    }

    let graph = build_graph(template, config, strategy)?;
    for (node_id, key) in graph.flagged_controls() {
        report
            .warnings
            .push(format!("node '{}' has unknown control '{}'", node_id, key));
    }
    for missing in TopologicalScheduler::missing_inputs(&graph)? {
        report
            .errors
            .push(format!("required input {} is not connected", missing));
    }
    if report.errors.is_empty() {
        let schedule = TopologicalScheduler::schedule(&graph)?;
        if schedule.stats.isolated_nodes > 0 && schedule.len() > 1 {
            report.warnings.push(format!(
                "{} node(s) not connected to the pipeline",
                schedule.stats.isolated_nodes
            ));
        }
    }
    Ok(report)
}

/// Console logging plus an optional daily rolling file.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));

    // `rolling::daily` panics if it cannot create the first file, so check
    // the directory is writable first.
    let (file_layer, guard) = match config.log_dir.as_deref().map(prepare_log_dir) {
        Some(Ok(dir)) => {
            let appender = tracing_appender::rolling::daily(dir, "pipeline-builder.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("Warning: file logging disabled: {}", e);
            (None, None)
        }
        None => (None, None),
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn prepare_log_dir(dir: &Path) -> std::io::Result<&Path> {
    std::fs::create_dir_all(dir)?;
    let probe = dir.join(".write_test");
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&probe)?;
    let _ = std::fs::remove_file(&probe);
    Ok(dir)
}
