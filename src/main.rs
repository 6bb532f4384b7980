//! Tenderdoc - procurement document generation.
//!
//! Builds proposals, technical specifications, cost estimates and contracts
//! from templates, optionally elaborated by a language model.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tenderdoc::{
    create_generator, CompletionManager, Config, GenerationRequest, GeneratorKind,
    GeneratorOptions, TemplateStore, TenderContext,
};

/// Procurement document generator
#[derive(Parser)]
#[command(name = "tenderdoc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Template directory (overrides configuration)
    #[arg(short, long, global = true, env = "TENDERDOC_TEMPLATES_DIR")]
    templates: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a document from a JSON request
    Generate {
        /// Request file (JSON)
        #[arg(short, long)]
        request: PathBuf,

        /// Tender record to ground the document in (JSON)
        #[arg(long)]
        tender: Option<PathBuf>,

        /// Generator (transformer, template, hybrid)
        #[arg(short, long)]
        generator: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect loaded templates
    Templates {
        #[command(subcommand)]
        operation: TemplatesOperation,
    },

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Write the effective configuration to the global config file
        #[arg(long, conflicts_with = "path")]
        save: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum TemplatesOperation {
    /// List loaded templates
    List {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show one template
    Show {
        /// Template id
        id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
    Text,
}

fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    let mut config = Config::load()?;
    if let Some(dir) = cli.templates {
        config.generation.templates_dir = Some(dir);
    }

    match cli.command {
        Commands::Generate { request, tender, generator, format, output } => {
            cmd_generate(
                &config,
                &request,
                tender.as_deref(),
                generator.as_deref(),
                format,
                output.as_deref(),
            )?;
        }
        Commands::Templates { operation } => match operation {
            TemplatesOperation::List { format } => cmd_templates_list(&config, &format)?,
            TemplatesOperation::Show { id } => cmd_templates_show(&config, &id)?,
        },
        Commands::Config { path, save } => {
            cmd_config(&config, path, save)?;
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

/// Generate one document.
fn cmd_generate(
    config: &Config,
    request_path: &Path,
    tender_path: Option<&Path>,
    generator: Option<&str>,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let raw = std::fs::read_to_string(request_path)
        .with_context(|| format!("Failed to read request {}", request_path.display()))?;
    let request = GenerationRequest::from_json(&raw)
        .with_context(|| format!("Invalid request {}", request_path.display()))?;

    let tender = match tender_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read tender {}", path.display()))?;
            let tender: TenderContext = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid tender {}", path.display()))?;
            Some(tender)
        }
        None => None,
    };

    let store = Arc::new(TemplateStore::load(&config.templates_dir()));
    let kind = GeneratorKind::select(generator, &request, &config.generation.default_generator);
    let generator = create_generator(
        kind,
        store,
        Arc::new(completion_manager(config)),
        GeneratorOptions::from(&config.generation),
    );

    tracing::info!(generator = %kind, title = %request.title, "Generating document");

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;
    let document = rt.block_on(generator.generate(&request, tender.as_ref()))?;

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&document)?,
        OutputFormat::Markdown => document.to_markdown(),
        OutputFormat::Text => document.full_text(),
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} sections to {}", document.sections.len(), path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

#[cfg(feature = "ai")]
fn completion_manager(config: &Config) -> CompletionManager {
    CompletionManager::from_config(&config.ai)
}

#[cfg(not(feature = "ai"))]
fn completion_manager(_config: &Config) -> CompletionManager {
    CompletionManager::new(Vec::new())
}

/// List loaded templates.
fn cmd_templates_list(config: &Config, format: &str) -> Result<()> {
    let dir = config.templates_dir();
    let store = TemplateStore::load(&dir);

    match format {
        "json" => {
            let templates: Vec<_> = store.iter().collect();
            println!("{}", serde_json::to_string_pretty(&templates)?);
        }
        "text" => {
            if store.is_empty() {
                println!("No templates in {}", dir.display());
                return Ok(());
            }

            println!("Templates in {}:\n", dir.display());
            for template in store.iter() {
                println!(
                    "  {:<24} {:<16} {} sections",
                    template.id,
                    template.document_type.as_str(),
                    template.sections.len()
                );
            }
        }
        other => anyhow::bail!("Unsupported format: {other}. Supported: text, json"),
    }

    Ok(())
}

/// Show one template's structure.
fn cmd_templates_show(config: &Config, id: &str) -> Result<()> {
    let store = TemplateStore::load(&config.templates_dir());
    let Some(template) = store.get(id) else {
        anyhow::bail!("Template not found: {id}");
    };

    println!("{} ({})", template.id, template.document_type);
    println!("Title: {}", template.title_pattern());
    println!(
        "Style: tone={}, formality={}, technical_level={}",
        template.style_guide.tone,
        template.style_guide.formality,
        template.style_guide.technical_level
    );
    println!();
    for (idx, section) in template.sections.iter().enumerate() {
        let marker = if section.required { "" } else { " (optional)" };
        println!("  {}. {}{marker}", idx + 1, section.name);
        if !section.description.is_empty() {
            println!("     {}", section.description);
        }
    }

    Ok(())
}

/// Show configuration.
fn cmd_config(config: &Config, show_path: bool, save: bool) -> Result<()> {
    if save {
        let path = config.save()?;
        println!("Saved configuration to {}", path.display());
        return Ok(());
    }

    if show_path {
        if let Some(path) = Config::config_dir() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let toml = toml::to_string_pretty(config)?;
    println!("{toml}");

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "tenderdoc", &mut io::stdout());
}
