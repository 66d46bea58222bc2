use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ormcheck_core::{Config, Report, Severity};
use ormcheck_descriptors::DescriptorRegistry;
use ormcheck_engine::{Analyzer, EntityColumnRule, RuleOptions};
use ormcheck_metadata::{ClassReflector, ManifestResolver, SourceIndex};

const DEFAULT_CONFIG: &str = "ormcheck.toml";

/// ormcheck - ORM column type vs property type verification
#[derive(Parser)]
#[command(name = "ormcheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ormcheck.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check column mappings against declared property types
    Check {
        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Only check these classes (all mapped classes if not specified)
        #[arg(long = "class")]
        classes: Vec<String>,
    },

    /// List registered column type descriptors
    Descriptors,

    /// Show the column mappings of a class and how they check out
    Explain {
        /// Fully-qualified class name
        class: String,
    },

    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Everything a check needs, built once from the config
struct Project {
    config: Config,
    registry: DescriptorRegistry,
    resolver: ManifestResolver,
    index: SourceIndex,
}

impl Project {
    fn load(config: Config) -> Result<Self> {
        let registry =
            DescriptorRegistry::from_config(&config).context("Failed to build descriptor registry")?;

        let manifest_path = config.entity_manager_path()?;
        let resolver = ManifestResolver::new(manifest_path, config.class_filter.clone());

        let index_path = config.source_index_path()?;
        let index = SourceIndex::from_file(&index_path)
            .with_context(|| format!("Failed to load source index from {}", index_path.display()))?;

        tracing::debug!(
            descriptors = registry.len(),
            classes = index.len(),
            source_index = %index_path.display(),
            "project loaded"
        );

        Ok(Self {
            config,
            registry,
            resolver,
            index,
        })
    }

    fn rule(&self) -> EntityColumnRule<'_> {
        EntityColumnRule::new(&self.resolver, &self.registry, &self.index)
            .with_options(RuleOptions::from(&self.config))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { output, classes } => {
            let config = load_config(cli.config.as_deref(), cli.verbose)?;
            check_command(Project::load(config)?, &output, &classes, cli.verbose)
        }
        Commands::Descriptors => {
            let config = load_config(cli.config.as_deref(), cli.verbose)?;
            descriptors_command(&config)
        }
        Commands::Explain { class } => {
            let config = load_config(cli.config.as_deref(), cli.verbose)?;
            explain_command(&Project::load(config)?, &class)
        }
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
            init_command(&path, force)
        }
    }
}

/// Log to stderr; RUST_LOG wins over --verbose
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    let config = if let Some(config_path) = path {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else if Path::new(DEFAULT_CONFIG).exists() {
        Config::from_file(Path::new(DEFAULT_CONFIG))?
    } else {
        if verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    Ok(config)
}

/// Check command - run the entity column rule and write report.json
fn check_command(project: Project, output: &Path, classes: &[String], verbose: bool) -> Result<()> {
    if verbose {
        eprintln!("{}", "Checking entity column mappings...".cyan());
        eprintln!("  {} descriptors registered", project.registry.len());
        eprintln!("  {} classes in source index", project.index.len());
    }

    let analyzer = Analyzer::new(project.rule())
        .with_allowlist(project.config.allowlist.clone())
        .with_ignore(project.config.ignore.clone());

    let report = if classes.is_empty() {
        analyzer.analyze_all()?
    } else {
        analyzer.analyze(classes)?
    };

    report
        .save_to_file(output)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    print_report_summary(&report);
    println!("\nReport written to: {}", output.display().to_string().cyan());

    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Descriptors command - list the registry built from the config
fn descriptors_command(config: &Config) -> Result<()> {
    let registry =
        DescriptorRegistry::from_config(config).context("Failed to build descriptor registry")?;

    println!("{}", "Registered descriptors:".bold());
    for name in registry.type_names() {
        let descriptor = registry.get(name)?;
        println!(
            "  {:<20} read {}  write {}",
            name.bold(),
            descriptor.database_read_type().to_string().green(),
            descriptor.database_write_type().to_string().yellow()
        );
    }
    println!("\n{} descriptors", registry.len());

    Ok(())
}

/// Explain command - show the mappings of one class and their diagnostics
fn explain_command(project: &Project, class: &str) -> Result<()> {
    let check = project.rule().check_class(class)?;

    if !check.mapped {
        println!("{} is not a mapped class", class.yellow());
        return Ok(());
    }

    println!("{}", check.class.bold().bright_blue());
    for mapping in &check.mappings {
        let declared = project
            .index
            .property(&mapping.declaring_class, &mapping.property_name)
            .map(|p| p.declared_type.unwrap_or_else(|| "(untyped)".to_string()))
            .unwrap_or_else(|| "(not declared)".to_string());

        let mut flags = Vec::new();
        if mapping.nullable {
            flags.push("nullable");
        }
        if mapping.is_generated {
            flags.push("generated");
        }

        print!("  ${} {} {}", mapping.property_name.bold(), mapping.column_type_name.cyan(), declared);
        if !flags.is_empty() {
            print!(" [{}]", flags.join(", "));
        }
        if mapping.declaring_class != check.class {
            print!(" {}", format!("from {}", mapping.declaring_class).dimmed());
        }
        if !check.was_checked(mapping) {
            print!(" {}", "skipped".yellow());
        }
        println!();
    }

    println!();
    println!(
        "{} of {} mappings checked, {} errors",
        check.checked.len(),
        check.mappings.len(),
        check.error_count()
    );
    if check.diagnostics.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        for diag in &check.diagnostics {
            print_diagnostic(diag);
        }
    }

    Ok(())
}

/// Init command - write a starter ormcheck.toml
fn init_command(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let config = Config {
        entity_manager: Some(PathBuf::from("var/ormcheck/entity-manager.json")),
        source_index: Some(PathBuf::from("var/ormcheck/source-index.json")),
        ..Config::default()
    };
    config.save_to_file(path)?;

    println!("{} {}", "Created".green(), path.display());
    Ok(())
}

fn print_diagnostic(diag: &ormcheck_core::Diagnostic) {
    let severity_str = match diag.severity {
        Severity::Error => "ERROR".red().bold(),
        Severity::Warn => "WARN".yellow().bold(),
        Severity::Info => "INFO".cyan(),
    };

    println!("  [{}] {}: {}", severity_str, diag.code, diag.message);
    if let Some(loc) = &diag.location {
        println!("    at {}", loc);
    }
    println!("    {}", format!("fingerprint: {}", diag.fingerprint()).dimmed());
}

fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Entity Column Check Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Classes checked:    {}", report.summary.classes_checked);
    println!("  Properties checked: {}", report.summary.properties_checked);
    println!("  Total diagnostics:  {}", report.summary.total);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).green());
    }

    println!("  Info:     {}", report.summary.info);
    if report.summary.suppressed > 0 {
        println!("  Ignored:  {}", report.summary.suppressed);
    }
    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "Diagnostics:".bold());
        for diag in &report.diagnostics {
            print_diagnostic(diag);
        }
    }
}
