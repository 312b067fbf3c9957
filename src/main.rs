//! Solhound - AST-based Solidity Static Analysis CLI
//!
//! This is the main entry point for the Solhound tool.

use clap::{crate_version, Parser, Subcommand};
use solhound::{
    ast::LocationResolver, reduce, register_all_rules, Config, JsonFormatter, MarkdownFormatter,
    OutputFormat, OutputFormatter, PipelineConfig, PipelineEngine, RuleContext, RuleRegistry,
    RunReport, SarifFormatter, TextFormatter,
};
use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(
    author,
    version = crate_version!(),
    term_width = 80,
    about = "Solhound - AST-based Solidity Static Analysis",
    long_about = None
)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Input solc JSON AST documents to be analyzed.
    pub input_files: Vec<String>,

    /// The root directory of the source tree, if specified.
    #[arg(long, default_value = ".")]
    pub project_root: String,

    /// Report absolute paths instead of project-relative ones.
    #[arg(long, default_value_t = false)]
    pub absolute_paths: bool,

    /// Exclude files whose path contains this substring (repeatable).
    #[arg(long = "exclude-path")]
    pub exclude_paths: Vec<String>,

    /// Suppress findings of this severity (repeatable).
    #[arg(long = "exclude-severity")]
    pub exclude_severities: Vec<String>,

    /// Output format: text, json, markdown, sarif
    #[arg(long, short, default_value = "text")]
    pub format: String,

    /// Output file (default: stdout)
    #[arg(long, short)]
    pub output: Option<String>,

    /// Configuration file path
    #[arg(long, short)]
    pub config: Option<String>,

    /// List of rule IDs to enable (comma-separated)
    #[arg(long)]
    pub enable: Option<String>,

    /// List of rule IDs to disable (comma-separated)
    #[arg(long)]
    pub disable: Option<String>,

    /// Wall-clock budget per rule, in seconds
    #[arg(long)]
    pub rule_timeout: Option<u64>,

    /// Number of worker threads (0 = auto-detect)
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    /// Verbosity
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::ErrorLevel>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze solc AST documents for vulnerabilities
    Analyze {
        /// Input documents to analyze
        files: Vec<String>,
    },
    /// List available rules
    ListRules,
    /// Show rule information
    ShowRule {
        /// Rule ID
        id: String,
    },
    /// Generate a default configuration file
    InitConfig {
        /// Output file
        #[arg(default_value = "solhound.toml")]
        output: String,
    },
}

/// Main function
fn main() {
    let mut args = Arguments::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    // Handle subcommands
    if let Some(command) = args.command.clone() {
        match command {
            Command::ListRules => {
                list_rules();
                return;
            }
            Command::ShowRule { id } => {
                show_rule(&id);
                return;
            }
            Command::InitConfig { output } => {
                init_config(&output);
                return;
            }
            Command::Analyze { files } => {
                args.input_files = files;
                run_analysis(args);
                return;
            }
        }
    }

    // Default: run analysis on input files
    if !args.input_files.is_empty() {
        run_analysis(args);
    } else {
        eprintln!("No input files specified. Use --help for usage information.");
        std::process::exit(1);
    }
}

fn list_rules() {
    let mut registry = RuleRegistry::new();
    register_all_rules(&mut registry);
    println!("Available Rules ({}):", registry.len());
    println!("====================\n");

    let mut rules: Vec<_> = registry.all().collect();
    rules.sort_by(|a, b| a.id().cmp(b.id()));

    println!("{:<25} {:<35} {:<10} {:<10}", "ID", "Name", "Severity", "Precision");
    println!("{}", "-".repeat(85));

    for rule in rules {
        println!(
            "{:<25} {:<35} {:<10} {:<10}",
            rule.id(),
            rule.name(),
            rule.severity().as_str(),
            rule.precision().as_str(),
        );
    }

    println!("\nUse 'solhound show-rule <id>' for detailed information.");
}

fn show_rule(id: &str) {
    let mut registry = RuleRegistry::new();
    register_all_rules(&mut registry);

    match registry.get(id) {
        Some(rule) => {
            println!("Rule: {}", rule.name());
            println!("ID: {}", rule.id());
            println!("Severity: {}", rule.severity());
            println!("Precision: {}", rule.precision().as_str());
            println!();
            println!("Description:");
            println!("  {}", rule.description());

            let action_items = rule.action_items();
            if !action_items.is_empty() {
                println!();
                println!("Action items:");
                for item in action_items {
                    println!("  - {}", item);
                }
            }

            let references = rule.references();
            if !references.is_empty() {
                println!();
                println!("References:");
                for reference in references {
                    println!("  - {}", reference);
                }
            }

            let reports = rule.reports();
            if !reports.is_empty() {
                println!();
                println!("Reports:");
                for report in reports {
                    println!("  - {}", report);
                }
            }
        }
        None => {
            eprintln!("Rule '{}' not found.", id);
            eprintln!("Use 'solhound list-rules' to see available rules.");
            std::process::exit(1);
        }
    }
}

fn init_config(output: &str) {
    match fs::write(output, solhound::config::DEFAULT_CONFIG_TEMPLATE) {
        Ok(_) => {
            println!("Configuration file created: {}", output);
        }
        Err(e) => {
            eprintln!("Failed to create configuration file: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_analysis(args: Arguments) {
    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        Config::from_file(std::path::Path::new(config_path)).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        })
    } else {
        Config::default()
    };

    // Apply CLI overrides
    if args.project_root != "." {
        config.project.root = args.project_root.clone().into();
    }
    if args.absolute_paths {
        config.output.absolute_paths = true;
    }
    config.project.excluded_paths.extend(args.exclude_paths.iter().cloned());
    config
        .output
        .exclude_severities
        .extend(args.exclude_severities.iter().cloned());

    if let Some(enable) = &args.enable {
        config.rules.enabled = enable.split(',').map(|s| s.trim().to_string()).collect();
    }
    if let Some(disable) = &args.disable {
        config.rules.disabled = disable.split(',').map(|s| s.trim().to_string()).collect();
    }
    if let Some(timeout) = args.rule_timeout {
        config.analysis.rule_timeout_secs = timeout;
    }
    if let Some(jobs) = args.jobs {
        config.analysis.max_workers = jobs;
    }
    config.output.format = OutputFormat::parse(&args.format);

    // Create the pipeline engine
    let engine = PipelineEngine::new(PipelineConfig {
        parallel: config.analysis.parallel,
        num_threads: config.analysis.max_workers,
        enabled: config.rules.enabled.clone(),
        disabled: config.rules.disabled.clone(),
        rule_timeout: Duration::from_secs(config.analysis.rule_timeout_secs),
        severity_exclusions: config.output.exclude_severities.clone(),
    });

    // Analyze each input document
    let start = Instant::now();
    let mut all_results = Vec::new();
    let mut files_analyzed = Vec::new();

    for file in &args.input_files {
        let raw = match fs::read_to_string(file) {
            Ok(raw) => raw,
            Err(err) => {
                eprintln!("Error reading {}: {}", file, err);
                continue;
            }
        };
        let document = match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(err) => {
                eprintln!("Error parsing {}: {}", file, err);
                continue;
            }
        };

        let (tree, source_files) = reduce(document, &config.project.excluded_paths);
        let ctx = RuleContext::new(
            Arc::new(tree),
            Arc::new(source_files),
            LocationResolver::new(config.project.root.clone(), config.output.absolute_paths),
        );

        let result = engine.run(ctx);
        log::info!(
            "{}: {} findings from {} rules in {:?}",
            file,
            result.total_findings(),
            result.stats.len(),
            result.total_duration
        );
        all_results.extend(result.reports);
        files_analyzed.push(file.clone());
    }

    if files_analyzed.is_empty() {
        eprintln!("No input documents could be read.");
        std::process::exit(1);
    }

    // Create report
    let report = RunReport::new(all_results, files_analyzed, start.elapsed());

    // Format output
    let output = match config.output.format {
        OutputFormat::Json => JsonFormatter::new(true).format(&report),
        OutputFormat::Markdown => MarkdownFormatter::new().format(&report),
        OutputFormat::Sarif => SarifFormatter::new(true).format(&report),
        OutputFormat::Text => TextFormatter::new().format(&report),
    };

    // Write output
    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &output) {
                eprintln!("Failed to write output: {}", e);
                std::process::exit(1);
            }
            eprintln!("Report written to: {}", path);
        }
        None => {
            println!("{}", output);
        }
    }

    // Exit with error code if high severity issues found
    if report.has_high_severity() {
        std::process::exit(1);
    }
}
