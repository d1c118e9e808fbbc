use clap::Parser;
use colored::Colorize;
use depusage::analysis::{DependencyReport, DependencyUsageAnalyzer, ExposureAnalyzer, FindingKind, UsageInput};
use depusage::baseline::Baseline;
use depusage::config::{Config, DependencyEntry, DependencyScope};
use depusage::dependency::{ArtifactCoordinates, DependencyDeclaration};
use depusage::discovery::{find_project_outputs, Artifact, ArtifactReader};
use depusage::graph::{ClassGraph, ClassGraphBuilder, ClassIndex, ParallelClassGraphBuilder};
use depusage::report::{ReportFormat, Reporter};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::PathBuf;
use tracing::info;

/// depusage - Find unused and misconfigured JVM dependencies
#[derive(Parser, Debug)]
#[command(name = "depusage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project class directories or jars (can be specified multiple times)
    #[arg(short, long, value_name = "PATH")]
    project: Vec<PathBuf>,

    /// Api dependency as group:name:version=PATH
    #[arg(long, value_name = "COORDINATE=PATH", value_parser = parse_dependency_arg)]
    api: Vec<(String, PathBuf)>,

    /// Implementation dependency as group:name:version=PATH
    #[arg(long, value_name = "COORDINATE=PATH", value_parser = parse_dependency_arg)]
    implementation: Vec<(String, PathBuf)>,

    /// Transitive dependency as group:name:version=PATH
    #[arg(long, value_name = "COORDINATE=PATH", value_parser = parse_dependency_arg)]
    transitive: Vec<(String, PathBuf)>,

    /// Class entry patterns to exclude (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Dependency patterns to retain - never report (can be specified multiple times)
    #[arg(short, long)]
    retain: Vec<String>,

    /// Output format (defaults to the config file setting)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (for json/sarif formats)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Read and parse artifacts in parallel
    #[arg(long)]
    parallel: bool,

    /// Skip the api/implementation exposure check
    #[arg(long)]
    no_exposure: bool,

    /// Baseline file for ignoring existing findings
    #[arg(long, value_name = "FILE")]
    baseline: Option<PathBuf>,

    /// Generate a baseline file from current results
    #[arg(long, value_name = "FILE")]
    generate_baseline: Option<PathBuf>,

    /// Exit with an error when unused direct dependencies are found
    #[arg(long)]
    fail_on_unused: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Terminal,
    Json,
    Sarif,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Sarif => ReportFormat::Sarif,
        }
    }
}

fn parse_dependency_arg(value: &str) -> std::result::Result<(String, PathBuf), String> {
    let (coordinate, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected group:name:version=PATH, got '{}'", value))?;
    coordinate
        .parse::<DependencyDeclaration>()
        .map_err(|e| e.to_string())?;
    if path.is_empty() {
        return Err(format!("missing artifact path in '{}'", value));
    }
    Ok((coordinate.to_string(), PathBuf::from(path)))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    info!("depusage v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config(&cli)?;

    run_analysis(&config, &cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        // Try to load from default locations
        Config::from_default_locations(&cli.path)?
    };

    // Override with CLI arguments
    if !cli.project.is_empty() {
        config.project = cli.project.clone();
    }
    let declared = [
        (&cli.api, DependencyScope::Api),
        (&cli.implementation, DependencyScope::Implementation),
        (&cli.transitive, DependencyScope::Transitive),
    ];
    for (entries, scope) in declared {
        config.dependencies.extend(
            entries
                .iter()
                .map(|(coordinate, path)| DependencyEntry::new(coordinate.clone(), path.clone(), scope)),
        );
    }
    if !cli.exclude.is_empty() {
        config.exclude.extend(cli.exclude.clone());
    }
    if !cli.retain.is_empty() {
        config.retain.extend(cli.retain.clone());
    }
    if cli.no_exposure {
        config.report.check_api_exposure = false;
    }

    Ok(config)
}

fn run_analysis(config: &Config, cli: &Cli) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;

    let start_time = Instant::now();

    // Step 1: Resolve artifacts
    let mut project = config.project_artifacts(&cli.path);
    if project.is_empty() {
        project = find_project_outputs(&cli.path)
            .into_iter()
            .map(Artifact::from_path)
            .collect();
        info!("Using {} conventional project output directories", project.len());
    }
    if project.is_empty() {
        eprintln!("{}", "No project class directories or jars found.".yellow());
        return Ok(());
    }
    let dependencies = config.dependency_artifacts(&cli.path)?;
    let dependency_set = config.dependency_set()?;

    info!(
        "Analyzing {} project artifacts against {} dependency artifacts",
        project.len(),
        dependencies.len()
    );

    // Step 2: Index classes
    let reader = ArtifactReader::from_config(config);
    let project_index = ClassIndex::build_with(&project, &reader, config.duplicate_classes)
        .into_diagnostic()
        .wrap_err("Failed to index project classes")?;
    let external_index = ClassIndex::build_with(&dependencies, &reader, config.duplicate_classes)
        .into_diagnostic()
        .wrap_err("Failed to index dependency classes")?;
    project_index
        .check_shadowing(&external_index, config.duplicate_classes)
        .into_diagnostic()
        .wrap_err("Project classes clash with dependency classes")?;

    info!(
        "Indexed {} project classes, {} dependency classes",
        project_index.len(),
        external_index.len()
    );

    // Step 3: Parse classes and build the reference graph, project first
    let artifacts: Vec<Artifact> = project.iter().chain(dependencies.iter()).cloned().collect();
    let graph: ClassGraph = if cli.parallel {
        if !cli.quiet {
            eprintln!(
                "{}",
                format!("⚡ Parallel mode: reading {} artifacts...", artifacts.len()).cyan()
            );
        }
        ParallelClassGraphBuilder::new()
            .with_reader(reader.clone())
            .build_from_artifacts(&artifacts)
            .into_diagnostic()
            .wrap_err("Failed to read class files")?
    } else {
        let pb = if cli.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(artifacts.len() as u64)
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .into_diagnostic()?
                .progress_chars("#>-"),
        );

        info!("Parsing class files...");
        let mut graph_builder = ClassGraphBuilder::new().with_reader(reader.clone());

        for artifact in &artifacts {
            graph_builder
                .process_artifact(artifact)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to read {}", artifact.path.display()))?;
            pb.inc(1);
        }
        pb.finish_and_clear();

        graph_builder.build()
    };

    info!(
        "Class graph: {} classes, {} references in {:.2}s",
        graph.class_count(),
        graph.reference_count(),
        start_time.elapsed().as_secs_f64()
    );

    // Step 4: Walk the graph from project classes
    let coordinates = ArtifactCoordinates::from_artifacts(&dependencies);
    let input = UsageInput {
        project: &project_index,
        external: &external_index,
        graph: &graph,
        coordinates: &coordinates,
        dependencies: &dependency_set,
    };

    let (usage, reachable) = DependencyUsageAnalyzer::new().analyze_with_reachable(&input);

    // Step 5: Api exposure check
    let exposure = if config.report.check_api_exposure {
        Some(ExposureAnalyzer::new().analyze(&input, &usage))
    } else {
        None
    };

    let mut report = DependencyReport::build(&input, usage, &reachable, exposure);
    report.apply_retain(config);

    info!("Found {} dependency findings", report.findings.len());

    // Step 6: Generate baseline if requested
    if let Some(ref baseline_path) = cli.generate_baseline {
        Baseline::from_findings(&report.findings)
            .save(baseline_path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to generate baseline {}", baseline_path.display()))?;
        if !cli.quiet {
            eprintln!(
                "{}",
                format!(
                    "📋 Baseline generated: {} ({} findings)",
                    baseline_path.display(),
                    report.findings.len()
                )
                .green()
            );
        }
    }

    // Step 7: Filter by baseline if provided
    if let Some(ref baseline_path) = cli.baseline {
        let baseline = Baseline::load(baseline_path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to load baseline {}", baseline_path.display()))?;
        if !cli.quiet {
            eprintln!("{}", format!("📋 Baseline: {}", baseline.stats(&report.findings)).cyan());
        }
        report.filter_findings(|finding| !baseline.is_baselined(finding));
    }

    // Step 8: Report results
    let format = cli
        .format
        .map(ReportFormat::from)
        .unwrap_or_else(|| ReportFormat::from_name(&config.report.format));
    let reporter = Reporter::new(format, cli.output.clone());
    reporter.report(&report)?;

    if cli.fail_on_unused && report.has_unused() {
        let unused = report
            .findings
            .iter()
            .filter(|finding| finding.kind == FindingKind::UnusedDirect)
            .count();
        miette::bail!("{} unused direct dependencies", unused);
    }

    Ok(())
}
