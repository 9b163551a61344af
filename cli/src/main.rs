//! Tristream CLI — estimate triangle counts of an edge stream
//!
//! Reads an edge list, runs the insertion-only or fully dynamic sampler over
//! it and writes the global and per-node estimates.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;
use tracing::Level;
use tristream::{
    write_outputs, Mode, NodeId, RunConfig, RunSummary, StreamDriver, TriangleSampler,
};

#[derive(Parser)]
#[command(name = "tristream", version, about = "Streaming triangle estimation with waiting-room sampling")]
struct Cli {
    /// Log sampler internals
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate triangle counts of an edge stream
    Run(RunArgs),
    /// Print the effective run configuration as YAML
    Resolve(RunArgs),
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum StreamMode {
    /// Edges are only inserted
    Insertion,
    /// Edges are inserted and deleted (third column: sign)
    Dynamic,
}

impl From<StreamMode> for Mode {
    fn from(mode: StreamMode) -> Self {
        match mode {
            StreamMode::Insertion => Mode::Insertion,
            StreamMode::Dynamic => Mode::Dynamic,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Args)]
struct RunArgs {
    /// YAML run configuration; flags override its values
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Edge list to read
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Directory receiving the output files
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Maximum number of sampled edges (at least 2)
    #[arg(long = "max-samples", short = 'k')]
    max_samples: Option<usize>,

    /// Relative size of the waiting room, in [0, 1)
    #[arg(long)]
    alpha: Option<f64>,

    /// Stream model
    #[arg(long, value_enum)]
    mode: Option<StreamMode>,

    /// Random seed (random when neither flag nor config sets it)
    #[arg(long, env = "TRISTREAM_SEED")]
    seed: Option<u64>,

    /// Let deletions drive estimates below zero instead of clamping
    #[arg(long)]
    unbiased: bool,

    /// Field separator of the edge list
    #[arg(long)]
    delimiter: Option<char>,

    /// Log progress every N records (0 disables)
    #[arg(long)]
    progress_interval: Option<u64>,

    /// Print the N nodes with the largest local estimates
    #[arg(long, default_value_t = 0)]
    top: usize,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => run(&args),
        Commands::Resolve(args) => resolve(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Merge the config file (if any) with the command line flags
fn build_config(args: &RunArgs) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => RunConfig::default(),
    };

    if let Some(input) = &args.input {
        config.input = Some(input.clone());
    }
    if let Some(output) = &args.output {
        config.output_dir = Some(output.clone());
    }
    if let Some(k) = args.max_samples {
        config.sampler.max_samples = k;
    }
    if let Some(alpha) = args.alpha {
        config.sampler.alpha = alpha;
    }
    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }
    if let Some(seed) = args.seed {
        config.sampler.seed = Some(seed);
    }
    if args.unbiased {
        config.sampler.lower_bound = false;
    }
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
    if let Some(interval) = args.progress_interval {
        config.progress_interval = interval;
    }

    // fix the seed here so it can be reported
    config.sampler.seed.get_or_insert_with(rand::random);

    config.validate()?;
    Ok(config)
}

fn resolve(args: &RunArgs) -> Result<()> {
    let config = build_config(args)?;
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

fn run(args: &RunArgs) -> Result<()> {
    let config = build_config(args)?;
    let (Some(input), Some(output_dir)) = (&config.input, &config.output_dir) else {
        anyhow::bail!("input and output paths are required");
    };

    if let OutputFormat::Table = args.format {
        println!("input_path: {}", input.display());
        println!("output_path: {}", output_dir.display());
        println!("k: {}", config.sampler.max_samples);
        println!("alpha: {}", config.sampler.alpha);
        println!("graph_type: {}", config.mode);
        if let Some(seed) = config.sampler.seed {
            println!("seed: {}", seed);
        }
        if config.mode == Mode::Dynamic {
            println!("lower_bound: {}", config.sampler.lower_bound);
        }
    }

    let mut driver = StreamDriver::from_run_config(&config)?;
    let summary = driver
        .run_file(input, config.delimiter)
        .with_context(|| format!("failed to process {}", input.display()))?;
    let paths = write_outputs(output_dir, driver.mode(), driver.sampler())
        .with_context(|| format!("failed to write outputs to {}", output_dir.display()))?;

    let top = top_nodes(driver.sampler(), args.top);

    match args.format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "config": config,
                "summary": summary,
                "outputs": {
                    "global": paths.global,
                    "local": paths.local,
                },
                "top": top
                    .iter()
                    .map(|(node, count)| serde_json::json!({ "node": node, "estimate": count }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            print_summary(&summary);
            println!("Global estimate written to {}", paths.global.display());
            println!("Local estimates written to {}", paths.local.display());
            if !top.is_empty() {
                print_top(&top);
            }
        }
    }

    Ok(())
}

/// The `n` nodes with the largest local estimates, ties broken by node id
fn top_nodes(sampler: &dyn TriangleSampler, n: usize) -> Vec<(NodeId, f64)> {
    if n == 0 {
        return Vec::new();
    }
    let mut nodes: Vec<(NodeId, f64)> = sampler
        .local_triangle_estimates()
        .iter()
        .map(|(&node, &count)| (node, count))
        .collect();
    nodes.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    nodes.truncate(n);
    nodes
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("Records:   {}", summary.records);
    println!(
        "Sampled:   {} edges ({} waiting room + {} reservoir)",
        summary.sample.sampled_edges(),
        summary.sample.waiting_room_len,
        summary.sample.reservoir_len
    );
    println!("Nodes:     {}", summary.local_nodes);
    println!("Elapsed:   {:.3}s", summary.elapsed.as_secs_f64());
    println!("Estimated number of global triangles: {}", summary.global_estimate);
}

fn print_top(top: &[(NodeId, f64)]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Node", "Local triangles"]);

    for (node, count) in top {
        table.add_row(vec![node.to_string(), format!("{:.3}", count)]);
    }

    println!("{}", table);
    println!("{} row(s)", top.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RunArgs {
        let mut argv = vec!["tristream", "run"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Commands::Run(args) => args,
            Commands::Resolve(_) => unreachable!(),
        }
    }

    #[test]
    fn test_flags_build_config() {
        let args = parse(&[
            "-i", "edges.tsv", "-o", "out", "-k", "500", "--alpha", "0.2", "--mode", "dynamic",
            "--seed", "9", "--unbiased",
        ]);
        let config = build_config(&args).unwrap();

        assert_eq!(config.input, Some(PathBuf::from("edges.tsv")));
        assert_eq!(config.mode, Mode::Dynamic);
        assert_eq!(config.sampler.max_samples, 500);
        assert_eq!(config.sampler.alpha, 0.2);
        assert_eq!(config.sampler.seed, Some(9));
        assert!(!config.sampler.lower_bound);
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        let args = parse(&["-i", "edges.tsv", "-o", "out", "--alpha", "1.0"]);
        assert!(build_config(&args).is_err());
    }

    fn write_yaml(dir: &tempfile::TempDir, body: &str) -> String {
        let path = dir.path().join("run.yaml");
        std::fs::write(&path, body).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_seedless_yaml_gets_random_seed() {
        let dir = tempfile::TempDir::new().unwrap();
        let yaml = write_yaml(&dir, "input: a.tsv\noutput_dir: out\nsampler:\n  max_samples: 100\n");

        let first = build_config(&parse(&["-c", &yaml])).unwrap();
        let second = build_config(&parse(&["-c", &yaml])).unwrap();

        assert_eq!(first.sampler.max_samples, 100);
        assert!(first.sampler.seed.is_some());
        assert!(second.sampler.seed.is_some());
        assert_ne!(first.sampler.seed, second.sampler.seed);
    }

    #[test]
    fn test_yaml_seed_kept_and_flag_overrides() {
        let dir = tempfile::TempDir::new().unwrap();
        let yaml = write_yaml(&dir, "input: a.tsv\noutput_dir: out\nsampler:\n  seed: 7\n");

        assert_eq!(build_config(&parse(&["-c", &yaml])).unwrap().sampler.seed, Some(7));
        assert_eq!(
            build_config(&parse(&["-c", &yaml, "--seed", "11"])).unwrap().sampler.seed,
            Some(11)
        );
    }

    #[test]
    fn test_missing_input_rejected() {
        let args = parse(&["-o", "out"]);
        assert!(build_config(&args).is_err());
    }
}
