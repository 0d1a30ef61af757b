use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use itertools::Itertools;
use listing_normalizer::{normalize, parse_input, CanonicalRecord, InputFormat, NormalizerConfig};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "listing-normalizer", about = "Normalize scraped property listings into a fixed schema")]
struct Cli {
    /// TOML config file (LISTING_* env vars still override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize one document and print the record as JSON
    Parse {
        file: PathBuf,
        /// auto, json, markdown or text
        #[arg(short, long, default_value = "auto")]
        format: InputFormat,
        /// Property name hint (outranks anything in the document)
        #[arg(long)]
        name: Option<String>,
        /// Listing URL hint
        #[arg(long)]
        url: Option<String>,
        /// Location hint
        #[arg(long)]
        location: Option<String>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Normalize a subject and a competitor listing side by side
    Compare {
        subject: PathBuf,
        competitor: PathBuf,
        #[arg(short, long, default_value = "auto")]
        format: InputFormat,
    },
    /// Normalize many documents and print a summary table
    Batch {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(short, long, default_value = "auto")]
        format: InputFormat,
    },
}

fn main() -> anyhow::Result<()> {
    // stdout carries JSON; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let cfg = NormalizerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { file, format, name, url, location, compact } => {
            let raw = read_file(&file)?;
            let mut input = parse_input(&raw, format)?;
            if let Some(name) = name {
                input = input.with_name(name);
            }
            if let Some(url) = url {
                input = input.with_url(url);
            }
            if let Some(location) = location {
                input = input.with_location(Value::String(location));
            }
            let record = normalize(&input, &cfg);
            let json = if compact {
                serde_json::to_string(&record)?
            } else {
                serde_json::to_string_pretty(&record)?
            };
            println!("{}", json);
        }
        Commands::Compare { subject, competitor, format } => {
            // independent documents, no shared state
            let (a, b) = rayon::join(
                || normalize_file(&subject, format, &cfg),
                || normalize_file(&competitor, format, &cfg),
            );
            let records = vec![a?, b?];
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Batch { files, format } => {
            let results = normalize_many(&files, format, &cfg)?;
            print_summary(&results);

            let elapsed = t0.elapsed();
            if elapsed.as_secs() >= 1 {
                println!("\nDone in {}", format_duration(elapsed));
            }
        }
    }

    Ok(())
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn normalize_file(path: &Path, format: InputFormat, cfg: &NormalizerConfig) -> anyhow::Result<CanonicalRecord> {
    let raw = read_file(path)?;
    let input = parse_input(&raw, format).with_context(|| format!("parsing {}", path.display()))?;
    Ok(normalize(&input, cfg))
}

fn normalize_many(
    files: &[PathBuf],
    format: InputFormat,
    cfg: &NormalizerConfig,
) -> anyhow::Result<Vec<(PathBuf, anyhow::Result<CanonicalRecord>)>> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let results = files
        .par_iter()
        .map(|path| {
            let record = normalize_file(path, format, cfg);
            pb.inc(1);
            (path.clone(), record)
        })
        .collect();

    pb.finish_and_clear();
    Ok(results)
}

fn print_summary(results: &[(PathBuf, anyhow::Result<CanonicalRecord>)]) {
    println!(
        "{:>3} | {:<24} | {:<28} | {:>8} | {:>5} | {:>5} | {}",
        "#", "File", "Property", "Sections", "Items", "Score", "Flags"
    );
    println!("{}", "-".repeat(110));

    let mut failed = 0;
    for (i, (path, result)) in results.iter().enumerate() {
        let file = truncate(&path.display().to_string(), 24);
        match result {
            Ok(r) => println!(
                "{:>3} | {:<24} | {:<28} | {:>8} | {:>5} | {:>5.2} | {}",
                i + 1,
                file,
                truncate(&r.property_name, 28),
                r.sections.len(),
                r.total_items(),
                r.confidence_score,
                r.quality_flags.iter().join(",")
            ),
            Err(e) => {
                failed += 1;
                println!("{:>3} | {:<24} | error: {:#}", i + 1, file, e);
            }
        }
    }

    let scores: Vec<f64> = results
        .iter()
        .filter_map(|(_, r)| r.as_ref().ok().map(|r| r.confidence_score))
        .collect();
    let mean = if scores.is_empty() { 0.0 } else { scores.iter().sum::<f64>() / scores.len() as f64 };
    println!(
        "\n{} documents ({} failed) | mean confidence {:.2}",
        results.len(),
        failed,
        mean
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
