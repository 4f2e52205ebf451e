use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use kintree::output::{write_graph_json, write_json, write_persons_csv};
use kintree::{Config, Engine, Gender, LifeExpectancyMode, Repository};

#[derive(Parser, Debug)]
#[command(name = "kintree")]
#[command(about = "Generate demographically grounded family trees")]
struct Args {
    /// Country slug for demographics (e.g. "united-states", "japan")
    #[arg(short, long, default_value = "germany")]
    country: String,

    /// Number of generations to generate (1-10)
    #[arg(short, long, default_value = "3")]
    generations: u32,

    /// Random seed for reproducibility (0 = random)
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Birth year of the root person
    #[arg(long, default_value = "1970")]
    start_year: i32,

    /// Root person gender: M, F, or random
    #[arg(long, default_value = "random")]
    gender: String,

    /// Life expectancy source: total, female, male, or by_gender
    #[arg(long, default_value = "total")]
    life_expectancy: String,

    /// Include extended family (siblings)
    #[arg(long)]
    extended: bool,

    /// Path to the country dataset JSON file
    #[arg(long, default_value = "data/countries.json")]
    data: PathBuf,

    /// Output file path
    #[arg(short, long, default_value = "family_tree.csv")]
    output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: Format,

    /// List available countries and exit
    #[arg(long)]
    list_countries: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Format {
    Csv,
    Json,
    Both,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "kintree=debug" } else { "kintree=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let repo = Repository::from_path(&args.data)
        .with_context(|| format!("loading dataset from {}", args.data.display()))?;

    if args.list_countries {
        list_countries(&repo);
        return Ok(());
    }

    let config = Config {
        country: args.country,
        generations: args.generations,
        seed: args.seed,
        start_year: args.start_year,
        root_gender: parse_gender(&args.gender),
        include_extended: args.extended,
        life_expectancy_mode: LifeExpectancyMode::parse(&args.life_expectancy),
    };

    let mut engine = Engine::new(config, &repo);
    let seed = engine.config().seed;
    let tree = engine
        .generate()
        .context("generating family tree")?;

    write_output(&tree, &args.output, args.format)?;

    println!("Family tree generated successfully!");
    println!("  Persons: {}", tree.person_count());
    println!("  Families: {}", tree.family_count());
    println!("  Seed: {seed} (use this to reproduce the same tree)");
    Ok(())
}

fn parse_gender(value: &str) -> Option<Gender> {
    match value {
        "M" | "m" | "male" => Some(Gender::Male),
        "F" | "f" | "female" => Some(Gender::Female),
        _ => None,
    }
}

fn list_countries(repo: &Repository) {
    let countries = repo.countries_with_names();
    println!("Available countries with complete data ({}):\n", countries.len());
    for slug in &countries {
        println!("  {slug}");
    }
    println!("\nNote: use the slug (lowercase with dashes) with the --country flag.");
    println!("Example: kintree --country united-states");
}

fn write_output(
    tree: &kintree::FamilyTree,
    output: &Path,
    format: Format,
) -> anyhow::Result<()> {
    match format {
        Format::Csv => {
            write_persons_csv(tree, output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Output written to: {}", output.display());
        }
        Format::Json => {
            write_json(tree, output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Output written to: {}", output.display());

            let viz = with_suffix(output, "_viz.json");
            write_graph_json(tree, &viz)
                .with_context(|| format!("writing {}", viz.display()))?;
            println!("Visualization data written to: {}", viz.display());
        }
        Format::Both => {
            let csv = with_suffix(output, ".csv");
            write_persons_csv(tree, &csv)
                .with_context(|| format!("writing {}", csv.display()))?;
            println!("CSV output written to: {}", csv.display());

            let json = with_suffix(output, ".json");
            write_json(tree, &json)
                .with_context(|| format!("writing {}", json.display()))?;
            println!("JSON output written to: {}", json.display());

            let viz = with_suffix(output, "_viz.json");
            write_graph_json(tree, &viz)
                .with_context(|| format!("writing {}", viz.display()))?;
            println!("Visualization data written to: {}", viz.display());
        }
    }
    Ok(())
}

/// Replaces the extension of `path` with a literal suffix, so
/// `tree.json` becomes `tree_viz.json` rather than `tree.viz.json`.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.with_extension("");
    let mut name = stem.into_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
