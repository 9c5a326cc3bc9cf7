//! Apply the country adoption adjustment to a previously written occupation table
//!
//! Usage: cargo run --bin country_adjust -- <occupations.csv> <countries.csv>

use anyhow::{Context, Result};
use clap::Parser;
use skill_forecast::cli::ConfigArgs;
use skill_forecast::tables::load_occupation_table;
use skill_forecast::{load_country_table, ForecastPipeline};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "country_adjust", about = "Remap occupation trajectories onto country time axes")]
struct Cli {
    /// Occupation table written by skill_forecast
    occupations: PathBuf,

    /// Country indicator table (CSV)
    countries: PathBuf,

    /// Output CSV
    #[arg(long, short, default_value = "country_vulnerability.csv")]
    output: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = cli.config.resolve().context("Invalid configuration")?;
    let pipeline = ForecastPipeline::new(config)?;

    let occupations = load_occupation_table(&cli.occupations, pipeline.config())
        .with_context(|| format!("Failed to load occupation table {}", cli.occupations.display()))?;
    let countries = load_country_table(&cli.countries)
        .with_context(|| format!("Failed to load country table {}", cli.countries.display()))?;
    countries.report.log_warnings();

    let file = File::create(&cli.output)
        .with_context(|| format!("Unable to create {}", cli.output.display()))?;
    let mut profiles = pipeline.write_countries(BufWriter::new(file), &countries, &occupations)?;

    println!("Country Adoption Adjustment");
    println!("===========================\n");
    println!("Occupations: {}", occupations.len());
    println!("Countries: {}", profiles.len());
    println!();
    println!("{:<30} {:>9} {:>11}", "Country", "Capacity", "Multiplier");
    println!("{}", "-".repeat(52));

    profiles.sort_by(|a, b| b.capacity_score.total_cmp(&a.capacity_score));
    for p in &profiles {
        println!("{:<30} {:>9.3} {:>11.3}", p.country, p.capacity_score, p.adoption_multiplier);
    }

    println!("\nResults written to: {}", cli.output.display());
    Ok(())
}
