//! Skill Forecast CLI
//!
//! Runs the full pipeline over a skill-demand table and writes the skill,
//! occupation and (optionally) country tables.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use skill_forecast::cli::ConfigArgs;
use skill_forecast::report::DEFAULT_RANK_COUNT;
use skill_forecast::tables::{write_occupation_table, write_skill_table};
use skill_forecast::{
    load_country_table, load_skill_table, BenchmarkTable, ForecastPipeline, RunSummary,
};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "skill_forecast", version, about = "Project occupational exposure to automated capability")]
struct Cli {
    /// Skill-demand table (CSV)
    skills: PathBuf,

    /// Country indicator table (CSV); enables the country stage
    #[arg(long, value_name = "FILE")]
    countries: Option<PathBuf>,

    /// Benchmark growth table (CSV with Benchmark, Annual_Growth_pts)
    #[arg(long, value_name = "FILE")]
    benchmarks: Option<PathBuf>,

    /// Directory for the output tables
    #[arg(long, short, default_value = "output")]
    output_dir: PathBuf,

    /// Occupations listed at each end of the summary ranking
    #[arg(long, default_value_t = DEFAULT_RANK_COUNT)]
    top: usize,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = cli.config.resolve().context("Invalid configuration")?;
    let mut pipeline = ForecastPipeline::new(config)?;
    if let Some(path) = &cli.benchmarks {
        let table = BenchmarkTable::from_csv_path(path, pipeline.config().fallback_growth_pts)
            .with_context(|| format!("Failed to load benchmark table {}", path.display()))?;
        pipeline = pipeline.with_benchmarks(table);
    }

    let skills = load_skill_table(&cli.skills)
        .with_context(|| format!("Failed to load skill table {}", cli.skills.display()))?;
    let countries = cli
        .countries
        .as_ref()
        .map(|path| {
            load_country_table(path)
                .with_context(|| format!("Failed to load country table {}", path.display()))
        })
        .transpose()?;

    let output = pipeline.run(&skills).context("Forecast failed")?;
    let config = pipeline.config();

    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("Unable to create {}", cli.output_dir.display()))?;

    let skill_path = cli.output_dir.join("skill_projections.csv");
    write_skill_table(create(&skill_path)?, &output.projections, config)?;
    info!("Skill projections written to {}", skill_path.display());

    let occupation_path = cli.output_dir.join("occupation_vulnerability.csv");
    write_occupation_table(create(&occupation_path)?, &output.occupations, config)?;
    info!("Occupation trajectories written to {}", occupation_path.display());

    let mut summary = RunSummary::from_output(&output, config, cli.top);

    if let Some(countries) = countries {
        let country_path = cli.output_dir.join("country_vulnerability.csv");
        let profiles = pipeline
            .write_countries(create(&country_path)?, &countries, &output.occupations)
            .context("Country adjustment failed")?;
        info!("Country trajectories written to {}", country_path.display());
        summary = summary.with_countries(profiles, countries.report);
    }

    summary.quality.log_warnings();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary);
        println!("Outputs written to: {}", cli.output_dir.display());
    }

    Ok(())
}
