//! CSV writers for the skill, occupation and country tables

use super::columns::{country_headers, occupation_headers, skill_headers, Variant};
use crate::config::ForecastConfig;
use crate::country::CountryOccupation;
use crate::error::{ForecastError, Result};
use crate::projection::{Band, ProjectionSet, YearSeries};
use crate::vulnerability::OccupationVulnerability;
use csv::Writer;
use log::info;
use std::io;

/// Append the three variants of every configured year to `record`
fn push_bands(
    record: &mut Vec<String>,
    series: &YearSeries<Band>,
    subject: &str,
    config: &ForecastConfig,
) -> Result<()> {
    for year in config.years() {
        let band = series.get(year).ok_or_else(|| ForecastError::MissingYear {
            subject: subject.to_string(),
            year,
        })?;
        record.extend(Variant::ALL.iter().map(|v| v.of(band).to_string()));
    }
    Ok(())
}

/// One row per distinct skill: baseline, growth, then trend and band per year
pub fn write_skill_table<W: io::Write>(
    writer: W,
    projections: &ProjectionSet,
    config: &ForecastConfig,
) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);
    csv_writer.write_record(skill_headers(config))?;

    for projection in projections.iter() {
        let mut record = vec![
            projection.skill.clone(),
            projection.baseline.to_string(),
            projection.growth_pts.to_string(),
        ];
        for year in config.years() {
            let missing = || ForecastError::MissingYear {
                subject: projection.skill.clone(),
                year,
            };
            let trend = projection.deterministic.get(year).ok_or_else(missing)?;
            let band = projection.bands.get(year).ok_or_else(missing)?;
            record.push(trend.to_string());
            record.extend(Variant::ALL.iter().map(|v| v.of(band).to_string()));
        }
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    info!("Wrote {} skill projections", projections.len());
    Ok(())
}

/// One row per (occupation, code)
pub fn write_occupation_table<W: io::Write>(
    writer: W,
    occupations: &[OccupationVulnerability],
    config: &ForecastConfig,
) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);
    csv_writer.write_record(occupation_headers(config))?;

    for occupation in occupations {
        let mut record = vec![
            occupation.occupation.clone(),
            occupation.code.clone(),
            occupation.skill_count.to_string(),
        ];
        push_bands(&mut record, &occupation.vulnerability, &occupation.occupation, config)?;
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    info!("Wrote {} occupation trajectories", occupations.len());
    Ok(())
}

/// Streams the country table one country at a time
///
/// The header goes out on construction; each [`write_country`] call appends
/// that country's rows and flushes, so callers can drop them afterwards.
///
/// [`write_country`]: CountryTableWriter::write_country
pub struct CountryTableWriter<'a, W: io::Write> {
    writer: Writer<W>,
    config: &'a ForecastConfig,
    countries: usize,
    rows: usize,
}

impl<'a, W: io::Write> CountryTableWriter<'a, W> {
    pub fn new(writer: W, config: &'a ForecastConfig) -> Result<Self> {
        let mut writer = Writer::from_writer(writer);
        writer.write_record(country_headers(config))?;
        Ok(Self {
            writer,
            config,
            countries: 0,
            rows: 0,
        })
    }

    pub fn write_country(&mut self, rows: &[CountryOccupation]) -> Result<()> {
        for row in rows {
            let mut record = vec![
                row.country.clone(),
                row.capacity_score.to_string(),
                row.adoption_multiplier.to_string(),
                row.occupation.clone(),
                row.code.clone(),
            ];
            let subject = format!("{} / {}", row.country, row.occupation);
            push_bands(&mut record, &row.vulnerability, &subject, self.config)?;
            self.writer.write_record(&record)?;
        }
        self.writer.flush()?;
        self.countries += 1;
        self.rows += rows.len();
        Ok(())
    }

    /// Flush and return (countries, rows) written
    pub fn finish(mut self) -> Result<(usize, usize)> {
        self.writer.flush()?;
        info!("Wrote {} country rows for {} countries", self.rows, self.countries);
        Ok((self.countries, self.rows))
    }
}
