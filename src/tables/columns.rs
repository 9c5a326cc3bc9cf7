//! Column naming for the wide output tables

use crate::config::ForecastConfig;
use crate::projection::Band;

/// One of the three reported percentile variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Median,
    P05,
    P95,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Median, Variant::P05, Variant::P95];

    /// Label used in vulnerability column names
    pub fn label(&self) -> &'static str {
        match self {
            Variant::Median => "Median",
            Variant::P05 => "p05",
            Variant::P95 => "p95",
        }
    }

    /// Suffix used in capability column names
    fn capability_suffix(&self) -> &'static str {
        match self {
            Variant::Median => "median",
            Variant::P05 => "p05",
            Variant::P95 => "p95",
        }
    }

    pub fn of(&self, band: &Band) -> f64 {
        match self {
            Variant::Median => band.median,
            Variant::P05 => band.p05,
            Variant::P95 => band.p95,
        }
    }
}

pub fn vulnerability_column(variant: Variant, year: i32) -> String {
    format!("Vulnerability_{}_{}", variant.label(), year)
}

pub fn adjusted_column(variant: Variant, year: i32) -> String {
    format!("Adjusted_Vulnerability_{}_{}", variant.label(), year)
}

/// `Skill, AI_Score_2024, Annual_Growth_pts`, then per year the trend and its band
pub fn skill_headers(config: &ForecastConfig) -> Vec<String> {
    let mut headers = vec![
        "Skill".to_string(),
        "AI_Score_2024".to_string(),
        "Annual_Growth_pts".to_string(),
    ];
    for year in config.years() {
        headers.push(format!("AI_{}", year));
        for variant in Variant::ALL {
            headers.push(format!("AI_{}_{}", year, variant.capability_suffix()));
        }
    }
    headers
}

/// `Occupation, Code, Skill_Count`, then per year the three variants
pub fn occupation_headers(config: &ForecastConfig) -> Vec<String> {
    let mut headers = vec!["Occupation".to_string(), "Code".to_string(), "Skill_Count".to_string()];
    for year in config.years() {
        headers.extend(Variant::ALL.iter().map(|v| vulnerability_column(*v, year)));
    }
    headers
}

pub fn country_headers(config: &ForecastConfig) -> Vec<String> {
    let mut headers: Vec<String> = ["Country", "Capacity_Score", "Adoption_Multiplier", "Occupation", "Code"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    for year in config.years() {
        headers.extend(Variant::ALL.iter().map(|v| adjusted_column(*v, year)));
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config() -> ForecastConfig {
        ForecastConfig {
            end_year: 2025,
            ..ForecastConfig::default()
        }
    }

    #[test]
    fn test_skill_headers() {
        assert_eq!(
            skill_headers(&short_config()),
            vec![
                "Skill", "AI_Score_2024", "Annual_Growth_pts",
                "AI_2024", "AI_2024_median", "AI_2024_p05", "AI_2024_p95",
                "AI_2025", "AI_2025_median", "AI_2025_p05", "AI_2025_p95",
            ]
        );
    }

    #[test]
    fn test_occupation_and_country_headers() {
        let config = short_config();
        let occupation = occupation_headers(&config);
        assert_eq!(occupation.len(), 3 + 2 * 3);
        assert_eq!(occupation[3], "Vulnerability_Median_2024");
        assert_eq!(occupation[5], "Vulnerability_p95_2024");
        assert_eq!(occupation[6], "Vulnerability_Median_2025");

        let country = country_headers(&config);
        assert_eq!(country.len(), 5 + 2 * 3);
        assert_eq!(country[4], "Code");
        assert_eq!(country[6], "Adjusted_Vulnerability_p05_2024");
    }

    #[test]
    fn test_variant_selects_band_field() {
        let band = Band::new(0.5, 0.4, 0.6);
        let values: Vec<f64> = Variant::ALL.iter().map(|v| v.of(&band)).collect();
        assert_eq!(values, vec![0.5, 0.4, 0.6]);
    }
}
