//! Country readiness indicators and the capacity score

use serde::{Deserialize, Serialize};

/// The eight macro indicators feeding the capacity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    RdExpenditure,
    Electricity,
    ItExports,
    Internet,
    Broadband,
    HighTechExports,
    GovernmentEffectiveness,
    Researchers,
}

impl Indicator {
    pub const ALL: [Indicator; 8] = [
        Indicator::RdExpenditure,
        Indicator::Electricity,
        Indicator::ItExports,
        Indicator::Internet,
        Indicator::Broadband,
        Indicator::HighTechExports,
        Indicator::GovernmentEffectiveness,
        Indicator::Researchers,
    ];

    /// Row label in the country indicator table
    pub fn label(&self) -> &'static str {
        match self {
            Indicator::RdExpenditure => "Public R&D expenditure (% of GDP)",
            Indicator::Electricity => "Electricity Access (% of population)",
            Indicator::ItExports => "IT service exports (% of GDP)",
            Indicator::Internet => "Internet users (% of population)",
            Indicator::Broadband => "Fixed broadband subscriptions (per 100 people)",
            Indicator::HighTechExports => "High-tech exports (% of manufactured exports)",
            Indicator::GovernmentEffectiveness => "Government Effectiveness (WGI, estimate)",
            Indicator::Researchers => "Researchers in R&D (per million people)",
        }
    }

    /// Raw value treated as full capacity
    pub fn cap(&self) -> f64 {
        match self {
            Indicator::RdExpenditure => 2.0,
            Indicator::Electricity => 100.0,
            Indicator::ItExports => 50.0,
            Indicator::Internet => 100.0,
            Indicator::Broadband => 40.0,
            Indicator::HighTechExports => 30.0,
            Indicator::GovernmentEffectiveness => 5.0,
            Indicator::Researchers => 8000.0,
        }
    }

    /// Shift applied before dividing by the cap; WGI estimates span roughly [-2.5, 2.5]
    pub fn offset(&self) -> f64 {
        match self {
            Indicator::GovernmentEffectiveness => 2.5,
            _ => 0.0,
        }
    }

    /// Weight in the capacity score; weights sum to 1
    pub fn weight(&self) -> f64 {
        match self {
            Indicator::RdExpenditure => 0.15,
            Indicator::Electricity => 0.10,
            Indicator::ItExports => 0.15,
            Indicator::Internet => 0.15,
            Indicator::Broadband => 0.10,
            Indicator::HighTechExports => 0.10,
            Indicator::GovernmentEffectiveness => 0.15,
            Indicator::Researchers => 0.10,
        }
    }

    /// Raw value scaled to [0, 1]; missing or non-finite counts as 0
    pub fn normalize(&self, raw: Option<f64>) -> f64 {
        match raw {
            Some(v) if v.is_finite() => ((v + self.offset()) / self.cap()).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Match a table label, ignoring surrounding whitespace and case
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|i| i.label().eq_ignore_ascii_case(label))
    }

    /// Declaration order matches `ALL`
    fn position(&self) -> usize {
        *self as usize
    }
}

/// Raw indicator values for one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryIndicators {
    pub country: String,
    values: [Option<f64>; 8],
}

impl CountryIndicators {
    pub fn new(country: &str) -> Self {
        Self {
            country: country.to_string(),
            values: [None; 8],
        }
    }

    pub fn with(mut self, indicator: Indicator, value: f64) -> Self {
        self.set(indicator, Some(value));
        self
    }

    pub fn set(&mut self, indicator: Indicator, value: Option<f64>) {
        self.values[indicator.position()] = value;
    }

    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        self.values[indicator.position()]
    }

    /// Indicators with no usable value
    pub fn missing(&self) -> impl Iterator<Item = Indicator> + '_ {
        Indicator::ALL
            .into_iter()
            .filter(move |i| !self.get(*i).is_some_and(f64::is_finite))
    }

    /// Weighted sum of normalized indicators, in [0, 1]
    pub fn capacity_score(&self) -> f64 {
        Indicator::ALL
            .iter()
            .map(|i| i.weight() * i.normalize(self.get(*i)))
            .sum()
    }
}
