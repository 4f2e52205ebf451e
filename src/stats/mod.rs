//! Country statistics repository.
//!
//! All indicators for one run are loaded up front from a JSON country pack
//! and queried by country slug. Every accessor falls back to a documented
//! default so a sparse pack still generates, just with flatter demographics.

pub mod names;
pub mod series;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::model::Gender;
pub use names::{ForenameRecord, SurnameRecord};
pub use series::YearSeries;

// --- Fallback values for countries missing an indicator ---

pub const DEFAULT_BIRTH_RATE: f64 = 12.0;
pub const DEFAULT_DEATH_RATE: f64 = 8.0;
pub const DEFAULT_LIFE_EXPECTANCY: f64 = 72.0;
pub const DEFAULT_MIGRATION_RATE: f64 = 0.0;
pub const DEFAULT_INFANT_MORTALITY: f64 = 30.0;
pub const DEFAULT_GDP_PER_CAPITA: f64 = 15_000.0;
pub const DEFAULT_UNEMPLOYMENT_RATE: f64 = 6.0;
pub const DEFAULT_YOUTH_UNEMPLOYMENT_RATE: f64 = 15.0;
pub const DEFAULT_EDUCATION_EXPENDITURE: f64 = 4.5;
pub const DEFAULT_ALCOHOL_CONSUMPTION: f64 = 6.0;
pub const DEFAULT_TOBACCO_USE: f64 = 20.0;
pub const DEFAULT_UNDERWEIGHT_SHARE: f64 = 15.0;

pub const DEFAULT_FERTILITY_RATE: f64 = 2.1;
pub const DEFAULT_MARRIAGE_AGE_WOMEN: f64 = 25.0;
pub const DEFAULT_DIVORCE_RATE: f64 = 2.0;
pub const DEFAULT_YOUTH_MORTALITY: f64 = 5.0;
pub const DEFAULT_BIRTHS_OUTSIDE_MARRIAGE: f64 = 20.0;
pub const DEFAULT_URBAN_SHARE: f64 = 0.5;
pub const DEFAULT_MARRIAGE_RATE: f64 = 5.0;
pub const DEFAULT_SINGLE_PARENT_SHARE: f64 = 10.0;

/// Everything the pack knows about one country. Missing fields fall back to
/// the module defaults at query time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    #[serde(default)]
    pub name: String,

    // Scalar indicators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_expectancy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_expectancy_female: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_expectancy_male: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infant_mortality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gdp_per_capita: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unemployment_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youth_unemployment_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_expenditure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alcohol_consumption: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tobacco_use: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underweight_share: Option<f64>,

    // Year series
    #[serde(default, skip_serializing_if = "YearSeries::is_empty")]
    pub fertility_rate: YearSeries,
    #[serde(default, skip_serializing_if = "YearSeries::is_empty")]
    pub marriage_age_women: YearSeries,
    #[serde(default, skip_serializing_if = "YearSeries::is_empty")]
    pub divorce_rate: YearSeries,
    #[serde(default, skip_serializing_if = "YearSeries::is_empty")]
    pub youth_mortality: YearSeries,
    #[serde(default, skip_serializing_if = "YearSeries::is_empty")]
    pub births_outside_marriage: YearSeries,
    #[serde(default, skip_serializing_if = "YearSeries::is_empty")]
    pub urban_share: YearSeries,
    #[serde(default, skip_serializing_if = "YearSeries::is_empty")]
    pub marriage_rate: YearSeries,
    #[serde(default, skip_serializing_if = "YearSeries::is_empty")]
    pub single_parent_share: YearSeries,

    // Name pools
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forenames: Vec<ForenameRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub surnames: Vec<SurnameRecord>,
}

/// Scalar snapshot handed to the probability engine for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryStats {
    pub slug: String,
    pub name: String,
    pub birth_rate: f64,
    pub death_rate: f64,
    pub life_expectancy: f64,
    pub life_expectancy_female: f64,
    pub life_expectancy_male: f64,
    pub migration_rate: f64,
    pub infant_mortality: f64,
    pub population: f64,
    pub gdp_per_capita: f64,
    pub unemployment_rate: f64,
    pub youth_unemployment_rate: f64,
    pub education_expenditure: f64,
    pub alcohol_consumption: f64,
    pub tobacco_use: f64,
    pub underweight_share: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Repository {
    countries: BTreeMap<String, CountryRecord>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let repo: Repository = serde_json::from_str(json)?;
        Ok(repo)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = File::open(path.as_ref())?;
        let repo: Repository = serde_json::from_reader(BufReader::new(file))?;
        debug!(
            path = %path.as_ref().display(),
            countries = repo.countries.len(),
            "loaded country pack"
        );
        Ok(repo)
    }

    pub fn insert(&mut self, slug: impl Into<String>, record: CountryRecord) {
        self.countries.insert(slug.into(), record);
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.countries.contains_key(slug)
    }

    fn record(&self, slug: &str) -> Option<&CountryRecord> {
        self.countries.get(slug)
    }

    /// Slugs of every country in the pack, in lexical order.
    pub fn available_countries(&self) -> Vec<&str> {
        self.countries.keys().map(String::as_str).collect()
    }

    /// Countries that can produce non-fallback names.
    pub fn countries_with_names(&self) -> Vec<&str> {
        self.countries
            .iter()
            .filter(|(_, r)| !r.forenames.is_empty() && !r.surnames.is_empty())
            .map(|(slug, _)| slug.as_str())
            .collect()
    }

    /// Checks the slug is present with usable name pools.
    pub fn validate_country(&self, slug: &str) -> Result<(), Error> {
        let record = self
            .record(slug)
            .ok_or_else(|| Error::UnknownCountry(slug.to_string()))?;
        if record.forenames.is_empty() {
            return Err(Error::MissingForenames(slug.to_string()));
        }
        if record.surnames.is_empty() {
            return Err(Error::MissingSurnames(slug.to_string()));
        }
        Ok(())
    }

    /// Scalar indicators with defaults applied. Female/male life expectancy
    /// fall back to the total figure when absent.
    pub fn country_stats(&self, slug: &str) -> CountryStats {
        let empty = CountryRecord::default();
        let r = self.record(slug).unwrap_or(&empty);
        let life_expectancy = r.life_expectancy.unwrap_or(DEFAULT_LIFE_EXPECTANCY);
        CountryStats {
            slug: slug.to_string(),
            name: if r.name.is_empty() {
                slug.to_string()
            } else {
                r.name.clone()
            },
            birth_rate: r.birth_rate.unwrap_or(DEFAULT_BIRTH_RATE),
            death_rate: r.death_rate.unwrap_or(DEFAULT_DEATH_RATE),
            life_expectancy,
            life_expectancy_female: r.life_expectancy_female.unwrap_or(life_expectancy),
            life_expectancy_male: r.life_expectancy_male.unwrap_or(life_expectancy),
            migration_rate: r.migration_rate.unwrap_or(DEFAULT_MIGRATION_RATE),
            infant_mortality: r.infant_mortality.unwrap_or(DEFAULT_INFANT_MORTALITY),
            population: r.population.unwrap_or(0.0),
            gdp_per_capita: r.gdp_per_capita.unwrap_or(DEFAULT_GDP_PER_CAPITA),
            unemployment_rate: r.unemployment_rate.unwrap_or(DEFAULT_UNEMPLOYMENT_RATE),
            youth_unemployment_rate: r
                .youth_unemployment_rate
                .unwrap_or(DEFAULT_YOUTH_UNEMPLOYMENT_RATE),
            education_expenditure: r
                .education_expenditure
                .unwrap_or(DEFAULT_EDUCATION_EXPENDITURE),
            alcohol_consumption: r
                .alcohol_consumption
                .unwrap_or(DEFAULT_ALCOHOL_CONSUMPTION),
            tobacco_use: r.tobacco_use.unwrap_or(DEFAULT_TOBACCO_USE),
            underweight_share: r.underweight_share.unwrap_or(DEFAULT_UNDERWEIGHT_SHARE),
        }
    }

    // --- Year-series queries ---

    fn series_value(
        &self,
        slug: &str,
        year: i32,
        pick: impl Fn(&CountryRecord) -> &YearSeries,
        default: f64,
    ) -> f64 {
        self.record(slug)
            .map(pick)
            .and_then(|s| s.value_at(year))
            .unwrap_or(default)
    }

    /// Children born per woman.
    pub fn fertility_rate(&self, slug: &str, year: i32) -> f64 {
        self.series_value(slug, year, |r| &r.fertility_rate, DEFAULT_FERTILITY_RATE)
    }

    pub fn marriage_age_women(&self, slug: &str, year: i32) -> f64 {
        self.series_value(
            slug,
            year,
            |r| &r.marriage_age_women,
            DEFAULT_MARRIAGE_AGE_WOMEN,
        )
    }

    /// Divorces per 1000 people.
    pub fn divorce_rate(&self, slug: &str, year: i32) -> f64 {
        self.series_value(slug, year, |r| &r.divorce_rate, DEFAULT_DIVORCE_RATE)
    }

    /// Deaths before age 15 per 100 live births.
    pub fn youth_mortality(&self, slug: &str, year: i32) -> f64 {
        self.series_value(slug, year, |r| &r.youth_mortality, DEFAULT_YOUTH_MORTALITY)
    }

    /// Percentage of births outside marriage.
    pub fn births_outside_marriage(&self, slug: &str, year: i32) -> f64 {
        self.series_value(
            slug,
            year,
            |r| &r.births_outside_marriage,
            DEFAULT_BIRTHS_OUTSIDE_MARRIAGE,
        )
    }

    /// Urban population fraction, clamped into [0, 1].
    pub fn urban_share(&self, slug: &str, year: i32) -> f64 {
        self.series_value(slug, year, |r| &r.urban_share, DEFAULT_URBAN_SHARE)
            .clamp(0.0, 1.0)
    }

    /// Marriages per 1000 inhabitants.
    pub fn marriage_rate(&self, slug: &str, year: i32) -> f64 {
        self.series_value(slug, year, |r| &r.marriage_rate, DEFAULT_MARRIAGE_RATE)
    }

    /// Percentage of households headed by a single parent.
    pub fn single_parent_share(&self, slug: &str, year: i32) -> f64 {
        self.series_value(
            slug,
            year,
            |r| &r.single_parent_share,
            DEFAULT_SINGLE_PARENT_SHARE,
        )
    }

    // --- Name pools ---

    pub fn forenames(&self, slug: &str, gender: Gender) -> Vec<&ForenameRecord> {
        self.record(slug)
            .map(|r| r.forenames.iter().filter(|n| n.gender == gender).collect())
            .unwrap_or_default()
    }

    pub fn surnames(&self, slug: &str) -> &[SurnameRecord] {
        self.record(slug)
            .map(|r| r.surnames.as_slice())
            .unwrap_or_default()
    }
}
