use serde::{Deserialize, Serialize};
use tracing::debug;

use super::life_expectancy::LifeExpectancyMode;
use crate::model::Gender;

pub const MIN_GENERATIONS: u32 = 1;
pub const MAX_GENERATIONS: u32 = 10;
pub const MIN_START_YEAR: i32 = 1800;
pub const MAX_START_YEAR: i32 = 2024;

/// Parameters of one generation run.
///
/// Out-of-range values are clamped by `normalized`, never rejected; the only
/// hard failure a run can produce is an unknown country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub country: String,
    pub generations: u32,
    /// 0 means pick a fresh random seed.
    pub seed: u64,
    pub start_year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_gender: Option<Gender>,
    #[serde(default)]
    pub include_extended: bool,
    #[serde(default)]
    pub life_expectancy_mode: LifeExpectancyMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            country: "germany".to_string(),
            generations: 3,
            seed: 0,
            start_year: 1970,
            root_gender: None,
            include_extended: false,
            life_expectancy_mode: LifeExpectancyMode::Total,
        }
    }
}

impl Config {
    /// Clamps ranges and resolves a zero seed to a random one.
    pub fn normalized(&self) -> Config {
        let mut cfg = self.clone();
        cfg.country = cfg.country.to_lowercase();
        cfg.generations = cfg.generations.clamp(MIN_GENERATIONS, MAX_GENERATIONS);
        cfg.start_year = cfg.start_year.clamp(MIN_START_YEAR, MAX_START_YEAR);
        if cfg.seed == 0 {
            cfg.seed = rand::random::<u64>().max(1);
        }
        if cfg != *self {
            debug!(
                generations = cfg.generations,
                start_year = cfg.start_year,
                seed = cfg.seed,
                "normalized config"
            );
        }
        cfg
    }
}
