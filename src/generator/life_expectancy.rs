use serde::{Deserialize, Serialize};

use crate::model::Gender;
use crate::stats::CountryStats;

/// Selects which life-expectancy curve drives mortality sampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum LifeExpectancyMode {
    #[default]
    Total,
    Female,
    Male,
    ByGender,
}

string_enum!(LifeExpectancyMode {
    Total => "total",
    Female => "female",
    Male => "male",
    ByGender => "by_gender",
});

impl LifeExpectancyMode {
    /// Lenient parse; unrecognized values mean the total curve.
    pub fn parse(value: &str) -> Self {
        Self::try_from(value.to_string()).unwrap_or(Self::Total)
    }

    /// The base life expectancy for a person of the given gender.
    pub fn base_expectancy(self, stats: &CountryStats, gender: Gender) -> f64 {
        match self {
            Self::Total => stats.life_expectancy,
            Self::Female => stats.life_expectancy_female,
            Self::Male => stats.life_expectancy_male,
            Self::ByGender => match gender {
                Gender::Female => stats.life_expectancy_female,
                Gender::Male => stats.life_expectancy_male,
            },
        }
    }
}
