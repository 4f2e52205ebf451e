use tracing::trace;

use super::life_expectancy::LifeExpectancyMode;
use crate::model::{EducationLevel, EmploymentStatus, Gender, HealthProfile, ResidenceType};
use crate::random::SeededRandom;
use crate::stats::{CountryStats, Repository};

// --- Sampling bounds ---

const MAX_CHILDREN: i32 = 12;
const MIN_DEATH_AGE: f64 = 1.0;
const MAX_DEATH_AGE: f64 = 120.0;
const MIN_MARRIAGE_AGE: f64 = 18.0;
const MAX_MARRIAGE_AGE: f64 = 50.0;
const MAX_PLAUSIBLE_AGE: f64 = 115.0;

/// Flat policy bag: every sampling rule for one country/run context.
///
/// Methods have no side effects beyond consuming draws from the shared
/// random source, so call order per generated attribute is part of the
/// reproducibility contract.
pub struct ProbabilityEngine<'a> {
    stats: CountryStats,
    repo: &'a Repository,
    country: String,
    mode: LifeExpectancyMode,
}

impl<'a> ProbabilityEngine<'a> {
    pub fn new(repo: &'a Repository, country: &str, mode: LifeExpectancyMode) -> Self {
        Self {
            stats: repo.country_stats(country),
            repo,
            country: country.to_string(),
            mode,
        }
    }

    pub fn stats(&self) -> &CountryStats {
        &self.stats
    }

    pub fn gender(&self, rng: &mut SeededRandom) -> Gender {
        if rng.bool() {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    /// Children per marriage, from the fertility series of the marriage year.
    pub fn children_count(&self, rng: &mut SeededRandom, year: i32) -> u32 {
        let tfr = self.repo.fertility_rate(&self.country, year);
        let children = rng.normal(tfr, tfr * 0.25);
        children.round().clamp(0.0, f64::from(MAX_CHILDREN)) as u32
    }

    pub fn sibling_count(&self, rng: &mut SeededRandom, year: i32) -> u32 {
        self.children_count(rng, year).saturating_sub(1)
    }

    /// Cohort scaling for historically lower life expectancy.
    fn cohort_expectancy(&self, birth_year: i32, gender: Gender) -> f64 {
        let base = self.mode.base_expectancy(&self.stats, gender);
        if birth_year < 1950 {
            base * 0.75
        } else if birth_year < 1980 {
            base * 0.9
        } else {
            base
        }
    }

    pub fn death_age(
        &self,
        rng: &mut SeededRandom,
        health: &HealthProfile,
        birth_year: i32,
        gender: Gender,
    ) -> i32 {
        let mut base = self.cohort_expectancy(birth_year, gender);

        if health.tobacco_use {
            base -= rng.float_range(5.0, 10.0);
        }
        if health.alcohol_consumption > 10.0 {
            base -= rng.float_range(2.0, 5.0);
        }

        let age = rng.normal(base, 8.0).clamp(MIN_DEATH_AGE, MAX_DEATH_AGE);
        age.round() as i32
    }

    /// Largest believable age at the reference year for this cohort. Consumes
    /// no draws, so the reconciliation pass stays replayable.
    pub fn max_allowed_age(&self, birth_year: i32, gender: Gender) -> i32 {
        let max = (self.cohort_expectancy(birth_year, gender) * 1.35).min(MAX_PLAUSIBLE_AGE);
        max.round() as i32
    }

    pub fn dies_in_infancy(&self, rng: &mut SeededRandom) -> bool {
        rng.chance(self.stats.infant_mortality / 1000.0)
    }

    pub fn dies_in_youth(&self, rng: &mut SeededRandom, birth_year: i32) -> bool {
        let rate = self.repo.youth_mortality(&self.country, birth_year);
        rng.chance(rate / 100.0)
    }

    /// Women follow the historical series at birthYear+25 as a marriage-year
    /// proxy; men run two to four years older.
    pub fn marriage_age(&self, rng: &mut SeededRandom, gender: Gender, birth_year: i32) -> i32 {
        let women = self.repo.marriage_age_women(&self.country, birth_year + 25);
        let base = match gender {
            Gender::Female => women,
            Gender::Male => women + rng.float_range(2.0, 4.0),
        };
        let age = rng.normal(base, 3.0).clamp(MIN_MARRIAGE_AGE, MAX_MARRIAGE_AGE);
        age.round() as i32
    }

    /// Yearly rate scaled by a ten-year exposure window.
    pub fn should_divorce(&self, rng: &mut SeededRandom, marriage_year: i32) -> bool {
        let rate = self.repo.divorce_rate(&self.country, marriage_year);
        rng.chance(rate / 1000.0 * 10.0)
    }

    pub fn divorce_year(&self, rng: &mut SeededRandom, marriage_year: i32) -> i32 {
        marriage_year + rng.int_range(2, 15)
    }

    pub fn born_outside_marriage(&self, rng: &mut SeededRandom, birth_year: i32) -> bool {
        let share = self.repo.births_outside_marriage(&self.country, birth_year);
        rng.chance(share / 100.0)
    }

    pub fn underweight(&self, rng: &mut SeededRandom) -> bool {
        rng.chance(self.stats.underweight_share / 100.0)
    }

    pub fn single_parent(&self, rng: &mut SeededRandom, year: i32) -> bool {
        let share = self.repo.single_parent_share(&self.country, year);
        rng.chance(share / 100.0)
    }

    pub fn residence_in(&self, rng: &mut SeededRandom, country: &str, year: i32) -> ResidenceType {
        if rng.chance(self.repo.urban_share(country, year)) {
            ResidenceType::Urban
        } else {
            ResidenceType::Rural
        }
    }

    pub fn should_migrate(&self, rng: &mut SeededRandom) -> bool {
        let probability = self.stats.migration_rate.abs() / 1000.0 * 0.5;
        rng.chance(probability)
    }

    pub fn employment(&self, rng: &mut SeededRandom, age: i32) -> EmploymentStatus {
        if age < 16 {
            return EmploymentStatus::Child;
        }
        if age < 18 {
            return EmploymentStatus::Student;
        }
        if age >= 65 {
            return EmploymentStatus::Retired;
        }

        let unemployment_rate = if age < 25 {
            self.stats.youth_unemployment_rate
        } else {
            self.stats.unemployment_rate
        };

        if age < 26 {
            let student_prob = 0.3 + self.stats.education_expenditure / 100.0;
            if rng.chance(student_prob) {
                return EmploymentStatus::Student;
            }
        }

        if rng.chance(unemployment_rate / 100.0) {
            EmploymentStatus::Unemployed
        } else {
            EmploymentStatus::Employed
        }
    }

    pub fn education(&self, rng: &mut SeededRandom) -> EducationLevel {
        let development_score =
            (self.stats.gdp_per_capita / 50_000.0 + self.stats.education_expenditure / 10.0).min(1.0);
        let roll = rng.float();
        trace!(development_score, roll, "education roll");

        // Threshold ladder per development tier
        let (none, primary, secondary) = if development_score > 0.7 {
            (0.05, 0.20, 0.55)
        } else if development_score > 0.4 {
            (0.10, 0.35, 0.75)
        } else {
            (0.20, 0.55, 0.85)
        };

        if roll < none {
            EducationLevel::None
        } else if roll < primary {
            EducationLevel::Primary
        } else if roll < secondary {
            EducationLevel::Secondary
        } else {
            EducationLevel::Tertiary
        }
    }

    pub fn health_profile(&self, rng: &mut SeededRandom) -> HealthProfile {
        let alcohol = (self.stats.alcohol_consumption + rng.normal(0.0, 2.0)).max(0.0);
        HealthProfile {
            alcohol_consumption: alcohol,
            tobacco_use: rng.chance(self.stats.tobacco_use / 100.0),
        }
    }

    /// First child one to three years into the marriage, then two to four
    /// years of spacing per later child.
    pub fn child_birth_year(
        &self,
        rng: &mut SeededRandom,
        mother_birth_year: i32,
        child_index: i32,
    ) -> i32 {
        let marriage_age = self.marriage_age(rng, Gender::Female, mother_birth_year);
        let first_child_age = marriage_age + rng.int_range(1, 3);
        let spacing = child_index * rng.int_range(2, 4);
        mother_birth_year + first_child_age + spacing
    }

    pub fn parent_birth_year(
        &self,
        rng: &mut SeededRandom,
        child_birth_year: i32,
        parent_gender: Gender,
    ) -> i32 {
        let age_gap = match parent_gender {
            Gender::Female => rng.int_range(22, 32),
            Gender::Male => rng.int_range(25, 38),
        };
        child_birth_year - age_gap
    }
}
