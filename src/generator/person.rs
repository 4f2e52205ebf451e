use chrono::Datelike;
use tracing::trace;

use super::life_expectancy::LifeExpectancyMode;
use super::probability::ProbabilityEngine;
use crate::id::{IdGenerator, PersonId};
use crate::model::{Date, EventKind, Gender, LifeEvent, Person};
use crate::random::SeededRandom;
use crate::stats::Repository;

// Name pools of last resort for countries without identity data
const FALLBACK_MALE_NAMES: [&str; 5] = ["John", "James", "William", "Michael", "David"];
const FALLBACK_FEMALE_NAMES: [&str; 5] = ["Mary", "Elizabeth", "Sarah", "Emma", "Anna"];
const FALLBACK_SURNAMES: [&str; 5] = ["Smith", "Johnson", "Williams", "Brown", "Jones"];

const MIN_WEALTH_INDEX: f64 = 0.3;
const MAX_WEALTH_INDEX: f64 = 4.0;
const RICH_WEALTH_INDEX: f64 = 1.5;
const WEALTH_SIGMA: f64 = 0.6;

/// Everything `generate_person` needs to know up front. Unset fields are
/// sampled.
#[derive(Debug, Clone, Default)]
pub struct PersonOptions {
    pub gender: Option<Gender>,
    pub birth_year: i32,
    pub generation: i32,
    pub father_id: Option<PersonId>,
    pub mother_id: Option<PersonId>,
    pub last_name: Option<String>,
    pub wealth_index: Option<f64>,
}

/// Produces fully realized persons with monotonically increasing ids.
///
/// Draw order per person is fixed: gender, names, birth date, social flags,
/// wealth, health, mortality, education, employment, then migration.
/// Reordering any of these breaks seed reproducibility.
pub struct PersonFactory<'a> {
    prob: ProbabilityEngine<'a>,
    repo: &'a Repository,
    ids: IdGenerator,
    country: String,
    country_options: Vec<String>,
    /// Wall-clock date captured at construction; only a pre-reconciliation
    /// fallback for "has this death age already elapsed".
    now: Date,
}

impl<'a> PersonFactory<'a> {
    pub fn new(repo: &'a Repository, country: &str, mode: LifeExpectancyMode) -> Self {
        let today = chrono::Utc::now();
        Self {
            prob: ProbabilityEngine::new(repo, country, mode),
            repo,
            ids: IdGenerator::new(),
            country: country.to_string(),
            country_options: repo
                .available_countries()
                .into_iter()
                .map(String::from)
                .collect(),
            now: Date::new(today.year(), today.month() as u8, today.day().min(28) as u8),
        }
    }

    pub fn probability(&self) -> &ProbabilityEngine<'a> {
        &self.prob
    }

    pub fn generate_person(&mut self, rng: &mut SeededRandom, opts: PersonOptions) -> Person {
        let id = PersonId(self.ids.next_id());

        let gender = opts.gender.unwrap_or_else(|| self.prob.gender(rng));
        let first_name = self.generate_first_name(rng, gender, opts.birth_year);
        let last_name = opts
            .last_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.generate_last_name(rng));

        let birth_date = self.random_birth_date(rng, opts.birth_year);

        let mut person = Person::new(
            id,
            first_name,
            last_name,
            gender,
            birth_date,
            self.country.clone(),
            opts.generation,
        );
        person.father_id = opts.father_id;
        person.mother_id = opts.mother_id;

        person.born_outside_marriage = self.prob.born_outside_marriage(rng, opts.birth_year);
        person.underweight = self.prob.underweight(rng);
        person.residence = self.prob.residence_in(rng, &self.country, opts.birth_year);
        person.wealth_index = match opts.wealth_index {
            Some(w) if w > 0.0 => w,
            _ => self.random_wealth_index(rng),
        };
        self.assign_wealth(&mut person);

        person.health = self.prob.health_profile(rng);

        let death_age = self
            .prob
            .death_age(rng, &person.health, opts.birth_year, gender);

        if self.prob.dies_in_infancy(rng) {
            let months = rng.int_range(0, 11) as u32;
            let days = rng.int_range(0, 28) as u32;
            person.death_date = Some(birth_date.add(0, months, days));
        } else if self.prob.dies_in_youth(rng, opts.birth_year) {
            let age = rng.int_range(1, 14);
            person.death_date = Some(self.random_date_at_age(rng, birth_date, age));
        } else if death_age <= person.age(self.now) {
            person.death_date = Some(self.random_date_at_age(rng, birth_date, death_age));
        }

        let current_age = person.age_at_death().unwrap_or_else(|| person.age(self.now));

        person.education = self.prob.education(rng);
        person.employment = self.prob.employment(rng, current_age);

        person
            .events
            .push(LifeEvent::new(EventKind::Birth, birth_date, &self.country));

        self.maybe_migrate(rng, &mut person);

        if let Some(death_date) = person.death_date {
            person.events.push(LifeEvent::new(
                EventKind::Death,
                death_date,
                person.current_country.clone(),
            ));
        }

        trace!(id = %person.id, name = %person.full_name(), generation = person.generation, "generated person");
        person
    }

    // --- Derived generators ---

    pub fn generate_spouse(&mut self, rng: &mut SeededRandom, person: &Person) -> Person {
        let birth_year = person.birth_date.year() + rng.int_range(-5, 5);
        let wealth = self.blend_wealth_index(rng, person.wealth_index, 0.7);
        self.generate_person(
            rng,
            PersonOptions {
                gender: Some(person.gender.opposite()),
                birth_year,
                generation: person.generation,
                wealth_index: Some(wealth),
                ..PersonOptions::default()
            },
        )
    }

    pub fn generate_child(
        &mut self,
        rng: &mut SeededRandom,
        father: &Person,
        mother: &Person,
        child_index: i32,
    ) -> Person {
        let birth_year = self
            .prob
            .child_birth_year(rng, mother.birth_date.year(), child_index);
        let parent_wealth = (father.wealth_index + mother.wealth_index) / 2.0;
        let wealth = self.blend_wealth_index(rng, parent_wealth, 0.7);
        self.generate_person(
            rng,
            PersonOptions {
                birth_year,
                generation: father.generation + 1,
                father_id: Some(father.id),
                mother_id: Some(mother.id),
                last_name: Some(father.last_name.clone()),
                wealth_index: Some(wealth),
                ..PersonOptions::default()
            },
        )
    }

    pub fn generate_parent(
        &mut self,
        rng: &mut SeededRandom,
        child: &Person,
        gender: Gender,
    ) -> Person {
        let birth_year = self
            .prob
            .parent_birth_year(rng, child.birth_date.year(), gender);
        let wealth = self.blend_wealth_index(rng, child.wealth_index, 0.6);
        let last_name = match gender {
            Gender::Male if !child.last_name.is_empty() => Some(child.last_name.clone()),
            _ => None,
        };
        self.generate_person(
            rng,
            PersonOptions {
                gender: Some(gender),
                birth_year,
                generation: child.generation - 1,
                last_name,
                wealth_index: Some(wealth),
                ..PersonOptions::default()
            },
        )
    }

    pub fn generate_sibling(
        &mut self,
        rng: &mut SeededRandom,
        person: &Person,
        father: &Person,
        mother: &Person,
        sibling_index: i32,
    ) -> Person {
        let mut birth_year = person.birth_date.year() + rng.int_range(-8, 8);
        let min_birth_year = mother.birth_date.year() + 18;
        if birth_year < min_birth_year {
            birth_year = min_birth_year + sibling_index * 2;
        }

        let parent_wealth = (father.wealth_index + mother.wealth_index) / 2.0;
        let wealth = self.blend_wealth_index(rng, parent_wealth, 0.8);
        self.generate_person(
            rng,
            PersonOptions {
                birth_year,
                generation: person.generation,
                father_id: Some(father.id),
                mother_id: Some(mother.id),
                last_name: Some(father.last_name.clone()),
                wealth_index: Some(wealth),
                ..PersonOptions::default()
            },
        )
    }

    // --- Names ---

    fn generate_first_name(&self, rng: &mut SeededRandom, gender: Gender, birth_year: i32) -> String {
        let names = self.repo.forenames(&self.country, gender);
        if names.is_empty() {
            let pool: &[&str] = match gender {
                Gender::Male => &FALLBACK_MALE_NAMES,
                Gender::Female => &FALLBACK_FEMALE_NAMES,
            };
            return (*rng.choice(pool)).to_string();
        }

        // Popularity discount, further discounted by distance between the
        // name's chart year and the birth year.
        let weights: Vec<f64> = names
            .iter()
            .map(|n| {
                let mut weight = 1.0 / f64::from(n.popularity + 1);
                if n.year > 0 && birth_year > 0 {
                    let year_diff = f64::from((n.year - birth_year).abs());
                    weight *= 1.0 / (1.0 + year_diff / 10.0);
                }
                weight
            })
            .collect();

        let picked = names[rng.weighted_choice(&weights)];
        if picked.name.is_empty() {
            picked.localized.clone()
        } else {
            picked.name.clone()
        }
    }

    fn generate_last_name(&self, rng: &mut SeededRandom) -> String {
        let surnames = self.repo.surnames(&self.country);
        if surnames.is_empty() {
            return (*rng.choice(&FALLBACK_SURNAMES)).to_string();
        }

        // Surnames sharing a rank split that rank's weight evenly.
        let mut rank_counts = std::collections::BTreeMap::new();
        for s in surnames {
            *rank_counts.entry(s.rank).or_insert(0u32) += 1;
        }
        let weights: Vec<f64> = surnames
            .iter()
            .map(|s| {
                let mut weight = 1.0 / f64::from(s.rank + 1);
                if let Some(&count) = rank_counts.get(&s.rank)
                    && count > 1
                {
                    weight /= f64::from(count);
                }
                weight
            })
            .collect();

        let picked = &surnames[rng.weighted_choice(&weights)];
        if picked.name.is_empty() {
            picked.localized.clone()
        } else {
            picked.name.clone()
        }
    }

    // --- Dates ---

    fn random_birth_date(&self, rng: &mut SeededRandom, year: i32) -> Date {
        let month = rng.int_range(1, 12) as u8;
        // Day capped at 28 to dodge month-length edge cases
        let day = rng.int_range(1, 28) as u8;
        Date::new(year, month, day)
    }

    /// A date a whole number of years past birth, with random slack inside
    /// the year.
    pub fn random_date_at_age(&self, rng: &mut SeededRandom, birth: Date, age: i32) -> Date {
        let months = rng.int_range(0, 11) as u32;
        let days = rng.int_range(1, 28) as u32;
        birth.add(age, months, days)
    }

    // --- Wealth ---

    fn random_wealth_index(&self, rng: &mut SeededRandom) -> f64 {
        let mu = -0.5 * WEALTH_SIGMA * WEALTH_SIGMA;
        let value = (mu + WEALTH_SIGMA * rng.normal(0.0, 1.0)).exp();
        value.clamp(MIN_WEALTH_INDEX, MAX_WEALTH_INDEX)
    }

    fn blend_wealth_index(&self, rng: &mut SeededRandom, parent: f64, weight: f64) -> f64 {
        if parent <= 0.0 {
            return self.random_wealth_index(rng);
        }
        let weight = weight.clamp(0.0, 1.0);
        let fresh = self.random_wealth_index(rng);
        (parent * weight + fresh * (1.0 - weight)).clamp(MIN_WEALTH_INDEX, MAX_WEALTH_INDEX)
    }

    fn assign_wealth(&self, person: &mut Person) {
        person.gdp_per_capita = self.repo.country_stats(&person.current_country).gdp_per_capita;
        person.family_wealth = person.gdp_per_capita * person.wealth_index;
        person.is_rich = person.wealth_index >= RICH_WEALTH_INDEX;
    }

    // --- Migration ---

    fn maybe_migrate(&self, rng: &mut SeededRandom, person: &mut Person) {
        if !self.prob.should_migrate(rng) || self.country_options.len() < 2 {
            return;
        }

        let migration_age = rng.int_range(18, 45);
        let migration_date = self.random_date_at_age(rng, person.birth_date, migration_age);
        if let Some(death) = person.death_date
            && death <= migration_date
        {
            return;
        }

        let mut destination: Option<&str> = None;
        for _ in 0..10 {
            let candidate = rng.choice(&self.country_options).as_str();
            if !candidate.is_empty() && candidate != person.birth_country {
                destination = Some(candidate);
                break;
            }
        }
        if destination.is_none() {
            destination = self
                .country_options
                .iter()
                .map(String::as_str)
                .find(|c| *c != person.birth_country);
        }
        let Some(destination) = destination else {
            return;
        };

        let origin = std::mem::replace(&mut person.current_country, destination.to_string());
        person.events.push(
            LifeEvent::new(EventKind::Migration, migration_date, destination)
                .with_description(origin),
        );
        person.residence = self
            .prob
            .residence_in(rng, destination, migration_date.year());
        self.assign_wealth(person);
    }
}
