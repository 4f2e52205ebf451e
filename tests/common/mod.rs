use kintree::stats::{CountryRecord, ForenameRecord, SurnameRecord, YearSeries};
use kintree::{Config, Gender, Repository};

/// A two-country pack with enough series coverage that no query falls back
/// to defaults for germany, plus a minimal second country so migration has
/// somewhere to go.
pub fn fixture_repo() -> Repository {
    let mut repo = Repository::new();
    repo.insert(
        "germany",
        CountryRecord {
            name: "Germany".to_string(),
            birth_rate: Some(9.4),
            death_rate: Some(11.5),
            life_expectancy: Some(80.9),
            life_expectancy_female: Some(83.5),
            life_expectancy_male: Some(78.3),
            migration_rate: Some(3.2),
            infant_mortality: Some(3.1),
            gdp_per_capita: Some(46_000.0),
            unemployment_rate: Some(3.5),
            youth_unemployment_rate: Some(6.8),
            education_expenditure: Some(5.0),
            alcohol_consumption: Some(10.6),
            tobacco_use: Some(22.0),
            underweight_share: Some(2.0),
            fertility_rate: YearSeries::new(vec![(1900, 4.0), (1950, 2.1), (2000, 1.4)]),
            marriage_age_women: YearSeries::new(vec![(1900, 23.0), (1950, 24.5), (2000, 29.8)]),
            divorce_rate: YearSeries::new(vec![(1950, 1.0), (2000, 2.4)]),
            youth_mortality: YearSeries::new(vec![(1900, 20.0), (1950, 4.0), (2000, 0.5)]),
            births_outside_marriage: YearSeries::new(vec![(1950, 7.6), (2000, 23.4)]),
            urban_share: YearSeries::new(vec![(1950, 0.68), (2000, 0.75)]),
            marriage_rate: YearSeries::new(vec![(1950, 10.7), (2000, 5.1)]),
            single_parent_share: YearSeries::new(vec![(1970, 9.0), (2000, 17.0)]),
            forenames: vec![
                ForenameRecord::new("Hans", Gender::Male, 0, 1940),
                ForenameRecord::new("Karl", Gender::Male, 1, 1920),
                ForenameRecord::new("Thomas", Gender::Male, 2, 1965),
                ForenameRecord::new("Greta", Gender::Female, 0, 1935),
                ForenameRecord::new("Ursula", Gender::Female, 1, 1945),
                ForenameRecord::new("Sabine", Gender::Female, 2, 1962),
            ],
            surnames: vec![
                SurnameRecord::new("Müller", 0),
                SurnameRecord::new("Schmidt", 1),
                SurnameRecord::new("Schneider", 2),
            ],
            ..CountryRecord::default()
        },
    );
    repo.insert(
        "france",
        CountryRecord {
            name: "France".to_string(),
            life_expectancy: Some(82.0),
            forenames: vec![
                ForenameRecord::new("Pierre", Gender::Male, 0, 1950),
                ForenameRecord::new("Marie", Gender::Female, 0, 1950),
            ],
            surnames: vec![SurnameRecord::new("Martin", 0)],
            ..CountryRecord::default()
        },
    );
    repo
}

pub fn config(generations: u32, seed: u64) -> Config {
    Config {
        country: "germany".to_string(),
        generations,
        seed,
        start_year: 1970,
        ..Config::default()
    }
}
