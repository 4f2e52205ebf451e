use chrono::Datelike;
use tracing::{debug, info};

use super::config::Config;
use super::family::FamilyBuilder;
use super::person::{PersonFactory, PersonOptions};
use crate::error::Error;
use crate::id::PersonId;
use crate::model::{Date, EventKind, FamilyTree, Gender, LifeEvent, Person};
use crate::random::SeededRandom;
use crate::stats::Repository;

/// Drives one full generation run: root, ancestor expansion, descendant
/// expansion, then the reference-year mortality pass.
pub struct Engine<'a> {
    config: Config,
    repo: &'a Repository,
    rng: SeededRandom,
    factory: PersonFactory<'a>,
    builder: FamilyBuilder,
}

impl<'a> Engine<'a> {
    pub fn new(config: Config, repo: &'a Repository) -> Self {
        let config = config.normalized();
        let rng = SeededRandom::new(config.seed);
        let factory = PersonFactory::new(repo, &config.country, config.life_expectancy_mode);
        Self {
            config,
            repo,
            rng,
            factory,
            builder: FamilyBuilder::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The single entry point. An unknown or name-less country is the only
    /// error; no partial tree is ever returned.
    pub fn generate(&mut self) -> Result<FamilyTree, Error> {
        self.repo.validate_country(&self.config.country)?;

        info!(
            country = %self.config.country,
            generations = self.config.generations,
            seed = self.config.seed,
            "generating family tree"
        );

        let mut tree = FamilyTree::new(
            format!("tree_{}", self.config.seed),
            self.config.country.clone(),
            self.config.generations,
            self.config.seed,
        );
        tree.generated_at = chrono::Utc::now().to_rfc3339();

        let root_gender = self
            .config
            .root_gender
            .unwrap_or_else(|| self.factory.probability().gender(&mut self.rng));

        let root = self.factory.generate_person(
            &mut self.rng,
            PersonOptions {
                gender: Some(root_gender),
                birth_year: self.config.start_year,
                generation: 0,
                ..PersonOptions::default()
            },
        );
        let root_id = root.id;
        tree.set_root(root);

        let depth = self.config.generations - 1;
        self.generate_ancestors(&mut tree, root_id, depth);
        self.generate_descendants(&mut tree, root_id, depth);

        self.apply_reference_year_mortality(&mut tree);

        info!(
            persons = tree.person_count(),
            families = tree.family_count(),
            reference_year = tree.reference_year,
            "generation complete"
        );
        Ok(tree)
    }

    /// Depth-first, pre-order: parents are created, married, and linked to
    /// the current person before recursing another generation up.
    fn generate_ancestors(&mut self, tree: &mut FamilyTree, person_id: PersonId, remaining: u32) {
        if remaining == 0 {
            return;
        }
        let Some(person) = tree.person(person_id).cloned() else {
            return;
        };

        let mut father = self.factory.generate_parent(&mut self.rng, &person, Gender::Male);
        let mut mother = self
            .factory
            .generate_parent(&mut self.rng, &person, Gender::Female);

        father.children_ids.push(person.id);
        mother.children_ids.push(person.id);
        if let Some(p) = tree.person_mut(person_id) {
            p.father_id = Some(father.id);
            p.mother_id = Some(mother.id);
        }

        let mut family =
            self.builder
                .create_family(&mut self.rng, self.factory.probability(), &mut father, &mut mother);

        // The current person predates this family record; link them in and
        // repair the wedding date if it landed after their birth.
        self.builder.attach_existing_child(
            &mut self.rng,
            self.factory.probability(),
            &mut family,
            &mut father,
            &mut mother,
            &person,
        );

        let mut siblings = Vec::new();
        if self.config.include_extended {
            siblings = self.builder.generate_siblings(
                &mut self.rng,
                &mut self.factory,
                &person,
                &mut father,
                &mut mother,
            );
        }

        let father_id = father.id;
        let mother_id = mother.id;
        tree.add_person(father);
        tree.add_person(mother);
        tree.add_family(family);
        for sibling in siblings {
            tree.add_person(sibling);
        }

        self.generate_ancestors(tree, father_id, remaining - 1);
        self.generate_ancestors(tree, mother_id, remaining - 1);
    }

    /// Depth-first: spouse, family, children, then recurse into each child.
    /// People dead before 18 leave no line.
    fn generate_descendants(&mut self, tree: &mut FamilyTree, person_id: PersonId, remaining: u32) {
        if remaining == 0 {
            return;
        }
        let Some(person) = tree.person(person_id).cloned() else {
            return;
        };
        if person.age_at_death().is_some_and(|age| age < 18) {
            return;
        }

        let spouse = self.factory.generate_spouse(&mut self.rng, &person);

        let (mut husband, mut wife) = match person.gender {
            Gender::Male => (person, spouse),
            Gender::Female => (spouse, person),
        };

        let mut family =
            self.builder
                .create_family(&mut self.rng, self.factory.probability(), &mut husband, &mut wife);
        let children = self.builder.generate_children(
            &mut self.rng,
            &mut self.factory,
            &mut family,
            &mut husband,
            &mut wife,
        );

        tree.add_person(husband);
        tree.add_person(wife);
        tree.add_family(family);

        let child_ids: Vec<PersonId> = children.iter().map(|c| c.id).collect();
        for child in children {
            tree.add_person(child);
        }
        for child_id in child_ids {
            self.generate_descendants(tree, child_id, remaining - 1);
        }
    }

    /// Reconciles every death against a single observation year so nobody
    /// appears implausibly old or alive past the tree's effective present.
    ///
    /// The reference year is computed once and stored on the tree, which
    /// makes a repeated pass a fixed point: people whose recorded death
    /// already fits the bound are left untouched and consume no draws.
    pub fn apply_reference_year_mortality(&mut self, tree: &mut FamilyTree) {
        let reference_year = match tree.reference_year {
            Some(year) => year,
            None => match Self::calculate_reference_year(tree) {
                Some(year) => year,
                None => return,
            },
        };
        tree.reference_year = Some(reference_year);
        let reference_date = Date::new(reference_year, 12, 31);
        debug!(reference_year, "reconciling mortality");

        let ids: Vec<PersonId> = tree.persons.keys().copied().collect();
        for id in ids {
            let Some(person) = tree.person(id).cloned() else {
                continue;
            };
            let prob = self.factory.probability();
            let max_age = prob.max_allowed_age(person.birth_date.year(), person.gender);
            let age_at_reference = (reference_year - person.birth_date.year()).max(0);

            // Data repair: a death sampled before birth clamps to the birth date
            if let Some(death) = person.death_date
                && death < person.birth_date
                && let Some(p) = tree.person_mut(id)
            {
                p.death_date = Some(p.birth_date);
                ensure_death_event(p);
            }

            let death_age = tree.person(id).and_then(Person::age_at_death);
            let already_plausible = tree.person(id).is_some_and(|p| {
                p.death_date
                    .is_some_and(|d| d <= reference_date && p.age_at_death().is_some_and(|a| a <= max_age))
            });

            let needs_cap = (age_at_reference > max_age && !already_plausible)
                || death_age.is_some_and(|a| a > max_age);
            if !needs_cap {
                continue;
            }

            let mut proposed =
                self.factory
                    .random_date_at_age(&mut self.rng, person.birth_date, max_age);
            if proposed > reference_date {
                proposed = reference_date;
            }
            if let Some(p) = tree.person_mut(id) {
                p.death_date = Some(proposed);
                ensure_death_event(p);
            }
        }
    }

    /// The year of the latest recorded moment in the deepest generation,
    /// falling back to the latest birth year, then the wall clock.
    fn calculate_reference_year(tree: &FamilyTree) -> Option<i32> {
        if tree.person_count() == 0 {
            return None;
        }

        let max_generation = tree
            .persons
            .values()
            .map(|p| p.generation)
            .max()
            .unwrap_or(0);

        let mut latest: Option<Date> = None;
        for person in tree.persons.values().filter(|p| p.generation == max_generation) {
            for event in &person.events {
                if latest.is_none_or(|l| event.date > l) {
                    latest = Some(event.date);
                }
            }
            if latest.is_none_or(|l| person.birth_date > l) {
                latest = Some(person.birth_date);
            }
            if let Some(death) = person.death_date
                && latest.is_none_or(|l| death > l)
            {
                latest = Some(death);
            }
        }
        if let Some(date) = latest {
            return Some(date.year());
        }

        tree.persons
            .values()
            .map(|p| p.birth_date.year())
            .max()
            .or_else(|| Some(chrono::Utc::now().year()))
    }
}

/// Rewrites the existing death event in place, or appends one.
fn ensure_death_event(person: &mut Person) {
    let Some(death_date) = person.death_date else {
        return;
    };
    let location = person.current_country.clone();
    if let Some(event) = person.events.iter_mut().find(|e| e.kind == EventKind::Death) {
        event.date = death_date;
        event.location = location;
        return;
    }
    person
        .events
        .push(LifeEvent::new(EventKind::Death, death_date, location));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::life_expectancy::LifeExpectancyMode;
    use crate::model::HealthProfile;
    use crate::stats::{CountryRecord, ForenameRecord, Repository, SurnameRecord, YearSeries};

    fn repo() -> Repository {
        let mut repo = Repository::new();
        repo.insert(
            "germany",
            CountryRecord {
                name: "Germany".to_string(),
                life_expectancy: Some(80.0),
                infant_mortality: Some(4.0),
                marriage_age_women: YearSeries::new(vec![(1950, 24.0), (2000, 30.0)]),
                fertility_rate: YearSeries::new(vec![(1950, 2.4), (2000, 1.4)]),
                forenames: vec![
                    ForenameRecord::new("Hans", Gender::Male, 0, 1950),
                    ForenameRecord::new("Greta", Gender::Female, 0, 1950),
                ],
                surnames: vec![SurnameRecord::new("Müller", 0)],
                ..CountryRecord::default()
            },
        );
        repo
    }

    fn config(generations: u32, seed: u64) -> Config {
        Config {
            generations,
            seed,
            start_year: 1970,
            ..Config::default()
        }
    }

    #[test]
    fn single_generation_is_just_the_root() {
        let repo = repo();
        let tree = Engine::new(config(1, 12345), &repo).generate().unwrap();
        assert_eq!(tree.person_count(), 1);
        assert_eq!(tree.family_count(), 0);
        assert!(tree.root_person().is_some());
    }

    #[test]
    fn unknown_country_fails_before_generating() {
        let repo = repo();
        let cfg = Config {
            country: "narnia".to_string(),
            seed: 1,
            ..Config::default()
        };
        let err = Engine::new(cfg, &repo).generate().unwrap_err();
        assert!(matches!(err, Error::UnknownCountry(_)));
    }

    #[test]
    fn three_generations_have_full_ancestor_side() {
        let repo = repo();
        let tree = Engine::new(config(3, 12345), &repo).generate().unwrap();
        // 1 root + 2 parents + 4 grandparents
        let ancestors = tree.ancestors(tree.root_person_id.unwrap());
        assert_eq!(ancestors.len(), 6);
        assert!(tree.person_count() >= 7);
    }

    #[test]
    fn explicit_root_gender_is_honored() {
        let repo = repo();
        let cfg = Config {
            root_gender: Some(Gender::Female),
            seed: 42,
            generations: 2,
            ..Config::default()
        };
        let tree = Engine::new(cfg, &repo).generate().unwrap();
        assert_eq!(tree.root_person().unwrap().gender, Gender::Female);
    }

    #[test]
    fn root_back_links_to_generated_parents() {
        let repo = repo();
        let tree = Engine::new(config(2, 7), &repo).generate().unwrap();
        let root = tree.root_person().unwrap();
        let father = tree.person(root.father_id.unwrap()).unwrap();
        let mother = tree.person(root.mother_id.unwrap()).unwrap();
        assert!(father.children_ids.contains(&root.id));
        assert!(mother.children_ids.contains(&root.id));
        assert_eq!(father.generation, -1);
        // The parents' family records the root as a child
        let family = tree
            .families
            .values()
            .find(|f| f.husband_id == Some(father.id))
            .unwrap();
        assert!(family.children_ids.contains(&root.id));
        assert!(family.married_date <= root.birth_date);
    }

    #[test]
    fn reconciliation_is_a_fixed_point() {
        let repo = repo();
        let mut engine = Engine::new(config(4, 99), &repo);
        let mut tree = engine.generate().unwrap();
        let snapshot = tree.clone();
        engine.apply_reference_year_mortality(&mut tree);
        assert_eq!(tree.persons, snapshot.persons);
        assert_eq!(tree.reference_year, snapshot.reference_year);
    }

    #[test]
    fn reference_year_bounds_every_age() {
        let repo = repo();
        let mut engine = Engine::new(config(5, 4242), &repo);
        let tree = engine.generate().unwrap();
        let reference_year = tree.reference_year.unwrap();
        let prob = engine.factory.probability();
        for person in tree.persons.values() {
            let max_age = prob.max_allowed_age(person.birth_date.year(), person.gender);
            let age = person
                .age_at_death()
                .unwrap_or((reference_year - person.birth_date.year()).max(0));
            assert!(
                age <= max_age,
                "{} aged {age} exceeds {max_age}",
                person.id
            );
        }
    }

    #[test]
    fn death_before_birth_is_repaired() {
        let repo = repo();
        let mut engine = Engine::new(config(1, 5), &repo);
        let mut tree = engine.generate().unwrap();
        let root_id = tree.root_person_id.unwrap();
        {
            let root = tree.person_mut(root_id).unwrap();
            root.death_date = Some(Date::new(1900, 1, 1));
        }
        tree.reference_year = None;
        engine.apply_reference_year_mortality(&mut tree);
        let root = tree.person(root_id).unwrap();
        assert!(root.death_date.unwrap() >= root.birth_date);
    }

    #[test]
    fn ensure_death_event_rewrites_in_place() {
        let mut person = Person::new(
            PersonId(1),
            "Hans",
            "Müller",
            Gender::Male,
            Date::new(1900, 5, 10),
            "germany",
            0,
        );
        person.health = HealthProfile::default();
        person.death_date = Some(Date::new(1960, 1, 1));
        ensure_death_event(&mut person);
        person.death_date = Some(Date::new(1955, 3, 3));
        ensure_death_event(&mut person);

        let death_events: Vec<_> = person
            .events
            .iter()
            .filter(|e| e.kind == EventKind::Death)
            .collect();
        assert_eq!(death_events.len(), 1);
        assert_eq!(death_events[0].date, Date::new(1955, 3, 3));
    }
}
