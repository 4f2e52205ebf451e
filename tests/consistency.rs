use kintree::{Engine, FamilyTree};

mod common;

const SEEDS: [u64; 5] = [1, 7, 42, 20240601, 987654321];

fn generate(seed: u64) -> FamilyTree {
    let repo = common::fixture_repo();
    let cfg = kintree::Config {
        include_extended: true,
        ..common::config(4, seed)
    };
    Engine::new(cfg, &repo).generate().unwrap()
}

#[test]
fn nobody_dies_before_being_born() {
    for seed in SEEDS {
        let tree = generate(seed);
        for person in tree.persons.values() {
            if let Some(death) = person.death_date {
                assert!(
                    death >= person.birth_date,
                    "seed {seed}: {} dies {death} before birth {}",
                    person.id,
                    person.birth_date
                );
            }
        }
    }
}

#[test]
fn weddings_precede_the_children_they_record() {
    for seed in SEEDS {
        let tree = generate(seed);
        for family in tree.families.values() {
            for child_id in &family.children_ids {
                let child = tree.person(*child_id).unwrap();
                assert!(
                    family.married_date <= child.birth_date,
                    "seed {seed}: family {} married {} after child birth {}",
                    family.id,
                    family.married_date,
                    child.birth_date
                );
            }
        }
    }
}

#[test]
fn divorces_fall_inside_the_marriage_and_both_lifetimes() {
    for seed in SEEDS {
        let tree = generate(seed);
        for family in tree.families.values() {
            let Some(divorce) = family.divorce_date else {
                continue;
            };
            assert!(divorce > family.married_date);
            for spouse_id in [family.husband_id, family.wife_id].into_iter().flatten() {
                let spouse = tree.person(spouse_id).unwrap();
                if let Some(death) = spouse.death_date {
                    assert!(
                        death > divorce,
                        "seed {seed}: {} divorced {divorce} after dying {death}",
                        spouse.id
                    );
                }
            }
        }
    }
}

#[test]
fn mothers_are_of_childbearing_age() {
    for seed in SEEDS {
        let tree = generate(seed);
        for person in tree.persons.values() {
            let Some(mother_id) = person.mother_id else {
                continue;
            };
            let mother = tree.person(mother_id).unwrap();
            let mother_age = person.birth_date.year() - mother.birth_date.year();
            assert!(
                (16..=50).contains(&mother_age),
                "seed {seed}: mother {} aged {mother_age} at birth of {}",
                mother.id,
                person.id
            );
        }
    }
}

#[test]
fn every_link_resolves_and_back_references() {
    for seed in SEEDS {
        let tree = generate(seed);
        for person in tree.persons.values() {
            for spouse_id in &person.spouse_ids {
                let spouse = tree.person(*spouse_id).unwrap();
                assert!(spouse.spouse_ids.contains(&person.id));
            }
            for child_id in &person.children_ids {
                let child = tree.person(*child_id).unwrap();
                assert!(
                    child.father_id == Some(person.id) || child.mother_id == Some(person.id)
                );
            }
            if let Some(father_id) = person.father_id {
                let father = tree.person(father_id).unwrap();
                assert!(father.children_ids.contains(&person.id));
            }
        }
        for family in tree.families.values() {
            for spouse_id in [family.husband_id, family.wife_id].into_iter().flatten() {
                assert!(tree.person(spouse_id).is_some());
            }
            for child_id in &family.children_ids {
                assert!(tree.person(*child_id).is_some());
            }
        }
    }
}

#[test]
fn reference_year_caps_every_lifespan() {
    for seed in SEEDS {
        let tree = generate(seed);
        let reference_year = tree.reference_year.unwrap();
        for person in tree.persons.values() {
            let age = match person.age_at_death() {
                Some(age) => age,
                None => (reference_year - person.birth_date.year()).max(0),
            };
            assert!(
                age <= 115,
                "seed {seed}: {} reaches implausible age {age}",
                person.id
            );
        }
    }
}

#[test]
fn rerunning_mortality_reconciliation_changes_nothing() {
    let repo = common::fixture_repo();
    for seed in SEEDS {
        let mut engine = Engine::new(common::config(4, seed), &repo);
        let mut tree = engine.generate().unwrap();
        let snapshot = tree.clone();
        engine.apply_reference_year_mortality(&mut tree);
        engine.apply_reference_year_mortality(&mut tree);
        assert_eq!(tree.persons, snapshot.persons, "seed {seed} drifted");
    }
}
