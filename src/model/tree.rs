use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::family::Family;
use super::person::Person;
use crate::id::{FamilyId, PersonId};

/// Arena owning every person and family of one generation run.
///
/// Relationships are id references into the maps, never embedded records.
/// `BTreeMap` keeps iteration in id order, which the reconciliation pass and
/// the exporters rely on for determinism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyTree {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_person_id: Option<PersonId>,
    pub persons: BTreeMap<PersonId, Person>,
    pub families: BTreeMap<FamilyId, Family>,
    pub generations: u32,
    pub country: String,
    pub seed: u64,
    pub generated_at: String,
    /// Year all mortality was reconciled against; set at the end of generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_year: Option<i32>,
}

impl FamilyTree {
    pub fn new(id: impl Into<String>, country: impl Into<String>, generations: u32, seed: u64) -> Self {
        Self {
            id: id.into(),
            root_person_id: None,
            persons: BTreeMap::new(),
            families: BTreeMap::new(),
            generations,
            country: country.into(),
            seed,
            generated_at: String::new(),
            reference_year: None,
        }
    }

    /// Insert a person. Last write wins on a duplicate id, which cannot
    /// happen under monotonic id assignment.
    pub fn add_person(&mut self, person: Person) {
        self.persons.insert(person.id, person);
    }

    pub fn add_family(&mut self, family: Family) {
        self.families.insert(family.id, family);
    }

    pub fn set_root(&mut self, person: Person) {
        self.root_person_id = Some(person.id);
        self.add_person(person);
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(&id)
    }

    pub fn person_mut(&mut self, id: PersonId) -> Option<&mut Person> {
        self.persons.get_mut(&id)
    }

    pub fn family(&self, id: FamilyId) -> Option<&Family> {
        self.families.get(&id)
    }

    pub fn family_mut(&mut self, id: FamilyId) -> Option<&mut Family> {
        self.families.get_mut(&id)
    }

    pub fn root_person(&self) -> Option<&Person> {
        self.root_person_id.and_then(|id| self.person(id))
    }

    pub fn person_count(&self) -> usize {
        self.persons.len()
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    /// All ancestors reachable through father/mother links, depth-first.
    /// A visited set guards against malformed cycles.
    pub fn ancestors(&self, id: PersonId) -> Vec<&Person> {
        let mut out = Vec::new();
        let mut visited = BTreeSet::new();
        if let Some(person) = self.person(id) {
            self.collect_ancestors(person, &mut out, &mut visited);
        }
        out
    }

    fn collect_ancestors<'a>(
        &'a self,
        person: &Person,
        out: &mut Vec<&'a Person>,
        visited: &mut BTreeSet<PersonId>,
    ) {
        for parent_id in [person.father_id, person.mother_id].into_iter().flatten() {
            if visited.insert(parent_id)
                && let Some(parent) = self.person(parent_id)
            {
                out.push(parent);
                self.collect_ancestors(parent, out, visited);
            }
        }
    }

    /// All descendants reachable through children links, depth-first.
    pub fn descendants(&self, id: PersonId) -> Vec<&Person> {
        let mut out = Vec::new();
        let mut visited = BTreeSet::new();
        if let Some(person) = self.person(id) {
            self.collect_descendants(person, &mut out, &mut visited);
        }
        out
    }

    fn collect_descendants<'a>(
        &'a self,
        person: &Person,
        out: &mut Vec<&'a Person>,
        visited: &mut BTreeSet<PersonId>,
    ) {
        for &child_id in &person.children_ids {
            if visited.insert(child_id)
                && let Some(child) = self.person(child_id)
            {
                out.push(child);
                self.collect_descendants(child, out, visited);
            }
        }
    }

    /// Other children of the person's father.
    pub fn siblings(&self, id: PersonId) -> Vec<&Person> {
        let mut out = Vec::new();
        let Some(person) = self.person(id) else {
            return out;
        };
        let Some(father) = person.father_id.and_then(|fid| self.person(fid)) else {
            return out;
        };
        for &child_id in &father.children_ids {
            if child_id != id
                && let Some(child) = self.person(child_id)
            {
                out.push(child);
            }
        }
        out
    }

    /// Everyone in generation `n` (0 = root's generation).
    pub fn generation_slice(&self, n: i32) -> Vec<&Person> {
        self.persons.values().filter(|p| p.generation == n).collect()
    }
}
