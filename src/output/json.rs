use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::id::PersonId;
use crate::model::{
    EducationLevel, EmploymentStatus, FamilyTree, Gender, MaritalStatus, Person, ResidenceType,
};

pub fn write_json(tree: &FamilyTree, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, tree)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

pub fn write_json_compact(tree: &FamilyTree, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, tree)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

pub fn write_graph_json(tree: &FamilyTree, path: &Path) -> io::Result<()> {
    let graph = GraphView::from_tree(tree);
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &graph)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Flattened projection for visualization frontends: person nodes with
/// display fields, parent/spouse edges, and aggregate statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphView {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_id: Option<PersonId>,
    pub country: String,
    pub generations: u32,
    pub seed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_year: Option<i32>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub stats: GraphStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: PersonId,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birth_year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_year: Option<i32>,
    pub is_alive: bool,
    pub generation: i32,
    pub marital_status: MaritalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marriage_age: Option<i32>,
    pub number_of_children: u32,
    pub education: EducationLevel,
    pub employment: EmploymentStatus,
    pub alcohol_consumption: f64,
    pub tobacco_use: bool,
    pub born_outside_marriage: bool,
    pub is_single_parent: bool,
    pub underweight: bool,
    pub residence: ResidenceType,
    pub gdp_per_capita: f64,
    pub wealth_index: f64,
    pub family_wealth: f64,
    pub is_rich: bool,
    pub country: String,
    pub current_country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: PersonId,
    pub target: PersonId,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EdgeKind {
    Parent,
    Spouse,
}

string_enum!(EdgeKind {
    Parent => "parent",
    Spouse => "spouse",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_persons: usize,
    pub total_families: usize,
    pub living_persons: usize,
    pub deceased_persons: usize,
    pub average_age: f64,
    pub oldest_person_age: i32,
    pub total_children: usize,
    pub average_children: f64,
    pub divorce_count: usize,
    pub single_count: usize,
    pub married_count: usize,
    pub male_count: usize,
    pub female_count: usize,
    pub births_outside_marriage: usize,
    pub tertiary_education: usize,
    pub employed_count: usize,
}

impl GraphView {
    pub fn from_tree(tree: &FamilyTree) -> Self {
        // Ages of the living are measured at the reference year
        let reference_year = tree
            .reference_year
            .or_else(|| tree.persons.values().map(|p| p.birth_date.year()).max())
            .unwrap_or(0);

        let mut stats = GraphStats {
            total_persons: tree.person_count(),
            total_families: tree.family_count(),
            ..GraphStats::default()
        };

        let mut nodes = Vec::with_capacity(tree.person_count());
        let mut total_age = 0.0;
        for person in tree.persons.values() {
            nodes.push(Self::node(person));

            if person.is_alive() {
                stats.living_persons += 1;
            } else {
                stats.deceased_persons += 1;
            }
            match person.gender {
                Gender::Male => stats.male_count += 1,
                Gender::Female => stats.female_count += 1,
            }
            match person.marital_status {
                MaritalStatus::Single => stats.single_count += 1,
                MaritalStatus::Married | MaritalStatus::Remarried => stats.married_count += 1,
                MaritalStatus::Divorced => stats.divorce_count += 1,
                MaritalStatus::Widowed => {}
            }
            if person.education == EducationLevel::Tertiary {
                stats.tertiary_education += 1;
            }
            if person.employment == EmploymentStatus::Employed {
                stats.employed_count += 1;
            }
            if person.born_outside_marriage {
                stats.births_outside_marriage += 1;
            }

            let age = person
                .age_at_death()
                .unwrap_or_else(|| (reference_year - person.birth_date.year()).max(0));
            total_age += f64::from(age);
            stats.oldest_person_age = stats.oldest_person_age.max(age);
        }
        if !nodes.is_empty() {
            stats.average_age = total_age / nodes.len() as f64;
        }

        let edges = Self::edges(tree);

        stats.total_children = tree.families.values().map(|f| f.child_count()).sum();
        if stats.total_families > 0 {
            stats.average_children = stats.total_children as f64 / stats.total_families as f64;
        }

        Self {
            id: tree.id.clone(),
            root_id: tree.root_person_id,
            country: tree.country.clone(),
            generations: tree.generations,
            seed: tree.seed,
            reference_year: tree.reference_year,
            nodes,
            edges,
            stats,
        }
    }

    fn node(p: &Person) -> GraphNode {
        GraphNode {
            id: p.id,
            name: p.full_name(),
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            gender: p.gender,
            birth_year: p.birth_date.year(),
            death_year: p.death_date.map(|d| d.year()),
            is_alive: p.is_alive(),
            generation: p.generation,
            marital_status: p.marital_status,
            marriage_age: p.marriage_age,
            number_of_children: p.number_of_children,
            education: p.education,
            employment: p.employment,
            alcohol_consumption: p.health.alcohol_consumption,
            tobacco_use: p.health.tobacco_use,
            born_outside_marriage: p.born_outside_marriage,
            is_single_parent: p.is_single_parent,
            underweight: p.underweight,
            residence: p.residence,
            gdp_per_capita: p.gdp_per_capita,
            wealth_index: p.wealth_index,
            family_wealth: p.family_wealth,
            is_rich: p.is_rich,
            country: p.birth_country.clone(),
            current_country: p.current_country.clone(),
        }
    }

    /// Parent edges point parent to child; spouse edges are deduplicated
    /// across the symmetric links.
    fn edges(tree: &FamilyTree) -> Vec<GraphEdge> {
        let mut edges = Vec::new();
        for person in tree.persons.values() {
            for parent in [person.father_id, person.mother_id].into_iter().flatten() {
                edges.push(GraphEdge {
                    source: parent,
                    target: person.id,
                    kind: EdgeKind::Parent,
                });
            }
        }

        let mut seen = BTreeSet::new();
        for person in tree.persons.values() {
            for &spouse in &person.spouse_ids {
                let key = if person.id.0 < spouse.0 {
                    (person.id, spouse)
                } else {
                    (spouse, person.id)
                };
                if seen.insert(key) {
                    edges.push(GraphEdge {
                        source: person.id,
                        target: spouse,
                        kind: EdgeKind::Spouse,
                    });
                }
            }
        }
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::FamilyId;
    use crate::model::{Date, Family};

    fn tree() -> FamilyTree {
        let mut tree = FamilyTree::new("tree_9", "germany", 2, 9);
        tree.reference_year = Some(2000);

        let mut husband = Person::new(
            PersonId(1),
            "Hans",
            "Müller",
            Gender::Male,
            Date::new(1950, 3, 14),
            "germany",
            0,
        );
        husband.marital_status = MaritalStatus::Married;
        husband.spouse_ids.push(PersonId(2));
        husband.children_ids.push(PersonId(3));

        let mut wife = Person::new(
            PersonId(2),
            "Greta",
            "Schmidt",
            Gender::Female,
            Date::new(1952, 7, 2),
            "germany",
            0,
        );
        wife.marital_status = MaritalStatus::Married;
        wife.spouse_ids.push(PersonId(1));
        wife.children_ids.push(PersonId(3));

        let mut child = Person::new(
            PersonId(3),
            "Karl",
            "Müller",
            Gender::Male,
            Date::new(1976, 1, 20),
            "germany",
            1,
        );
        child.father_id = Some(PersonId(1));
        child.mother_id = Some(PersonId(2));
        child.death_date = Some(Date::new(1990, 4, 4));

        tree.set_root(husband);
        tree.add_person(wife);
        tree.add_person(child);

        let mut family = Family::new(FamilyId(1), Date::new(1974, 6, 1));
        family.husband_id = Some(PersonId(1));
        family.wife_id = Some(PersonId(2));
        family.add_child(PersonId(3));
        tree.add_family(family);
        tree
    }

    #[test]
    fn graph_counts_nodes_and_edges() {
        let graph = GraphView::from_tree(&tree());
        assert_eq!(graph.nodes.len(), 3);
        // two parent edges plus one deduplicated spouse edge
        let parents = graph.edges.iter().filter(|e| e.kind == EdgeKind::Parent).count();
        let spouses = graph.edges.iter().filter(|e| e.kind == EdgeKind::Spouse).count();
        assert_eq!(parents, 2);
        assert_eq!(spouses, 1);
    }

    #[test]
    fn graph_stats_aggregate() {
        let graph = GraphView::from_tree(&tree());
        let stats = &graph.stats;
        assert_eq!(stats.total_persons, 3);
        assert_eq!(stats.living_persons, 2);
        assert_eq!(stats.deceased_persons, 1);
        assert_eq!(stats.male_count, 2);
        assert_eq!(stats.female_count, 1);
        assert_eq!(stats.married_count, 2);
        assert_eq!(stats.single_count, 1);
        assert_eq!(stats.total_children, 1);
        assert_eq!(stats.average_children, 1.0);
        // ages at reference 2000: 50, 48, and 14 at death
        assert_eq!(stats.oldest_person_age, 50);
        assert!((stats.average_age - (50.0 + 48.0 + 14.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn tree_json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        let tree = tree();
        write_json(&tree, &path).unwrap();

        let loaded: FamilyTree =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, tree);
    }

    #[test]
    fn graph_json_writes_expected_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        write_graph_json(&tree(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["id"], "tree_9");
        assert_eq!(value["reference_year"], 2000);
        assert_eq!(value["nodes"][0]["name"], "Hans Müller");
        assert_eq!(value["edges"][0]["type"], "parent");
        assert_eq!(value["stats"]["total_persons"], 3);
    }
}
