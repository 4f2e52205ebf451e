use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::id::PersonId;
use crate::model::{Family, FamilyTree, Person};

const PERSON_HEADER: [&str; 17] = [
    "id",
    "first_name",
    "last_name",
    "gender",
    "birth_date",
    "death_date",
    "birth_country",
    "current_country",
    "father_id",
    "mother_id",
    "spouse_ids",
    "children_ids",
    "generation",
    "education",
    "employment",
    "alcohol_consumption",
    "tobacco_use",
];

const FAMILY_HEADER: [&str; 7] = [
    "id",
    "husband_id",
    "wife_id",
    "married_date",
    "divorce_date",
    "children_ids",
    "children_count",
];

/// One row per person, id lists joined with semicolons.
pub fn write_persons_csv(tree: &FamilyTree, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_row(&mut writer, &PERSON_HEADER)?;
    for person in tree.persons.values() {
        write_row(&mut writer, &person_row(person))?;
    }
    writer.flush()
}

pub fn write_families_csv(tree: &FamilyTree, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_row(&mut writer, &FAMILY_HEADER)?;
    for family in tree.families.values() {
        write_row(&mut writer, &family_row(family))?;
    }
    writer.flush()
}

fn person_row(p: &Person) -> Vec<String> {
    vec![
        p.id.to_string(),
        p.first_name.clone(),
        p.last_name.clone(),
        p.gender.to_string(),
        p.birth_date.to_string(),
        p.death_date.map(|d| d.to_string()).unwrap_or_default(),
        p.birth_country.clone(),
        p.current_country.clone(),
        p.father_id.map(|id| id.to_string()).unwrap_or_default(),
        p.mother_id.map(|id| id.to_string()).unwrap_or_default(),
        join_ids(&p.spouse_ids),
        join_ids(&p.children_ids),
        p.generation.to_string(),
        p.education.to_string(),
        p.employment.to_string(),
        format!("{:.1}", p.health.alcohol_consumption),
        p.health.tobacco_use.to_string(),
    ]
}

fn family_row(f: &Family) -> Vec<String> {
    vec![
        f.id.to_string(),
        f.husband_id.map(|id| id.to_string()).unwrap_or_default(),
        f.wife_id.map(|id| id.to_string()).unwrap_or_default(),
        f.married_date.to_string(),
        f.divorce_date.map(|d| d.to_string()).unwrap_or_default(),
        join_ids(&f.children_ids),
        f.child_count().to_string(),
    ]
}

fn join_ids(ids: &[PersonId]) -> String {
    let mut out = String::new();
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        let _ = write!(out, "{id}");
    }
    out
}

fn write_row<W: Write, S: AsRef<str>>(writer: &mut W, fields: &[S]) -> io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        writer.write_all(escape(field.as_ref()).as_bytes())?;
    }
    writer.write_all(b"\n")
}

/// Minimal quoting: only fields containing a delimiter, quote, or newline
/// get wrapped.
fn escape(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        std::borrow::Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        std::borrow::Cow::Borrowed(field)
    }
}
