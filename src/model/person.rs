use serde::{Deserialize, Serialize};

use super::date::Date;
use super::event::LifeEvent;
use crate::id::PersonId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Gender {
    Male,
    Female,
}

string_enum!(Gender {
    Male => "M",
    Female => "F",
});

impl Gender {
    pub fn opposite(self) -> Gender {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EducationLevel {
    None,
    Primary,
    Secondary,
    Tertiary,
}

string_enum!(EducationLevel {
    None => "none",
    Primary => "primary",
    Secondary => "secondary",
    Tertiary => "tertiary",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EmploymentStatus {
    Employed,
    Unemployed,
    Retired,
    Student,
    Child,
}

string_enum!(EmploymentStatus {
    Employed => "employed",
    Unemployed => "unemployed",
    Retired => "retired",
    Student => "student",
    Child => "child",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ResidenceType {
    Urban,
    Rural,
}

string_enum!(ResidenceType {
    Urban => "urban",
    Rural => "rural",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
    Remarried,
}

string_enum!(MaritalStatus {
    Single => "single",
    Married => "married",
    Divorced => "divorced",
    Widowed => "widowed",
    Remarried => "remarried",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    /// Litres of pure alcohol per year.
    pub alcohol_consumption: f64,
    pub tobacco_use: bool,
}

impl Default for HealthProfile {
    fn default() -> Self {
        Self {
            alcohol_consumption: 0.0,
            tobacco_use: false,
        }
    }
}

/// A fully realized individual. All relationship links are ids into the
/// owning tree, never embedded records: spouses and multi-parent links make
/// the structure cyclic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,

    pub birth_date: Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<Date>,
    pub birth_country: String,
    /// Differs from `birth_country` after migration.
    pub current_country: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_id: Option<PersonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_id: Option<PersonId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spouse_ids: Vec<PersonId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children_ids: Vec<PersonId>,

    pub education: EducationLevel,
    pub employment: EmploymentStatus,
    pub health: HealthProfile,
    #[serde(default)]
    pub underweight: bool,
    pub residence: ResidenceType,
    pub gdp_per_capita: f64,
    pub wealth_index: f64,
    pub family_wealth: f64,
    #[serde(default)]
    pub is_rich: bool,

    pub marital_status: MaritalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marriage_age: Option<i32>,
    pub number_of_children: u32,
    #[serde(default)]
    pub is_single_parent: bool,
    #[serde(default)]
    pub born_outside_marriage: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<LifeEvent>,

    /// 0 = root, negative = ancestor generations, positive = descendants.
    pub generation: i32,
}

impl Person {
    pub fn new(
        id: PersonId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        gender: Gender,
        birth_date: Date,
        country: impl Into<String>,
        generation: i32,
    ) -> Self {
        let country = country.into();
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            gender,
            birth_date,
            death_date: None,
            birth_country: country.clone(),
            current_country: country,
            father_id: None,
            mother_id: None,
            spouse_ids: Vec::new(),
            children_ids: Vec::new(),
            education: EducationLevel::None,
            employment: EmploymentStatus::Child,
            health: HealthProfile::default(),
            underweight: false,
            residence: ResidenceType::Rural,
            gdp_per_capita: 0.0,
            wealth_index: 0.0,
            family_wealth: 0.0,
            is_rich: false,
            marital_status: MaritalStatus::Single,
            marriage_age: None,
            number_of_children: 0,
            is_single_parent: false,
            born_outside_marriage: false,
            events: Vec::new(),
            generation,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.death_date.is_none()
    }

    /// Age in whole years at the given date, capped at the death date.
    pub fn age(&self, at: Date) -> i32 {
        let end = match self.death_date {
            Some(death) if death < at => death,
            _ => at,
        };
        end.years_since(self.birth_date)
    }

    pub fn age_at_death(&self) -> Option<i32> {
        self.death_date.map(|d| d.years_since(self.birth_date))
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_person() -> Person {
        Person::new(
            PersonId(1),
            "Greta",
            "Fischer",
            Gender::Female,
            Date::new(1970, 6, 15),
            "germany",
            0,
        )
    }

    #[test]
    fn new_person_is_alive_and_single() {
        let p = test_person();
        assert!(p.is_alive());
        assert_eq!(p.marital_status, MaritalStatus::Single);
        assert_eq!(p.birth_country, p.current_country);
        assert_eq!(p.age_at_death(), None);
    }

    #[test]
    fn age_caps_at_death() {
        let mut p = test_person();
        p.death_date = Some(Date::new(2040, 6, 15));
        assert_eq!(p.age(Date::new(2000, 6, 15)), 30);
        assert_eq!(p.age(Date::new(2060, 1, 1)), 70);
        assert_eq!(p.age_at_death(), Some(70));
    }

    #[test]
    fn gender_serializes_single_letter() {
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), "\"M\"");
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"F\"");
        assert_eq!(Gender::Male.opposite(), Gender::Female);
    }

    #[test]
    fn serializes_expected_shape() {
        let p = test_person();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["id"], "P00001");
        assert_eq!(json["first_name"], "Greta");
        assert_eq!(json["gender"], "F");
        assert_eq!(json["birth_date"], "1970-06-15");
        assert_eq!(json["generation"], 0);
        // Absent optionals and empty lists are omitted
        assert!(json.get("death_date").is_none());
        assert!(json.get("father_id").is_none());
        assert!(json.get("spouse_ids").is_none());
        assert!(json.get("events").is_none());
    }

    #[test]
    fn person_round_trips() {
        let mut p = test_person();
        p.spouse_ids.push(PersonId(2));
        p.children_ids.push(PersonId(3));
        p.marriage_age = Some(25);
        let json = serde_json::to_string(&p).unwrap();
        let back: Person = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
