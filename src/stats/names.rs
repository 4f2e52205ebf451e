use serde::{Deserialize, Serialize};

use crate::model::Gender;

/// A given name with the popularity context the name weighting uses.
/// `popularity` is the position in that year's chart, 0 = most common.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForenameRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub localized: String,
    pub gender: Gender,
    pub popularity: u32,
    pub year: i32,
}

/// A family name ranked by national frequency, 0 = most common.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurnameRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub localized: String,
    pub rank: u32,
}

impl ForenameRecord {
    pub fn new(name: impl Into<String>, gender: Gender, popularity: u32, year: i32) -> Self {
        Self {
            name: name.into(),
            localized: String::new(),
            gender,
            popularity,
            year,
        }
    }
}

impl SurnameRecord {
    pub fn new(name: impl Into<String>, rank: u32) -> Self {
        Self {
            name: name.into(),
            localized: String::new(),
            rank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_country_pack_rows() {
        let fore: ForenameRecord = serde_json::from_str(
            r#"{"name":"Hans","gender":"M","popularity":0,"year":1950}"#,
        )
        .unwrap();
        assert_eq!(fore.name, "Hans");
        assert_eq!(fore.gender, Gender::Male);
        assert!(fore.localized.is_empty());

        let sur: SurnameRecord =
            serde_json::from_str(r#"{"name":"Müller","rank":0}"#).unwrap();
        assert_eq!(sur.rank, 0);
    }
}
