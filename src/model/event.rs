use serde::{Deserialize, Serialize};

use super::date::Date;
use crate::id::PersonId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EventKind {
    Birth,
    Death,
    Marriage,
    Divorce,
    Migration,
    Graduation,
    Retirement,
}

string_enum!(EventKind {
    Birth => "birth",
    Death => "death",
    Marriage => "marriage",
    Divorce => "divorce",
    Migration => "migration",
    Graduation => "graduation",
    Retirement => "retirement",
});

/// One entry in a person's append-only life history. The death event is kept
/// unique per person and rewritten in place when the death date changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub date: Date,
    /// Country slug where the event took place.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// The other party, e.g. the spouse in a marriage event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<PersonId>,
}

impl LifeEvent {
    pub fn new(kind: EventKind, date: Date, location: impl Into<String>) -> Self {
        Self {
            kind,
            date,
            location: location.into(),
            description: String::new(),
            related_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_related_id(mut self, id: PersonId) -> Self {
        self.related_id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_expected_shape() {
        let ev = LifeEvent::new(EventKind::Marriage, Date::new(1995, 6, 12), "germany")
            .with_related_id(PersonId(2));

        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "marriage");
        assert_eq!(json["date"], "1995-06-12");
        assert_eq!(json["location"], "germany");
        assert_eq!(json["related_id"], "P00002");
        // Empty description is omitted
        assert!(json.get("description").is_none());
    }

    #[test]
    fn event_kind_snake_case() {
        assert_eq!(
            serde_json::to_string(&EventKind::Migration).unwrap(),
            "\"migration\""
        );
        assert_eq!(
            serde_json::to_string(&EventKind::Retirement).unwrap(),
            "\"retirement\""
        );
    }

    #[test]
    fn event_kind_round_trips() {
        for kind in [
            EventKind::Birth,
            EventKind::Death,
            EventKind::Marriage,
            EventKind::Divorce,
            EventKind::Migration,
            EventKind::Graduation,
            EventKind::Retirement,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            let back: EventKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn unknown_kind_rejected() {
        assert!(serde_json::from_str::<EventKind>("\"coronation\"").is_err());
    }
}
