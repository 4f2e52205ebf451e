use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a person within one generated tree.
/// Renders as `P00042`, which is also its serialized form.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PersonId(pub u64);

/// Identifier of a family within one generated tree. Renders as `F00007`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct FamilyId(pub u64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{:05}", self.0)
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{:05}", self.0)
    }
}

impl From<PersonId> for String {
    fn from(id: PersonId) -> Self {
        id.to_string()
    }
}

impl From<FamilyId> for String {
    fn from(id: FamilyId) -> Self {
        id.to_string()
    }
}

fn parse_tagged(s: &str, tag: char) -> Result<u64, String> {
    match s.strip_prefix(tag) {
        Some(digits) => digits.parse().map_err(|_| format!("malformed id: {s}")),
        None => Err(format!("id missing '{tag}' prefix: {s}")),
    }
}

impl TryFrom<String> for PersonId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_tagged(&s, 'P').map(PersonId)
    }
}

impl TryFrom<String> for FamilyId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_tagged(&s, 'F').map(FamilyId)
    }
}

/// Monotonic ID generator scoped to one generator instance, so concurrent
/// independent runs never collide. IDs start at 1.
#[derive(Debug)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of IDs handed out so far.
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids() {
        let mut id_gen = IdGenerator::new();
        assert_eq!(id_gen.next_id(), 1);
        assert_eq!(id_gen.next_id(), 2);
        assert_eq!(id_gen.next_id(), 3);
        assert_eq!(id_gen.issued(), 3);
    }

    #[test]
    fn ids_render_padded() {
        assert_eq!(PersonId(42).to_string(), "P00042");
        assert_eq!(FamilyId(7).to_string(), "F00007");
    }

    #[test]
    fn person_id_round_trips_as_string() {
        let json = serde_json::to_string(&PersonId(3)).unwrap();
        assert_eq!(json, "\"P00003\"");
        let back: PersonId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PersonId(3));
    }

    #[test]
    fn malformed_id_rejected() {
        assert!(serde_json::from_str::<PersonId>("\"F00001\"").is_err());
        assert!(serde_json::from_str::<FamilyId>("\"Fxyz\"").is_err());
    }
}
