use serde::{Deserialize, Serialize};

use super::date::Date;
use crate::id::{FamilyId, PersonId};

/// A recorded marriage and the children born into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: FamilyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub husband_id: Option<PersonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wife_id: Option<PersonId>,
    #[serde(default)]
    pub children_ids: Vec<PersonId>,
    pub married_date: Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divorce_date: Option<Date>,
}

impl Family {
    pub fn new(id: FamilyId, married_date: Date) -> Self {
        Self {
            id,
            husband_id: None,
            wife_id: None,
            children_ids: Vec::new(),
            married_date,
            divorce_date: None,
        }
    }

    pub fn add_child(&mut self, id: PersonId) {
        self.children_ids.push(id);
    }

    pub fn is_divorced(&self) -> bool {
        self.divorce_date.is_some()
    }

    pub fn child_count(&self) -> usize {
        self.children_ids.len()
    }
}
