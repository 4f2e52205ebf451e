//! Domain model: persons, families, life events, and the tree that owns them.

#[macro_use]
mod macros;

pub mod date;
pub mod event;
pub mod family;
pub mod person;
pub mod tree;

pub use date::Date;
pub use event::{EventKind, LifeEvent};
pub use family::Family;
pub use person::{
    EducationLevel, EmploymentStatus, Gender, HealthProfile, MaritalStatus, Person, ResidenceType,
};
pub use tree::FamilyTree;
