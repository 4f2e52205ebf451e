#[macro_use]
pub mod model;

pub mod generator;
pub mod id;
pub mod output;
pub mod random;
pub mod stats;

mod error;

pub use error::Error;
pub use generator::{Config, Engine, LifeExpectancyMode};
pub use id::{FamilyId, IdGenerator, PersonId};
pub use model::{Date, EventKind, Family, FamilyTree, Gender, LifeEvent, MaritalStatus, Person};
pub use random::SeededRandom;
pub use stats::{CountryStats, Repository};
