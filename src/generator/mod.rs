//! Stochastic tree generation: policy, factories, and the driving engine.

pub mod config;
pub mod engine;
pub mod family;
pub mod life_expectancy;
pub mod person;
pub mod probability;

pub use config::Config;
pub use engine::Engine;
pub use family::FamilyBuilder;
pub use life_expectancy::LifeExpectancyMode;
pub use person::{PersonFactory, PersonOptions};
pub use probability::ProbabilityEngine;
