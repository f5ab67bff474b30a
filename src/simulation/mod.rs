//! Automated play for balance testing.
//!
//! Seats are driven by [`Policy`] implementations that choose from
//! [`Engine::legal_intents`](crate::rules::Engine::legal_intents). A
//! [`Simulator`] plays seeded batches and folds them into a
//! [`BatchReport`]: win rates per policy, scores, markers left standing,
//! extinctions survived and how often each trait was bought.
//!
//! ```
//! use std::sync::Arc;
//!
//! use primeval::catalog::Catalog;
//! use primeval::core::EngineConfig;
//! use primeval::rules::Engine;
//! use primeval::simulation::{Generalist, Policy, RandomPolicy, SimulationConfig, Simulator};
//!
//! let json = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalog.json"));
//! let catalog = Catalog::from_json(json).unwrap();
//! let engine = Engine::new(Arc::new(catalog), EngineConfig::default()).unwrap();
//!
//! let mut policies: Vec<Box<dyn Policy>> = vec![
//!     Box::new(Generalist::new(engine.catalog())),
//!     Box::new(RandomPolicy),
//! ];
//! let config = SimulationConfig::default().with_players(2).with_games(2);
//! let report = Simulator::new(&engine, config).run(&mut policies).unwrap();
//! assert_eq!(report.policies.len(), 2);
//! ```

pub mod policy;
pub mod runner;

pub use policy::{CladeSpecialist, Generalist, Policy, RandomPolicy};
pub use runner::{
    trait_values, BatchReport, GameSummary, PolicyStats, SeatSummary, SimulationConfig,
    SimulationError, Simulator, TraitPick, TraitValue,
};
