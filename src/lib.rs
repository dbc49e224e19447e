pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod geometry;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{InMemoryDocument, LocalStorage, ModelSnapshot};
pub use config::PlacerConfig;
pub use core::engine::{PlacementReport, PlacementSettings, RunOutcome, RunStats, SleevePlacer};
pub use utils::error::{Result, SleeveError};
