pub mod adapter;
pub mod codec;
pub mod dedup;
pub mod engine;
pub mod existing;
pub mod orientation;
pub mod placement;
pub mod resolver;
pub mod search;

pub use crate::domain::model::{CandidateHit, Conduit, PenetrationResult, StructuralElement};
pub use crate::domain::ports::{ConfigProvider, ModelDocument, RayCaster, Storage};
pub use crate::utils::error::Result;
