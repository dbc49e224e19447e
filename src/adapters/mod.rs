// Adapters: concrete host document, snapshot files, storage and reports.

pub mod memory;
pub mod report;
pub mod snapshot;
pub mod storage;

pub use memory::{InMemoryDocument, LinkedModel};
pub use snapshot::ModelSnapshot;
pub use storage::LocalStorage;
