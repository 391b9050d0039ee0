pub mod serialization;
pub mod snapshot;
pub mod state;
