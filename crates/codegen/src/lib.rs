pub mod optim;
pub mod representation;

pub use representation::{ChangerConfig, RepresentationChanger, RepresentationError, TypeErrorMode};
