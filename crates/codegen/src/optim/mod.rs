pub mod reducer;
pub mod simplified_reducer;

pub use reducer::{GraphReducer, Reducer, Reduction};
pub use simplified_reducer::SimplifiedOperatorReducer;
