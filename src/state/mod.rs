//! Poll watermarks
//!
//! One [`TriggerState`] per trigger instance, keyed by trigger ID and kept
//! in a JSON file between runs by [`StateManager`].

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{State, TriggerState};
