//! App layer - central state store and action orchestration
//!
//! The App actor receives UI events and backend responses, updates the
//! store, sends backend commands and emits render state.

pub mod state;
pub mod actor;
pub mod commands;
pub mod actions;

pub use state::AppStore;
pub use actor::AppActor;
