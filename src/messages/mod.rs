//! Message types for inter-layer communication in the actor-based architecture.
//!
//! UI events flow from the terminal loop to the App actor, backend commands
//! from the App actor to the Backend actor, and responses and render
//! snapshots flow back.

pub mod ui_events;
pub mod backend;
pub mod render;

pub use ui_events::UiEvent;
pub use backend::{BackendCommand, BackendResponse, Resource};
pub use render::RenderState;
