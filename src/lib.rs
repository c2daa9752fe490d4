//! # RTX Preset Installer
//!
//! Terminal front-end for installing RTX graphics presets into game
//! installations.
//!
//! ## Features
//! - Installation scan with multi-select
//! - Preset list with cache bypass (force refresh)
//! - Sequential install of a preset into every selected installation
//! - Creator settings and material file installs
//! - Status line, busy indicator and timestamped console
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (state store and actions)
//! - Backend Layer (actor running commands against the installer backend)

pub mod constants;
pub mod config;
pub mod models;
pub mod backend;
pub mod messages;
pub mod app;
pub mod ui;

// Re-export commonly used types
pub use models::{dedup_installed_presets, InstalledPreset, InstalledPresetEntry, Installation, Preset};
pub use backend::{Backend, BackendActor, BackendError, CreatorSettingsRequest, HttpBackend};
pub use messages::{BackendCommand, BackendResponse, RenderState, UiEvent};
pub use app::{AppActor, AppStore};
pub use config::Settings;
