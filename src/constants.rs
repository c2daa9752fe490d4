//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Application name
pub const APP_NAME: &str = "RTX Preset Installer";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default base URL of the backend command endpoint
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:47150/invoke";

/// Default timeout for a single backend command
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Default log file name, written next to the working directory
pub const DEFAULT_LOG_FILE: &str = "rtx-preset-installer.log";

/// Directory under the home directory holding `config.yaml`
pub const CONFIG_DIR_NAME: &str = ".rtx-preset-installer";

/// Environment variable overriding the configured backend URL
pub const BACKEND_URL_ENV: &str = "RTX_INSTALLER_BACKEND_URL";

/// Status shown before any action has run
pub const INITIAL_STATUS: &str = "Ready";

/// Shortest settings hash accepted by the creator form
pub const MIN_SETTINGS_HASH_LEN: usize = 8;

/// Preset id the backend assigns to loose material installs
pub const MATERIAL_FILES_PRESET_ID: &str = "material-files";

/// Prefix of preset ids generated for creator settings
pub const CREATOR_PRESET_PREFIX: &str = "creator-";

/// Launch URI for release-channel installations
pub const LAUNCH_URI_RELEASE: &str = "minecraft://";

/// Launch URI for preview-channel installations
pub const LAUNCH_URI_PREVIEW: &str = "minecraft-preview://";
