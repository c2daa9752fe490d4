use chrono::{DateTime, Utc};
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::{LAUNCH_URI_PREVIEW, LAUNCH_URI_RELEASE, MATERIAL_FILES_PRESET_ID};

/// Preset currently installed into an installation, as reported by the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstalledPreset {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    pub installed_at: DateTime<Utc>,
    #[serde(default)]
    pub is_creator: bool,
}

/// A game installation found by the backend scan. Keyed by `install_path`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Installation {
    #[serde(rename = "FriendlyName")]
    pub display_name: String,
    #[serde(rename = "InstallLocation")]
    pub install_path: String,
    #[serde(rename = "Preview")]
    pub is_preview_channel: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_preset: Option<InstalledPreset>,
}

impl Installation {
    pub fn new(display_name: impl Into<String>, install_path: impl Into<String>) -> Self {
        Installation {
            display_name: display_name.into(),
            install_path: install_path.into(),
            is_preview_channel: false,
            installed_preset: None,
        }
    }

    /// URI that opens the game for this installation's release channel
    pub fn launch_uri(&self) -> &'static str {
        if self.is_preview_channel {
            LAUNCH_URI_PREVIEW
        } else {
            LAUNCH_URI_RELEASE
        }
    }
}

/// A preset available for installation. Keyed by `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(rename = "uuid")]
    pub id: String,
    pub stub: String,
    #[serde(rename = "tonemapping")]
    pub tonemapping_mode: String,
    #[serde(rename = "bloom")]
    pub bloom_mode: String,
}

/// One row of the installed-presets view
#[derive(Clone, Debug, PartialEq)]
pub struct InstalledPresetEntry {
    pub preset_id: String,
    pub preset_name: String,
    pub installed_at: DateTime<Utc>,
    pub installation_name: String,
    pub install_path: String,
    pub is_preview_channel: bool,
    pub is_creator: bool,
}

impl InstalledPresetEntry {
    fn from_installation(installation: &Installation, preset: &InstalledPreset) -> Self {
        InstalledPresetEntry {
            preset_id: preset.id.clone(),
            preset_name: preset.name.clone(),
            installed_at: preset.installed_at,
            installation_name: installation.display_name.clone(),
            install_path: installation.install_path.clone(),
            is_preview_channel: installation.is_preview_channel,
            is_creator: preset.is_creator || preset.id == MATERIAL_FILES_PRESET_ID,
        }
    }

    pub fn launch_uri(&self) -> &'static str {
        if self.is_preview_channel {
            LAUNCH_URI_PREVIEW
        } else {
            LAUNCH_URI_RELEASE
        }
    }
}

/// Distinct installed presets, one per preset id.
///
/// When a preset id is installed into several installations the entry with
/// the latest `installed_at` wins; on equal timestamps the first one seen
/// stays. Rows keep the order in which each id was first encountered.
pub fn dedup_installed_presets(installations: &[Installation]) -> Vec<InstalledPresetEntry> {
    let mut unique: IndexMap<&str, InstalledPresetEntry> = IndexMap::new();

    for installation in installations {
        let Some(preset) = &installation.installed_preset else {
            continue;
        };
        let candidate = InstalledPresetEntry::from_installation(installation, preset);
        match unique.entry(preset.id.as_str()) {
            Entry::Occupied(mut slot) => {
                if candidate.installed_at > slot.get().installed_at {
                    slot.insert(candidate);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
        }
    }

    unique.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn with_preset(path: &str, id: &str, installed_at: DateTime<Utc>) -> Installation {
        let mut installation = Installation::new(format!("Install {path}"), path);
        installation.installed_preset = Some(InstalledPreset {
            id: id.to_string(),
            name: format!("Preset {id}"),
            installed_at,
            is_creator: false,
        });
        installation
    }

    #[test]
    fn test_dedup_keeps_newest_per_preset() {
        let installations = vec![
            with_preset("/a", "X", at(100)),
            with_preset("/b", "X", at(200)),
            with_preset("/c", "Y", at(300)),
        ];

        let view = dedup_installed_presets(&installations);
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].preset_id, "X");
        assert_eq!(view[0].installed_at, at(200));
        assert_eq!(view[0].install_path, "/b");
        assert_eq!(view[1].preset_id, "Y");
        assert_eq!(view[1].installed_at, at(300));
    }

    #[test]
    fn test_dedup_tie_keeps_first_seen() {
        let installations = vec![
            with_preset("/first", "X", at(100)),
            with_preset("/second", "X", at(100)),
        ];

        let view = dedup_installed_presets(&installations);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].install_path, "/first");
    }

    #[test]
    fn test_dedup_skips_installations_without_preset() {
        let installations = vec![
            Installation::new("Bare", "/bare"),
            with_preset("/m", MATERIAL_FILES_PRESET_ID, at(5)),
        ];

        let view = dedup_installed_presets(&installations);
        assert_eq!(view.len(), 1);
        assert!(view[0].is_creator);
    }

    #[test]
    fn test_installation_wire_format() {
        let json = r#"{
            "FriendlyName": "Minecraft Preview",
            "InstallLocation": "C:\\Games\\Preview",
            "Preview": true,
            "installed_preset": {
                "uuid": "abc",
                "name": "Vanilla RTX",
                "installed_at": "2024-05-01T10:00:00Z"
            }
        }"#;

        let installation: Installation = serde_json::from_str(json).unwrap();
        assert_eq!(installation.display_name, "Minecraft Preview");
        assert!(installation.is_preview_channel);
        assert_eq!(installation.launch_uri(), LAUNCH_URI_PREVIEW);
        let preset = installation.installed_preset.unwrap();
        assert_eq!(preset.id, "abc");
        assert!(!preset.is_creator);
    }

    #[test]
    fn test_preset_wire_format() {
        let json = r#"{"name":"Default","uuid":"u-1","stub":"s","tonemapping":"ACES","bloom":"on"}"#;
        let preset: Preset = serde_json::from_str(json).unwrap();
        assert_eq!(preset.id, "u-1");
        assert_eq!(preset.tonemapping_mode, "ACES");
        assert_eq!(preset.bloom_mode, "on");
    }
}
