//! Persisted user settings (lives in the OS config directory).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::TimelinePadding;

/// Which board view opens first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Board,
    Gantt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub padding: TimelinePadding,
    pub pixels_per_day: f32,
    pub default_view: View,
    /// Project reopened on launch.
    pub last_project: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            padding: TimelinePadding::default(),
            pixels_per_day: 24.0,
            default_view: View::Board,
            last_project: None,
        }
    }
}

/// Reads and writes `settings.json`.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Locate the settings file under the platform config directory,
    /// falling back to the working directory.
    pub fn discover() -> Self {
        let dir = directories::ProjectDirs::from("", "", "PulseBoard")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Self::at(dir.join("settings.json"))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// Strict load: a missing file yields defaults, anything else unreadable is an error.
    pub fn load(&self) -> Result<Settings, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no settings file, using defaults");
                return Ok(Settings::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let mut settings: Settings = serde_json::from_str(&json)?;
        let padding = settings.padding.clamped();
        if padding != settings.padding {
            tracing::warn!(
                lead_in_days = settings.padding.lead_in_days,
                lead_out_days = settings.padding.lead_out_days,
                "timeline padding out of range, clamping"
            );
            settings.padding = padding;
        }
        Ok(settings)
    }

    /// Load, logging and falling back to defaults on error.
    pub fn load_or_default(&self) -> Settings {
        self.load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "settings unreadable, using defaults");
            Settings::default()
        })
    }

    pub fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        std::fs::create_dir_all(self.dir()).map_err(write_err)?;
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, json).map_err(write_err)?;
        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[rstest]
    fn missing_file_gives_defaults(dir: TempDir) {
        let store = SettingsStore::at(dir.path().join("settings.json"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[rstest]
    fn partial_file_fills_in_defaults(dir: TempDir) {
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "padding": { "lead_out_days": 30 }, "default_view": "gantt" }"#)
            .unwrap();
        let settings = SettingsStore::at(&path).load().unwrap();
        assert_eq!(settings.padding.lead_in_days, 2);
        assert_eq!(settings.padding.lead_out_days, 30);
        assert_eq!(settings.default_view, View::Gantt);
        assert_eq!(settings.pixels_per_day, 24.0);
    }

    #[rstest]
    fn out_of_range_padding_is_clamped(dir: TempDir) {
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{ "padding": { "lead_in_days": -3, "lead_out_days": 9000000000000 } }"#,
        )
        .unwrap();
        let settings = SettingsStore::at(&path).load().unwrap();
        assert_eq!(settings.padding.lead_in_days, 0);
        assert_eq!(settings.padding.lead_out_days, TimelinePadding::MAX_DAYS);
    }

    #[rstest]
    fn malformed_file_falls_back(dir: TempDir) {
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let store = SettingsStore::at(&path);
        assert!(matches!(store.load(), Err(StoreError::Json(_))));
        assert_eq!(store.load_or_default(), Settings::default());
    }

    #[rstest]
    fn save_creates_parent_dirs(dir: TempDir) {
        let store = SettingsStore::at(dir.path().join("nested/config/settings.json"));
        let settings = Settings {
            last_project: Some(PathBuf::from("garden.pulse.json")),
            ..Settings::default()
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }
}
