//! User settings, read once at startup from the OS config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::model::TimelineZoom;

/// Overrides `data_dir` when set.
pub const DATA_DIR_ENV: &str = "WORK_ORDER_TIMELINE_DATA_DIR";

/// Persisted user settings (lives in the OS config directory).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Zoom the timeline opens with.
    pub default_zoom: TimelineZoom,
    /// Total width of the scrollable timeline body in pixels.
    pub timeline_width_px: f32,
    /// Where work orders are stored. Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_zoom: TimelineZoom::Day,
            timeline_width_px: 3600.0,
            data_dir: None,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location and apply environment overrides.
    pub fn load() -> Self {
        let mut settings = match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        };
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            settings.data_dir = Some(PathBuf::from(dir));
        }
        settings
    }

    /// Missing files yield defaults silently; unreadable ones are logged.
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read settings, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str::<Self>(&contents) {
            Ok(settings) => {
                info!(path = %path.display(), "loaded settings");
                settings.sanitized()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse settings, using defaults");
                Self::default()
            }
        }
    }

    fn settings_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "WorkOrderTimeline")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    fn sanitized(mut self) -> Self {
        if !self.timeline_width_px.is_finite() || self.timeline_width_px < 100.0 {
            self.timeline_width_px = Self::default().timeline_width_px;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings::load_from(&dir.path().join("settings.json"));
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "default_zoom": "month" }"#).unwrap();
        let settings = AppSettings::load_from(&path);
        assert_eq!(settings.default_zoom, TimelineZoom::Month);
        assert_eq!(settings.timeline_width_px, 3600.0);
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "zoom = day").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }

    #[test]
    fn tiny_width_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "timeline_width_px": 3.0 }"#).unwrap();
        assert_eq!(AppSettings::load_from(&path).timeline_width_px, 3600.0);
    }
}
