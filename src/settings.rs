//! Player preferences
//!
//! Persisted separately from the best score in LocalStorage.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects on/off
    pub sfx_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Input ===
    /// Seconds between repeated lane shifts while a direction is held
    pub hold_repeat_secs: f32,
    /// Minimum horizontal travel (px) for a swipe to count
    pub swipe_min_distance: f32,
    /// Horizontal travel must exceed vertical travel by this factor
    pub swipe_axis_ratio: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx_enabled: true,
            master_volume: 0.22,

            hold_repeat_secs: 0.18,
            swipe_min_distance: 42.0,
            swipe_axis_ratio: 1.2,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lane_rush_settings";

    /// Toggle sound effects, returning the new state
    pub fn toggle_sfx(&mut self) -> bool {
        self.sfx_enabled = !self.sfx_enabled;
        self.sfx_enabled
    }

    /// Parse settings JSON, falling back to defaults on any problem
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Ignoring saved settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Clamp out-of-range values back into something playable
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.master_volume = crate::clamp(self.master_volume, 0.0, 1.0);
        if !(self.hold_repeat_secs > 0.0) {
            self.hold_repeat_secs = defaults.hold_repeat_secs;
        }
        if !(self.swipe_min_distance >= 0.0) {
            self.swipe_min_distance = defaults.swipe_min_distance;
        }
        if !(self.swipe_axis_ratio >= 1.0) {
            self.swipe_axis_ratio = defaults.swipe_axis_ratio;
        }
        self
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.to_json());
            log::info!("Settings saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip_partial() {
        let s = Settings::from_json(r#"{ "sfx_enabled": false }"#);
        assert!(!s.sfx_enabled);
        assert_eq!(s.hold_repeat_secs, 0.18);
        assert_eq!(Settings::from_json(&s.to_json()), s);
    }

    #[test]
    fn test_garbage_falls_back() {
        assert_eq!(Settings::from_json("]]"), Settings::default());
    }

    #[test]
    fn test_sanitize() {
        let s = Settings::from_json(
            r#"{ "master_volume": 3.0, "hold_repeat_secs": -1.0, "swipe_axis_ratio": 0.5 }"#,
        );
        assert_eq!(s.master_volume, 1.0);
        assert_eq!(s.hold_repeat_secs, 0.18);
        assert_eq!(s.swipe_axis_ratio, 1.2);
    }

    #[test]
    fn test_toggle_sfx() {
        let mut s = Settings::default();
        assert!(!s.toggle_sfx());
        assert!(s.toggle_sfx());
    }
}
