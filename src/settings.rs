//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web. Gameplay balance lives in
//! [`crate::Tuning`]; nothing here changes how a run plays out.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Next preset in the Low -> Medium -> High cycle
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Maximum live dust puffs for this preset
    pub fn max_dust(&self) -> usize {
        match self {
            QualityPreset::Low => 30,
            QualityPreset::Medium => 120,
            QualityPreset::High => 400,
        }
    }

    /// Skyline layers drawn behind the sidewalk (0-3)
    pub fn skyline_layers(&self) -> usize {
        match self {
            QualityPreset::Low => 1,
            QualityPreset::Medium => 2,
            QualityPreset::High => 3,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Dust puffs at the runner's feet
    pub dust: bool,
    /// Expanding ring when a fish is caught
    pub collect_burst: bool,
    /// Scrolling skyline
    pub parallax: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (static skyline, no bursts)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            dust: true,
            collect_burst: true,
            parallax: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            mute_on_blur: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops the per-catch effect
        if preset == QualityPreset::Low {
            self.collect_burst = false;
        }
    }

    /// Effective parallax scrolling (respects reduced_motion)
    pub fn effective_parallax(&self) -> bool {
        self.parallax && !self.reduced_motion
    }

    /// Effective collect burst (respects reduced_motion)
    pub fn effective_collect_burst(&self) -> bool {
        self.collect_burst && !self.reduced_motion
    }

    /// Effective dust cap
    pub fn max_dust(&self) -> usize {
        if !self.dust {
            0
        } else {
            self.quality.max_dust()
        }
    }

    /// Clamp volumes into range (stored JSON may be hand-edited)
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self
    }

    /// Parse stored settings, falling back to defaults
    pub fn from_json_or_default(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "alley_runner_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json_or_default(&json);
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
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
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
    fn test_reduced_motion_overrides_effects() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_parallax());
        assert!(!settings.effective_collect_burst());
        assert!(Settings::default().effective_parallax());
    }

    #[test]
    fn test_low_preset() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(!settings.collect_burst);
        assert_eq!(settings.max_dust(), 30);
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
    }

    #[test]
    fn test_preset_cycle_round_trips_names() {
        let mut preset = QualityPreset::Low;
        for _ in 0..3 {
            assert_eq!(QualityPreset::parse(preset.as_str()), Some(preset));
            preset = preset.next();
        }
        assert_eq!(preset, QualityPreset::Low);
        assert_eq!(QualityPreset::parse("ultra"), None);
    }

    #[test]
    fn test_bad_json_falls_back() {
        assert_eq!(Settings::from_json_or_default("{oops"), Settings::default());
    }

    #[test]
    fn test_stored_volumes_are_clamped() {
        let settings = Settings::from_json_or_default(r#"{ "master_volume": 3.0, "dust": false }"#);
        assert_eq!(settings.master_volume, 1.0);
        assert!(!settings.dust);
        assert_eq!(settings.max_dust(), 0);
    }
}
