//! Dark/light palettes and the persisted theme choice.

use eframe::egui;
use serde::{Deserialize, Serialize};

pub const SETTINGS_STORAGE_KEY: &str = "folio.desktop.settings";

const ACCENT: egui::Color32 = egui::Color32::from_rgb(88, 101, 242);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Label of the button that switches away from this mode.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Dark => "Light mode",
            Self::Light => "Dark mode",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedDesktopSettings {
    pub theme: ThemeMode,
}

impl PersistedDesktopSettings {
    pub fn from_storage(storage: Option<&dyn eframe::Storage>) -> Self {
        storage
            .and_then(|storage| storage.get_string(SETTINGS_STORAGE_KEY))
            .and_then(|text| serde_json::from_str::<Self>(&text).ok())
            .unwrap_or_default()
    }
}

pub fn accent_color() -> egui::Color32 {
    ACCENT
}

pub fn error_color(mode: ThemeMode) -> egui::Color32 {
    match mode {
        ThemeMode::Dark => egui::Color32::from_rgb(240, 120, 120),
        ThemeMode::Light => egui::Color32::from_rgb(180, 40, 40),
    }
}

pub fn card_fill(mode: ThemeMode) -> egui::Color32 {
    match mode {
        ThemeMode::Dark => egui::Color32::from_rgb(43, 45, 49),
        ThemeMode::Light => egui::Color32::from_rgb(242, 243, 245),
    }
}

pub fn visuals_for_mode(mode: ThemeMode) -> egui::Visuals {
    let mut visuals = match mode {
        ThemeMode::Dark => {
            let mut v = egui::Visuals::dark();
            v.window_fill = egui::Color32::from_rgb(43, 45, 49);
            v.panel_fill = egui::Color32::from_rgb(30, 31, 34);
            v.extreme_bg_color = egui::Color32::from_rgb(24, 25, 28);
            v.faint_bg_color = egui::Color32::from_rgb(49, 51, 56);
            v
        }
        ThemeMode::Light => egui::Visuals::light(),
    };

    visuals.hyperlink_color = ACCENT;
    visuals.selection.bg_fill = ACCENT;
    visuals.widgets.active.bg_fill = ACCENT;
    visuals.widgets.hovered.bg_fill = ACCENT.gamma_multiply(0.85);
    visuals.window_corner_radius = egui::CornerRadius::same(10);
    visuals.menu_corner_radius = egui::CornerRadius::same(8);
    visuals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_round_trips_between_modes() {
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Light.toggle_label(), "Dark mode");
    }

    #[test]
    fn unknown_persisted_settings_fall_back_to_dark() {
        let settings: PersistedDesktopSettings = serde_json::from_str("{}").expect("parse");
        assert_eq!(settings.theme, ThemeMode::Dark);
        assert!(!visuals_for_mode(ThemeMode::Light).dark_mode);
    }
}
