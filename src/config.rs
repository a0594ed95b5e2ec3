use std::{fs::File, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use eframe::egui;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    services::ocr::{DummyOcr, OcrService},
    text_log::WriteMode,
};

/// A JSON configuration file stored under the user's config directory.
pub trait Config: Serialize + DeserializeOwned + Default {
    /// Path of the file, relative to `<config dir>/<package name>/`.
    fn path() -> &'static str;

    /// Show the edit UI for this configuration.
    fn show_ui(&mut self, ui: &mut egui::Ui);

    /// Loads the configuration file, or returns the defaults if it does not
    /// exist yet.
    fn load() -> Result<Self> {
        let config_path = config_file_path(Self::path())?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let file = File::open(&config_path).with_context(|| {
            format!(
                "Could not open configuration file: `{}`",
                config_path.display()
            )
        })?;

        serde_json::from_reader(file).with_context(|| {
            format!(
                "Could not read configuration file: `{}`",
                config_path.display()
            )
        })
    }

    fn save(&self) -> Result<()> {
        let config_path = config_file_path(Self::path())?;

        let config_dir = config_path
            .parent()
            .expect("config file path always has a parent");
        std::fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "Could not create configuration directory: `{}`",
                config_dir.display()
            )
        })?;

        let file = File::create(&config_path).with_context(|| {
            format!(
                "Could not write to configuration file: `{}`",
                config_path.display()
            )
        })?;

        serde_json::to_writer_pretty(file, self).with_context(|| {
            format!(
                "Could not serialise configuration file: `{}`",
                config_path.display()
            )
        })
    }
}

fn config_file_path(relative: &str) -> Result<PathBuf> {
    let mut path = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not find a suitable config directory"))?;
    path.push(env!("CARGO_PKG_NAME"));
    path.push(relative);
    Ok(path)
}

/// Main application configuration: service selection, toolbar table, and the
/// static UI geometry ratios. Loaded once at startup, read-only afterwards
/// except through the settings window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub ocr_service: OcrServiceList,
    /// Logging mode the session starts with.
    pub write_mode: WriteMode,

    /// Icon edge length relative to the window frame height.
    pub icon_size_rel: f32,
    /// Button hit box as a multiple of the icon size.
    pub icon_margin: f32,
    /// Ribbon height as a multiple of the icon size.
    pub ribbon_height_rel: f32,
    /// Directory searched for configured button icons.
    pub icon_dir: PathBuf,

    /// File extensions shown by the directory navigator (lowercase, no dot).
    pub image_extensions: Vec<String>,

    /// Display labels offered by the language picker.
    pub languages: Vec<String>,
    pub orientations: Vec<String>,

    /// One ribbon tab per entry, in order.
    pub toolbar: Vec<TabConfig>,
    /// The five page-turning controls, in grid order.
    pub page_controls: Vec<ButtonConfig>,
}

/// One ribbon tab: a named category with its button definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabConfig {
    pub name: String,
    pub buttons: Vec<ButtonConfig>,
}

/// Declarative description of one toolbar control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonConfig {
    /// Action identifier, resolved through the dispatch table at load time.
    pub action: String,
    /// Icon file name under `icon_dir`; a missing file falls back to the
    /// embedded default icon.
    pub icon: String,
    pub icon_w: f32,
    pub icon_h: f32,
    pub help: String,
    pub toggle: bool,
    #[serde(default)]
    pub align: ButtonAlign,
}

/// Which end of its tab a button sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ButtonAlign {
    #[default]
    Left,
    Right,
}

impl ButtonConfig {
    fn new(action: &str, icon: &str, help: &str, toggle: bool) -> Self {
        Self {
            action: action.to_owned(),
            icon: icon.to_owned(),
            icon_w: 1.0,
            icon_h: 1.0,
            help: help.to_owned(),
            toggle,
            align: ButtonAlign::Left,
        }
    }
}

impl Config for AppConfig {
    fn path() -> &'static str {
        "config.json"
    }

    fn show_ui(&mut self, ui: &mut egui::Ui) {
        egui::ComboBox::from_label("OCR Service")
            .selected_text(format!("{:?}", self.ocr_service))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.ocr_service, OcrServiceList::Tesseract, "Tesseract");
                ui.selectable_value(&mut self.ocr_service, OcrServiceList::Dummy, "Dummy");
            });

        egui::ComboBox::from_label("Logging mode at startup")
            .selected_text(self.write_mode.label())
            .show_ui(ui, |ui| {
                for mode in [WriteMode::Off, WriteMode::Append, WriteMode::Overwrite] {
                    ui.selectable_value(&mut self.write_mode, mode, mode.label());
                }
            });
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ocr_service: OcrServiceList::Tesseract,
            write_mode: WriteMode::Off,

            icon_size_rel: 0.05,
            icon_margin: 1.3,
            ribbon_height_rel: 3.2,
            icon_dir: PathBuf::from("assets/icons"),

            image_extensions: ["png", "jpg", "jpeg", "bmp", "gif", "webp"]
                .map(str::to_owned)
                .to_vec(),

            languages: ["Japanese", "Korean", "Chinese SIM", "Chinese TRA", "English"]
                .map(str::to_owned)
                .to_vec(),
            orientations: ["Vertical", "Horizontal"].map(str::to_owned).to_vec(),

            toolbar: vec![
                TabConfig {
                    name: "FILE".to_owned(),
                    buttons: vec![
                        ButtonConfig::new(
                            "open_directory",
                            "open_directory.png",
                            "Open a directory of images",
                            false,
                        ),
                        ButtonConfig::new(
                            "refresh_directory",
                            "refresh.png",
                            "Rescan the current directory",
                            false,
                        ),
                        ButtonConfig::new(
                            "toggle_logging",
                            "logging.png",
                            "Append recognised text to log.txt",
                            true,
                        ),
                    ],
                },
                TabConfig {
                    name: "VIEW".to_owned(),
                    buttons: vec![
                        ButtonConfig::new(
                            "toggle_zoom_pan",
                            "zoom_pan.png",
                            "Toggle zoom/pan mode",
                            true,
                        ),
                        ButtonConfig::new("zoom_in", "zoom_in.png", "Zoom in", false),
                        ButtonConfig::new("zoom_out", "zoom_out.png", "Zoom out", false),
                        ButtonConfig::new(
                            "reset_view",
                            "reset_view.png",
                            "Fit the image to the window",
                            false,
                        ),
                    ],
                },
                TabConfig {
                    name: "SETTINGS".to_owned(),
                    buttons: vec![ButtonConfig::new(
                        "open_settings",
                        "settings.png",
                        "Open the settings window",
                        false,
                    )],
                },
            ],
            page_controls: vec![
                ButtonConfig::new("first_image", "first.png", "Jump to the first image", false),
                ButtonConfig::new("last_image", "last.png", "Jump to the last image", false),
                ButtonConfig::new(
                    "refresh_directory",
                    "refresh.png",
                    "Rescan the current directory",
                    false,
                ),
                ButtonConfig::new("prev_image", "prev.png", "Previous image", false),
                ButtonConfig::new("next_image", "next.png", "Next image", false),
            ],
        }
    }
}

/// The OCR services the user can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OcrServiceList {
    Tesseract,
    Dummy,
}

impl OcrServiceList {
    pub fn create_service(self) -> Box<dyn OcrService> {
        match self {
            Self::Tesseract => Box::new(crate::services::ocr::tesseract::TesseractOcr::default()),
            Self::Dummy => Box::new(DummyOcr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_five_page_controls() {
        // the page navigator's grid layout expects exactly five
        assert_eq!(AppConfig::default().page_controls.len(), 5);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.toolbar.len(), config.toolbar.len());
        assert_eq!(back.image_extensions, config.image_extensions);
    }
}
