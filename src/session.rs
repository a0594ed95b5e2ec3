use std::path::PathBuf;

use eframe::egui::TextureHandle;
use image::RgbaImage;

use crate::text_log::WriteMode;

/// Shared session state: current image, directory, recognition language and
/// logging mode.
///
/// Owned by the app; components receive it by reference each frame and
/// mutate it in response to UI events. All mutation happens on the UI thread.
pub struct Session {
    pub image: Option<LoadedImage>,
    pub directory: PathBuf,
    /// Base language code, eg. `jpn`.
    pub language: String,
    /// Empty for horizontal text, `_vert` for vertical.
    pub orientation: String,
    pub write_mode: WriteMode,
}

/// The image currently shown on the canvas: decoded pixels for region
/// capture, plus the texture the canvas draws.
pub struct LoadedImage {
    pub path: PathBuf,
    pub pixels: RgbaImage,
    pub texture: TextureHandle,
}

impl Session {
    pub fn new(directory: PathBuf, write_mode: WriteMode) -> Self {
        Self {
            image: None,
            directory,
            language: "jpn".to_owned(),
            orientation: String::new(),
            write_mode,
        }
    }

    /// The composed code passed to recognition: `{language}{orientation}`.
    pub fn recognition_language(&self) -> String {
        format!("{}{}", self.language, self.orientation)
    }

    /// Set the base language from a picker display label. Unrecognised
    /// labels leave the state untouched.
    pub fn set_language_label(&mut self, label: &str) {
        if let Some(code) = language_code(label) {
            self.language = code.to_owned();
        }
    }

    /// Set the orientation suffix from a picker display label. Unrecognised
    /// labels leave the state untouched.
    pub fn set_orientation_label(&mut self, label: &str) {
        if let Some(suffix) = orientation_suffix(label) {
            self.orientation = suffix.to_owned();
        }
    }
}

/// Map a language display label to its fixed internal code.
pub fn language_code(label: &str) -> Option<&'static str> {
    match label.trim() {
        "Japanese" => Some("jpn"),
        "Korean" => Some("kor"),
        "Chinese SIM" => Some("chi_sim"),
        "Chinese TRA" => Some("chi_tra"),
        "English" => Some("eng"),
        _ => None,
    }
}

/// Map an orientation display label to its language code suffix.
pub fn orientation_suffix(label: &str) -> Option<&'static str> {
    match label.trim() {
        "Vertical" => Some("_vert"),
        "Horizontal" => Some(""),
        _ => None,
    }
}
