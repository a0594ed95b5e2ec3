use eframe::egui;

use crate::{config::AppConfig, session::Session};

/// Two combo boxes picking the recognition language and text orientation.
/// Selecting an item updates the session immediately; labels the session
/// does not recognise leave it untouched.
pub struct LanguagePicker {
    languages: Vec<String>,
    orientations: Vec<String>,
    language_label: String,
    orientation_label: String,
}

impl LanguagePicker {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            languages: config.languages.clone(),
            orientations: config.orientations.clone(),
            language_label: config.languages.first().cloned().unwrap_or_default(),
            orientation_label: config
                .orientations
                .iter()
                .find(|label| *label == "Horizontal")
                .or_else(|| config.orientations.first())
                .cloned()
                .unwrap_or_default(),
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, session: &mut Session) {
        ui.vertical(|ui| {
            let mut changed = false;

            egui::ComboBox::from_id_salt("language_picker_language")
                .selected_text(&self.language_label)
                .show_ui(ui, |ui| {
                    for label in &self.languages {
                        changed |= ui
                            .selectable_value(&mut self.language_label, label.clone(), label)
                            .changed();
                    }
                });

            egui::ComboBox::from_id_salt("language_picker_orientation")
                .selected_text(&self.orientation_label)
                .show_ui(ui, |ui| {
                    for label in &self.orientations {
                        changed |= ui
                            .selectable_value(&mut self.orientation_label, label.clone(), label)
                            .changed();
                    }
                });

            if changed {
                session.set_language_label(&self.language_label);
                session.set_orientation_label(&self.orientation_label);
            }
        });
    }
}
