use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use eframe::egui;
use image::{DynamicImage, RgbaImage};
use rusty_tesseract::Args;
use serde::{Deserialize, Serialize};

use crate::{config::Config, services::ServiceJob};

use super::{OcrJob, OcrService};

/// OCR through the `tesseract` command line tool.
///
/// The composed language codes used by the canvas (`jpn`, `jpn_vert`,
/// `chi_sim`, ...) are tesseract traineddata names, so they are passed
/// straight through as `-l`.
#[derive(Default)]
pub struct TesseractOcr {
    config: TesseractConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TesseractConfig {
    /// Page segmentation mode. 6 ("assume a single uniform block of text")
    /// works well for rubber-band captures.
    pub psm: i32,
    /// OCR engine mode.
    pub oem: i32,
    pub dpi: i32,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            psm: 6,
            oem: 3,
            dpi: 150,
        }
    }
}

impl Config for TesseractConfig {
    fn path() -> &'static str {
        "ocr_services/tesseract.json"
    }

    fn show_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("Requires a tesseract installation with the selected language's traineddata.");
        ui.horizontal(|ui| {
            ui.label("Page segmentation mode:");
            ui.add(egui::DragValue::new(&mut self.psm).range(0..=13));
        });
        ui.horizontal(|ui| {
            ui.label("Engine mode:");
            ui.add(egui::DragValue::new(&mut self.oem).range(0..=3));
        });
        ui.horizontal(|ui| {
            ui.label("DPI:");
            ui.add(egui::DragValue::new(&mut self.dpi).range(70..=600));
        });
    }
}

impl OcrService for TesseractOcr {
    fn name(&self) -> &'static str {
        "Tesseract"
    }

    fn init(&mut self) -> Result<()> {
        self.config =
            TesseractConfig::load().context("Tesseract: Failed to load configuration file")?;
        Ok(())
    }

    fn terminate(&mut self) -> Result<()> {
        self.config
            .save()
            .context("Tesseract: Failed to save configuration file")?;
        Ok(())
    }

    fn show_config_ui(&mut self, ui: &mut egui::Ui) {
        self.config.show_ui(ui);
    }

    fn recognize(&mut self, region: RgbaImage, language: &str) -> OcrJob {
        let args = Args {
            lang: language.to_owned(),
            config_variables: HashMap::new(),
            dpi: Some(self.config.dpi),
            psm: Some(self.config.psm),
            oem: Some(self.config.oem),
        };

        ServiceJob::new(move || {
            // NOTE: a degenerate zero-size capture is handed over as-is;
            // tesseract rejects it and the error surfaces in a popup
            let image = rusty_tesseract::Image::from_dynamic_image(&DynamicImage::ImageRgba8(
                region,
            ))
            .map_err(|e| anyhow!("Tesseract: Failed to convert captured region: {e}"))?;

            let text = rusty_tesseract::image_to_string(&image, &args)
                .map_err(|e| anyhow!("Tesseract: Recognition failed: {e}"))?;

            Ok(text.trim_end().to_owned())
        })
    }
}
