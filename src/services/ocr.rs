use anyhow::Result;
use eframe::egui;
use image::RgbaImage;

use super::ServiceJob;

pub mod tesseract;

pub type OcrJob = ServiceJob<Result<String>>;

/// A text-recognition collaborator.
///
/// Implementations must accept an arbitrary-size captured region, including
/// pathological near-zero sizes, which they are free to reject with an error.
pub trait OcrService {
    fn name(&self) -> &'static str;

    /// Initialise the service (ie. load its configuration file, etc).
    fn init(&mut self) -> Result<()>;
    /// Terminate the service (ie. save its configuration file, etc).
    fn terminate(&mut self) -> Result<()>;

    /// Show the config UI for the service's configuration.
    fn show_config_ui(&mut self, ui: &mut egui::Ui);

    /// Extract text from a captured image region.
    ///
    /// `language` is a composed code of the form `{base}{orientation suffix}`,
    /// eg. `jpn`, `jpn_vert`, `eng`.
    fn recognize(&mut self, region: RgbaImage, language: &str) -> OcrJob;
}

/// OCR service that recognises nothing. Placeholder for a configured service
/// that is unavailable, and a deterministic stand-in for tests.
#[derive(Default)]
pub struct DummyOcr;

impl OcrService for DummyOcr {
    fn name(&self) -> &'static str {
        "Dummy"
    }

    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn terminate(&mut self) -> Result<()> {
        Ok(())
    }

    fn show_config_ui(&mut self, ui: &mut egui::Ui) {
        ui.label("The dummy service returns a fixed string and never fails.");
    }

    fn recognize(&mut self, region: RgbaImage, language: &str) -> OcrJob {
        let text = format!(
            "[dummy ocr: {}x{} region, language {language}]",
            region.width(),
            region.height()
        );
        ServiceJob::new(move || Ok(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_echoes_region_size_and_language() {
        let mut ocr = DummyOcr;
        let region = RgbaImage::new(40, 20);
        let text = ocr.recognize(region, "jpn_vert").wait().unwrap().unwrap();
        assert!(text.contains("40x20"));
        assert!(text.contains("jpn_vert"));
    }

    #[test]
    fn dummy_accepts_zero_size_region() {
        // a too-fast, too-short drag can produce an empty capture; the
        // collaborator decides whether that is an error
        let mut ocr = DummyOcr;
        let region = RgbaImage::new(0, 0);
        assert!(ocr.recognize(region, "eng").wait().unwrap().is_ok());
    }
}
