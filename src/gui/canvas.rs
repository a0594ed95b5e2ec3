use std::time::{Duration, Instant};

use anyhow::Result;
use eframe::egui::{
    self, scroll_area::ScrollBarVisibility, vec2, Color32, CornerRadius, FontId, PointerButton,
    Rect, Sense, Stroke, StrokeKind, Vec2,
};
use image::RgbaImage;

use crate::{
    services::{ocr::OcrJob, Services},
    session::Session,
    text_log,
};

use super::popups::Popups;

mod selection;
mod zoom;

use selection::RubberBand;
use zoom::Zoom;

/// Fraction of the viewport width the image is scaled to at zoom 1.
const FIT_WIDTH_RATIO: f32 = 0.96;

/// The image canvas: scrollable, zoomable image view with the rubber-band
/// selection gesture that drives recognition.
#[derive(Default)]
pub struct Canvas {
    band: RubberBand,
    zoom: Zoom,
    zoom_pan_mode: bool,

    overlay_visible: bool,
    overlay_text: String,
    pending_ocr: Option<OcrJob>,
    /// Jobs superseded by a newer settle. Kept until finished so every
    /// invoked recognition still reaches the text log.
    superseded_ocr: Vec<OcrJob>,

    last_viewport_width: f32,
    reset_scroll: bool,
    scroll_override: Option<Vec2>,
}

impl Canvas {
    /// A new image was loaded: scroll back to the top and drop any
    /// in-progress gesture. A pending recognition keeps running so its log
    /// side effect still happens.
    pub fn on_image_loaded(&mut self) {
        self.reset_scroll = true;
        self.band = RubberBand::default();
        self.overlay_visible = false;
    }

    pub fn toggle_zoom_pan(&mut self) {
        self.zoom_pan_mode = !self.zoom_pan_mode;
    }

    pub fn zoom_pan_enabled(&self) -> bool {
        self.zoom_pan_mode
    }

    pub fn zoom_in(&mut self) {
        self.zoom.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.zoom.zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.zoom.reset();
        self.reset_scroll = true;
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        session: &Session,
        services: &mut Services,
        popups: &mut Popups,
    ) {
        self.poll_recognition(session, popups);
        if self.pending_ocr.is_some() || !self.superseded_ocr.is_empty() {
            ui.ctx().request_repaint_after(Duration::from_millis(50));
        }

        let viewport_rect = ui.available_rect_before_wrap();
        let viewport_width = viewport_rect.width();

        // a resize re-fits the image width and jumps back to the top
        if (viewport_width - self.last_viewport_width).abs() > 0.5 {
            self.last_viewport_width = viewport_width;
            self.reset_scroll = true;
        }

        let mut scroll_area = egui::ScrollArea::both()
            .auto_shrink(false)
            .scroll_bar_visibility(ScrollBarVisibility::AlwaysVisible);
        if std::mem::take(&mut self.reset_scroll) {
            scroll_area = scroll_area.vertical_scroll_offset(0.0);
        }
        if let Some(offset) = self.scroll_override.take() {
            scroll_area = scroll_area.scroll_offset(offset);
        }

        scroll_area.show(ui, |ui| {
            let Some(image) = session.image.as_ref() else {
                ui.centered_and_justified(|ui| {
                    ui.label("Open a directory containing images to begin.");
                });
                return;
            };

            let content_origin = ui.min_rect().min;

            let texture_size = image.texture.size_vec2();
            let width = FIT_WIDTH_RATIO * viewport_width * self.zoom.scale();
            let height = width * texture_size.y / texture_size.x;

            let response = ui.add(
                egui::Image::new(&image.texture)
                    .fit_to_exact_size(vec2(width, height))
                    .sense(Sense::click_and_drag()),
            );
            let image_rect = response.rect;

            let now = Instant::now();

            if response.drag_started_by(PointerButton::Primary) {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.band.begin(pos);
                }
            }
            if response.dragged_by(PointerButton::Primary) {
                if let Some(pos) = response.interact_pointer_pos() {
                    if ui.input(|i| i.pointer.delta() != Vec2::ZERO) {
                        self.band.update(pos, now);
                    }
                }
            }
            if response.drag_stopped_by(PointerButton::Primary) {
                self.band.finish(response.interact_pointer_pos());
                // release hides both the band and the recognised text, even
                // if recognition has not come back yet
                self.overlay_visible = false;
            }

            if let Some(band_rect) = self.band.poll_settled(now) {
                self.overlay_visible = true;
                self.overlay_text.clear();

                let region = capture_region(band_rect, image_rect, &image.pixels);
                let language = session.recognition_language();
                // an unfinished job is not dropped: its text is still logged
                self.superseded_ocr.extend(self.pending_ocr.take());
                self.pending_ocr = Some(services.ocr.recognize(region, &language));
            }
            if let Some(delay) = self.band.time_until_settle(now) {
                ui.ctx().request_repaint_after(delay);
            }

            if let Some(rect) = self.band.rect() {
                let painter = ui.painter();
                painter.rect_filled(rect, CornerRadius::ZERO, Color32::from_white_alpha(16));
                painter.rect_stroke(
                    rect,
                    CornerRadius::ZERO,
                    Stroke::new(1.0, Color32::LIGHT_BLUE),
                    StrokeKind::Inside,
                );
            }

            self.handle_wheel_zoom(ui, &response, viewport_rect, content_origin);
        });

        self.show_overlay(ui, viewport_rect);
    }

    /// Wheel zoom is active while the command modifier is held or zoom/pan
    /// mode is toggled on; otherwise the wheel scrolls as usual.
    fn handle_wheel_zoom(
        &mut self,
        ui: &mut egui::Ui,
        response: &egui::Response,
        viewport_rect: Rect,
        content_origin: egui::Pos2,
    ) {
        if !response.hovered() {
            return;
        }

        let (scroll_delta, pointer) = ui.input_mut(|i| {
            if !(i.modifiers.command || self.zoom_pan_mode) {
                return (Vec2::ZERO, None);
            }
            // consume the wheel so the scroll area does not also pan
            let delta = std::mem::take(&mut i.smooth_scroll_delta);
            i.raw_scroll_delta = Vec2::ZERO;
            (delta, i.pointer.hover_pos())
        });
        if scroll_delta.y == 0.0 {
            return;
        }

        let factor = if scroll_delta.y > 0.0 {
            self.zoom.zoom_in()
        } else {
            self.zoom.zoom_out()
        };

        // keep the content under the pointer anchored while scaling
        if let (Some(factor), Some(pointer)) = (factor, pointer) {
            let offset = viewport_rect.min - content_origin;
            let pointer_in_viewport = pointer - viewport_rect.min;
            self.scroll_override = Some(zoom::anchored_scroll_offset(
                offset,
                pointer_in_viewport,
                factor,
            ));
        }
    }

    fn show_overlay(&self, ui: &mut egui::Ui, viewport_rect: Rect) {
        if !self.overlay_visible || self.overlay_text.is_empty() {
            return;
        }

        let painter = ui.painter();
        let pos = viewport_rect.left_top() + vec2(12.0, 12.0);
        let galley = painter.layout(
            self.overlay_text.clone(),
            FontId::proportional(16.0),
            Color32::WHITE,
            viewport_rect.width() - 48.0,
        );
        let background = Rect::from_min_size(pos, galley.size()).expand(6.0);
        painter.rect_filled(background, CornerRadius::same(4), Color32::from_black_alpha(208));
        painter.galley(pos, galley, Color32::WHITE);
    }

    fn poll_recognition(&mut self, session: &Session, popups: &mut Popups) {
        // superseded jobs only log; their text never reaches the overlay
        self.superseded_ocr.retain_mut(|job| match job.try_wait() {
            Ok(None) => true,
            Ok(Some(result)) => {
                log_recognized_text(result, session, popups);
                false
            }
            Err(e) => {
                popups.error(e.context("Recognition job was lost"));
                false
            }
        });

        let Some(job) = &mut self.pending_ocr else {
            return;
        };

        match job.try_wait() {
            Ok(None) => {}
            Ok(Some(result)) => {
                self.pending_ocr = None;
                if let Some(text) = log_recognized_text(result, session, popups) {
                    self.overlay_text = text;
                }
            }
            Err(e) => {
                self.pending_ocr = None;
                popups.error(e.context("Recognition job was lost"));
            }
        }
    }
}

/// Write a finished recognition to the session's text log and return the
/// text. A failed recognition or a failed write surfaces as a popup.
fn log_recognized_text(
    result: Result<String>,
    session: &Session,
    popups: &mut Popups,
) -> Option<String> {
    match result {
        Ok(text) => {
            let path = text_log::log_path(&session.directory);
            if let Err(e) = text_log::log_text(&text, session.write_mode, &path) {
                popups.error(e);
            }
            Some(text)
        }
        Err(e) => {
            popups.error(e.context("Recognition failed"));
            None
        }
    }
}

/// Map the on-screen band to source image pixels and crop that region.
///
/// The band is clamped to the drawn image, but a degenerate drag is NOT
/// guarded against: a zero-size band yields a zero-size region, which the
/// recognition collaborator may reject.
fn capture_region(band: Rect, image_rect: Rect, pixels: &RgbaImage) -> RgbaImage {
    let scale = image_rect.width() / pixels.width() as f32;
    if !scale.is_finite() || scale <= 0.0 {
        return RgbaImage::new(0, 0);
    }

    let clamp_x = |v: f32| ((v - image_rect.min.x) / scale).clamp(0.0, pixels.width() as f32);
    let clamp_y = |v: f32| ((v - image_rect.min.y) / scale).clamp(0.0, pixels.height() as f32);

    let x0 = clamp_x(band.min.x);
    let y0 = clamp_y(band.min.y);
    let x1 = clamp_x(band.max.x);
    let y1 = clamp_y(band.max.y);

    image::imageops::crop_imm(
        pixels,
        x0.floor() as u32,
        y0.floor() as u32,
        (x1 - x0).round() as u32,
        (y1 - y0).round() as u32,
    )
    .to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::ServiceJob, text_log::WriteMode};
    use eframe::egui::pos2;

    fn checker(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([((x + y) % 256) as u8, 0, 0, 255])
        })
    }

    #[test]
    fn capture_maps_view_coordinates_to_image_pixels() {
        let pixels = checker(100, 50);
        // drawn at 2x scale, offset into the window
        let image_rect = Rect::from_min_size(pos2(100.0, 50.0), vec2(200.0, 100.0));
        let band = Rect::from_min_max(pos2(120.0, 60.0), pos2(160.0, 80.0));

        let region = capture_region(band, image_rect, &pixels);
        assert_eq!((region.width(), region.height()), (20, 10));
        assert_eq!(region.get_pixel(0, 0), pixels.get_pixel(10, 5));
    }

    #[test]
    fn capture_clamps_band_to_the_image() {
        let pixels = checker(100, 50);
        let image_rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 50.0));
        let band = Rect::from_min_max(pos2(-20.0, -20.0), pos2(500.0, 500.0));

        let region = capture_region(band, image_rect, &pixels);
        assert_eq!((region.width(), region.height()), (100, 50));
    }

    #[test]
    fn superseded_recognition_still_reaches_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path().to_owned(), WriteMode::Append);
        let mut popups = Popups::default();

        // a settle during a slow recognition supersedes the running job; the
        // old job may only lose the overlay, never its log entry
        let mut canvas = Canvas::default();
        canvas
            .superseded_ocr
            .push(ServiceJob::new(|| Ok("older".to_owned())));
        canvas.pending_ocr = Some(ServiceJob::new(|| Ok("newer".to_owned())));

        while canvas.pending_ocr.is_some() || !canvas.superseded_ocr.is_empty() {
            canvas.poll_recognition(&session, &mut popups);
            std::thread::sleep(Duration::from_millis(1));
        }

        assert_eq!(canvas.overlay_text, "newer");
        let log = std::fs::read_to_string(text_log::log_path(dir.path())).unwrap();
        assert!(log.contains("older"));
        assert!(log.contains("newer"));
    }

    #[test]
    fn zero_area_band_produces_zero_size_region() {
        // the degenerate capture is handed to recognition unguarded; whether
        // it is rejected is the collaborator's call
        let pixels = checker(100, 50);
        let image_rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 50.0));
        let band = Rect::from_min_max(pos2(30.0, 30.0), pos2(30.0, 30.0));

        let region = capture_region(band, image_rect, &pixels);
        assert_eq!((region.width(), region.height()), (0, 0));
    }
}
