use eframe::egui::{self, vec2};

use crate::{config::Config, services::Services, EframeApp, WINDOW_TITLE};

/// The settings window: main configuration plus the active OCR service's
/// own configuration UI, shown in a separate viewport.
pub fn show_config_window(app: &mut EframeApp, ctx: &egui::Context) {
    if !app.settings_open {
        return;
    }

    ctx.show_viewport_immediate(
        egui::ViewportId(egui::Id::new("settings_viewport")),
        egui::ViewportBuilder {
            title: Some(format!("{WINDOW_TITLE} Settings")),
            inner_size: Some(vec2(480.0, 400.0)),
            ..Default::default()
        },
        |ctx, _| {
            egui::CentralPanel::default().show(ctx, |ui| {
                egui_extras::StripBuilder::new(ui)
                    .size(egui_extras::Size::remainder())
                    .size(egui_extras::Size::exact(22.0))
                    .vertical(|mut strip| {
                        strip.cell(|ui| {
                            egui::ScrollArea::vertical().show(ui, |ui| {
                                let header_size = 20.0;

                                ui.label(
                                    egui::RichText::new("Configuration")
                                        .size(header_size)
                                        .strong(),
                                );
                                app.config.show_ui(ui);

                                ui.separator();

                                egui::CollapsingHeader::new(
                                    egui::RichText::new(format!(
                                        "OCR: {}",
                                        app.services.ocr.name()
                                    ))
                                    .size(header_size),
                                )
                                .default_open(true)
                                .show_unindented(ui, |ui| {
                                    app.services.ocr.show_config_ui(ui);
                                });
                            });
                        });

                        strip.cell(|ui| {
                            ui.centered_and_justified(|ui| {
                                if ui.button("Reload Services").clicked() {
                                    match Services::new(&app.config) {
                                        Ok(services) => app.services = services,
                                        Err(e) => app.popups.error(e),
                                    }
                                }
                            });
                        });
                    });
            });

            if ctx.input(|input| input.viewport().close_requested()) {
                app.settings_open = false;
            }
        },
    );
}
