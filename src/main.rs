use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use eframe::egui;

use config::{AppConfig, Config};
use gui::{
    canvas::Canvas,
    navigator::Navigator,
    popups::Popups,
    ribbon::{Action, Ribbon},
};
use services::Services;
use session::{LoadedImage, Session};
use text_log::WriteMode;

pub mod config;
pub mod gui;
pub mod services;
pub mod session;
pub mod text_log;

pub const WINDOW_TITLE: &str = "SnipOCR";

fn main() -> Result<()> {
    pretty_env_logger::init();

    eframe::run_native(
        WINDOW_TITLE,
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size(egui::vec2(1280.0, 800.0)),
            ..Default::default()
        },
        Box::new(|cc| {
            EframeApp::new(cc)
                .map(|app| -> Box<dyn eframe::App> { Box::new(app) })
                .map_err(Into::into)
        }),
    )
    .map_err(|e| anyhow!("{e}"))
}

pub struct EframeApp {
    pub config: AppConfig,
    pub services: Services,
    pub popups: Popups,
    pub settings_open: bool,

    session: Session,
    canvas: Canvas,
    navigator: Navigator,
    ribbon: Ribbon,
}

impl EframeApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self> {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let config = AppConfig::load().context("Could not load main configuration file")?;
        let services = Services::new(&config)?;

        let directory = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        log::info!("Browsing `{}`", directory.display());

        let session = Session::new(directory.clone(), config.write_mode);
        let mut navigator = Navigator::default();
        navigator.set_directory(directory, &config.image_extensions);
        let ribbon = Ribbon::from_config(&cc.egui_ctx, &config);

        Ok(Self {
            config,
            services,
            popups: Popups::default(),
            settings_open: false,
            session,
            canvas: Canvas::default(),
            navigator,
            ribbon,
        })
    }

    fn load_image(&mut self, ctx: &egui::Context, path: PathBuf) {
        match decode_image(ctx, &path) {
            Ok(image) => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
                    "{WINDOW_TITLE} - {}",
                    image
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                )));
                self.session.image = Some(image);
                self.canvas.on_image_loaded();
            }
            Err(e) => self.popups.error(e),
        }
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: Action) {
        match action {
            Action::OpenDirectory => {
                let picked = rfd::FileDialog::new()
                    .set_directory(&self.session.directory)
                    .pick_folder();
                if let Some(directory) = picked {
                    self.session.directory = directory.clone();
                    self.navigator
                        .set_directory(directory, &self.config.image_extensions);
                }
            }
            Action::RefreshDirectory => self.navigator.rescan(&self.config.image_extensions),
            Action::ToggleLogging => {
                self.session.write_mode = match self.session.write_mode {
                    WriteMode::Off => WriteMode::Append,
                    WriteMode::Append | WriteMode::Overwrite => WriteMode::Off,
                };
            }
            Action::ToggleZoomPan => self.canvas.toggle_zoom_pan(),
            Action::ZoomIn => self.canvas.zoom_in(),
            Action::ZoomOut => self.canvas.zoom_out(),
            Action::ResetView => self.canvas.reset_view(),
            Action::OpenSettings => self.settings_open = true,
            Action::FirstImage => self.select_and_load(ctx, Navigator::select_first),
            Action::PrevImage => self.select_and_load(ctx, Navigator::select_prev),
            Action::NextImage => self.select_and_load(ctx, Navigator::select_next),
            Action::LastImage => self.select_and_load(ctx, Navigator::select_last),
        }
    }

    fn select_and_load(
        &mut self,
        ctx: &egui::Context,
        select: fn(&mut Navigator) -> Option<PathBuf>,
    ) {
        if let Some(path) = select(&mut self.navigator) {
            self.load_image(ctx, path);
        }
    }
}

impl eframe::App for EframeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // retried every frame until the directory has a filtered entry
        if let Some(path) = self.navigator.auto_select_first(&self.config.image_extensions) {
            self.load_image(ctx, path);
        }

        let frame_height = ctx.screen_rect().height();
        let ribbon_height = self.ribbon.height(frame_height);

        let zoom_pan = self.canvas.zoom_pan_enabled();
        let logging = self.session.write_mode != WriteMode::Off;
        let is_toggled = move |action: Action| match action {
            Action::ToggleZoomPan => zoom_pan,
            Action::ToggleLogging => logging,
            _ => false,
        };

        let mut action = None;
        egui::TopBottomPanel::top("ribbon")
            .exact_height(ribbon_height)
            .show(ctx, |ui| {
                action = self
                    .ribbon
                    .show(ui, frame_height, &mut self.session, is_toggled);
            });
        if let Some(action) = action {
            self.handle_action(ctx, action);
        }

        let mut clicked_file = None;
        egui::SidePanel::left("navigator")
            .default_width(220.0)
            .show(ctx, |ui| {
                clicked_file = self.navigator.show(ui);
            });
        if let Some(path) = clicked_file {
            self.load_image(ctx, path);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas
                .show(ui, &self.session, &mut self.services, &mut self.popups);
        });

        gui::config_window::show_config_window(self, ctx);
        self.popups.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.config.save() {
            log::error!("Failed to save configuration: {e:#}");
        }
    }
}

/// Decode an image file and upload it as a linearly filtered texture.
fn decode_image(ctx: &egui::Context, path: &Path) -> Result<LoadedImage> {
    let pixels = image::open(path)
        .with_context(|| format!("Could not open image `{}`", path.display()))?
        .to_rgba8();

    let color_image = egui::ColorImage::from_rgba_unmultiplied(
        [pixels.width() as usize, pixels.height() as usize],
        pixels.as_flat_samples().as_slice(),
    );
    let texture = ctx.load_texture(
        path.display().to_string(),
        color_image,
        egui::TextureOptions::LINEAR,
    );

    Ok(LoadedImage {
        path: path.to_owned(),
        pixels,
        texture,
    })
}
