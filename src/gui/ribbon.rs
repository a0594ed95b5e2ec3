use std::path::Path;

use eframe::egui::{self, vec2, ColorImage, TextureHandle, TextureOptions, Vec2};

use crate::{
    config::{AppConfig, ButtonAlign, ButtonConfig},
    session::Session,
};

mod language_picker;

use language_picker::LanguagePicker;

/// Everything a toolbar button can ask the window to do.
///
/// Buttons are bound through this explicit table instead of looking up
/// methods by name at click time: the binding is resolved once, when the
/// ribbon is built from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    OpenDirectory,
    RefreshDirectory,
    ToggleLogging,
    ToggleZoomPan,
    ZoomIn,
    ZoomOut,
    ResetView,
    OpenSettings,
    FirstImage,
    PrevImage,
    NextImage,
    LastImage,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::OpenDirectory,
        Action::RefreshDirectory,
        Action::ToggleLogging,
        Action::ToggleZoomPan,
        Action::ZoomIn,
        Action::ZoomOut,
        Action::ResetView,
        Action::OpenSettings,
        Action::FirstImage,
        Action::PrevImage,
        Action::NextImage,
        Action::LastImage,
    ];

    /// The identifier used for this action in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Action::OpenDirectory => "open_directory",
            Action::RefreshDirectory => "refresh_directory",
            Action::ToggleLogging => "toggle_logging",
            Action::ToggleZoomPan => "toggle_zoom_pan",
            Action::ZoomIn => "zoom_in",
            Action::ZoomOut => "zoom_out",
            Action::ResetView => "reset_view",
            Action::OpenSettings => "open_settings",
            Action::FirstImage => "first_image",
            Action::PrevImage => "prev_image",
            Action::NextImage => "next_image",
            Action::LastImage => "last_image",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }
}

/// The ribbon: one tab per configured category, each hosting that
/// category's buttons, the page navigator, and (on the settings tab) the
/// language picker.
pub struct Ribbon {
    tabs: Vec<RibbonTab>,
    page_nav: Vec<RibbonButton>,
    picker: LanguagePicker,
    active_tab: usize,

    icon_size_rel: f32,
    icon_margin: f32,
    ribbon_height_rel: f32,
}

struct RibbonTab {
    name: String,
    buttons: Vec<RibbonButton>,
    has_language_picker: bool,
}

struct RibbonButton {
    action: Option<Action>,
    help: String,
    toggle: bool,
    icon_w: f32,
    icon_h: f32,
    align: ButtonAlign,
    icon: Option<TextureHandle>,
}

impl RibbonButton {
    fn from_config(ctx: &egui::Context, icon_dir: &Path, config: &ButtonConfig) -> Self {
        let action = Action::from_name(&config.action);
        if action.is_none() {
            log::warn!(
                "Unknown toolbar action `{}`; the button will be disabled",
                config.action
            );
        }

        Self {
            action,
            help: config.help.clone(),
            toggle: config.toggle,
            icon_w: config.icon_w,
            icon_h: config.icon_h,
            align: config.align,
            icon: load_icon(ctx, icon_dir, &config.icon),
        }
    }
}

impl Ribbon {
    /// Materialize the ribbon from the configuration table, resolving action
    /// bindings and loading button icons up front.
    pub fn from_config(ctx: &egui::Context, config: &AppConfig) -> Self {
        let button = |entry: &ButtonConfig| RibbonButton::from_config(ctx, &config.icon_dir, entry);

        Self {
            tabs: config
                .toolbar
                .iter()
                .map(|tab| RibbonTab {
                    name: tab.name.clone(),
                    buttons: tab.buttons.iter().map(button).collect(),
                    has_language_picker: tab.name == "SETTINGS",
                })
                .collect(),
            page_nav: config.page_controls.iter().map(button).collect(),
            picker: LanguagePicker::new(config),
            active_tab: 0,

            icon_size_rel: config.icon_size_rel,
            icon_margin: config.icon_margin,
            ribbon_height_rel: config.ribbon_height_rel,
        }
    }

    /// Overall ribbon height for the given window frame height.
    pub fn height(&self, frame_height: f32) -> f32 {
        frame_height * self.icon_size_rel * self.ribbon_height_rel
    }

    /// Show the ribbon. Returns the action of the clicked button, if any.
    ///
    /// `is_toggled` reports the current on/off state for toggleable actions
    /// so their buttons render pressed.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        frame_height: f32,
        session: &mut Session,
        is_toggled: impl Fn(Action) -> bool,
    ) -> Option<Action> {
        let unit = frame_height * self.icon_size_rel;
        let mut clicked = None;

        ui.horizontal(|ui| {
            for (index, tab) in self.tabs.iter().enumerate() {
                if ui
                    .selectable_label(self.active_tab == index, &tab.name)
                    .clicked()
                {
                    self.active_tab = index;
                }
            }
        });
        ui.separator();

        let Some(tab) = self.tabs.get(self.active_tab) else {
            return None;
        };

        ui.horizontal(|ui| {
            for button in &tab.buttons {
                if button.align == ButtonAlign::Left
                    && show_button(ui, button, unit, self.icon_margin, &is_toggled)
                {
                    clicked = button.action;
                }
            }

            if tab.has_language_picker {
                ui.separator();
                self.picker.show(ui, session);
            }

            // the page navigator trails every tab, pushed to the right edge,
            // followed by any right-aligned buttons
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(action) =
                    show_page_navigator(ui, &self.page_nav, unit, self.icon_margin, &is_toggled)
                {
                    clicked = Some(action);
                }

                for button in &tab.buttons {
                    if button.align == ButtonAlign::Right
                        && show_button(ui, button, unit, self.icon_margin, &is_toggled)
                    {
                        clicked = button.action;
                    }
                }
            });
        });

        clicked
    }
}

/// The five page-turning controls in their fixed 2-row grid:
///
/// ```text
/// [0]  [  2  ]
/// [1]  [3] [4]
/// ```
fn show_page_navigator(
    ui: &mut egui::Ui,
    buttons: &[RibbonButton],
    unit: f32,
    margin: f32,
    is_toggled: &impl Fn(Action) -> bool,
) -> Option<Action> {
    let [b0, b1, b2, b3, b4] = buttons else {
        log::warn!(
            "Page navigator expects exactly 5 controls, found {}",
            buttons.len()
        );
        return None;
    };

    let mut clicked = None;
    let mut show = |ui: &mut egui::Ui, button: &RibbonButton, size: Option<Vec2>| {
        if show_button_sized(ui, button, unit, margin, size, is_toggled) {
            clicked = button.action;
        }
    };

    let cell = vec2(unit * margin, unit * margin);
    let spacing = ui.spacing().item_spacing.x;
    let wide = vec2(cell.x * 2.0 + spacing, cell.y);

    ui.vertical(|ui| {
        ui.horizontal(|ui| {
            show(ui, b0, Some(cell));
            show(ui, b2, Some(wide));
        });
        ui.horizontal(|ui| {
            show(ui, b1, Some(cell));
            show(ui, b3, Some(cell));
            show(ui, b4, Some(cell));
        });
    });

    clicked
}

fn show_button(
    ui: &mut egui::Ui,
    button: &RibbonButton,
    unit: f32,
    margin: f32,
    is_toggled: &impl Fn(Action) -> bool,
) -> bool {
    show_button_sized(ui, button, unit, margin, None, is_toggled)
}

fn show_button_sized(
    ui: &mut egui::Ui,
    button: &RibbonButton,
    unit: f32,
    margin: f32,
    size: Option<Vec2>,
    is_toggled: &impl Fn(Action) -> bool,
) -> bool {
    let icon_size = vec2(unit * button.icon_w, unit * button.icon_h);
    let min_size = size.unwrap_or(icon_size * margin);

    let image = match &button.icon {
        Some(texture) => egui::Image::new(texture),
        None => egui::Image::new(egui::include_image!("../../assets/icons/default.svg")),
    }
    .fit_to_exact_size(icon_size);

    let pressed = button.toggle && button.action.map(is_toggled).unwrap_or(false);
    let widget = egui::Button::image(image)
        .min_size(min_size)
        .selected(pressed);

    ui.add_enabled(button.action.is_some(), widget)
        .on_hover_text(&button.help)
        .clicked()
}

/// Load a configured icon file. A missing or unreadable file is not an
/// error: the caller falls back to the embedded default icon.
fn load_icon(ctx: &egui::Context, icon_dir: &Path, file: &str) -> Option<TextureHandle> {
    let path = icon_dir.join(file);
    if !path.exists() {
        return None;
    }

    match image::open(&path) {
        Ok(icon) => {
            let rgba = icon.to_rgba8();
            let color_image = ColorImage::from_rgba_unmultiplied(
                [rgba.width() as usize, rgba.height() as usize],
                rgba.as_flat_samples().as_slice(),
            );
            Some(ctx.load_texture(format!("icon:{file}"), color_image, TextureOptions::LINEAR))
        }
        Err(e) => {
            log::warn!("Could not load icon `{}`: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn action_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
    }

    #[test]
    fn action_names_are_unique() {
        for action in Action::ALL {
            let count = Action::ALL
                .iter()
                .filter(|a| a.name() == action.name())
                .count();
            assert_eq!(count, 1, "duplicate action name `{}`", action.name());
        }
    }

    #[test]
    fn unknown_action_name_resolves_to_none() {
        assert_eq!(Action::from_name("frobnicate"), None);
        assert_eq!(Action::from_name(""), None);
    }

    #[test]
    fn every_default_config_binding_resolves() {
        let config = AppConfig::default();
        let bindings = config
            .toolbar
            .iter()
            .flat_map(|tab| &tab.buttons)
            .chain(&config.page_controls);

        for button in bindings {
            assert!(
                Action::from_name(&button.action).is_some(),
                "unresolvable action `{}` in default config",
                button.action
            );
        }
    }
}
