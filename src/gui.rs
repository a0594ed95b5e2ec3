pub mod canvas;
pub mod config_window;
pub mod navigator;
pub mod popups;
pub mod ribbon;
