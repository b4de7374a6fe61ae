mod defines;
mod ui_backup;
mod ui_builder;
mod ui_home;
mod ui_settings;
mod uiapp;

pub use defines::*;
pub use ui_backup::*;
pub use ui_builder::*;
pub use uiapp::*;
