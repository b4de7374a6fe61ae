pub mod ui_colors {
    use egui::Color32;

    pub const BACKGROUND_COLOR: Color32 = Color32::from_rgb(0x1c, 0x1c, 0x1c);
    pub const EXTRA_BACKGROUND_COLOR: Color32 = Color32::from_rgb(0x2b, 0x2b, 0x2b);
    pub const BG_STROKE_COLOR: Color32 = Color32::from_rgb(0x3a, 0x3a, 0x3a);
    pub const ACCENT_COLOR: Color32 = Color32::from_rgb(0x00, 0x78, 0xd7);
    pub const LIGHT_ACCENT_COLOR: Color32 = Color32::from_rgb(0x42, 0x9c, 0xe3);
    pub const TEXT_COLOR: Color32 = Color32::WHITE;
    pub const ERROR_COLOR: Color32 = Color32::from_rgb(0xe8, 0x11, 0x23);
}

pub const SECTION_SPACING: f32 = 25.0;

/// Progress of work handed to the runtime
pub enum FetchStatus<T> {
    Fetching,
    Fetched(T),
}

