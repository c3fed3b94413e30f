//! Where each field goes on the template.
//!
//! Coordinates are in PDF points measured from the top-left corner of the page
//! and mark the text baseline. They match one specific template artwork and
//! must not be changed independently of it.

/// Zero-based index of the page that receives the fields.
pub const TARGET_PAGE: usize = 1;

/// RGB fill colour of the stamped text (white).
pub const TEXT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Position and size of one line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub x: f32,
    pub y: f32,
    pub font_size: u32,
}

impl TextPlacement {
    pub const fn new(x: f32, y: f32, font_size: u32) -> Self {
        Self { x, y, font_size }
    }
}

pub const SUM: TextPlacement = TextPlacement::new(165.0, 245.0, 20);
pub const VALID_UNTIL: TextPlacement = TextPlacement::new(180.0, 285.0, 20);
pub const SERIAL: TextPlacement = TextPlacement::new(20.0, 420.0, 10);

/// Text printed for the serial number, e.g. `#42`.
pub fn serial_label(serial: &str) -> String {
    format!("#{serial}")
}
