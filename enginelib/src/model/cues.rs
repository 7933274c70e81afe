use enginelib_blob::Color;

/// A named, colored jump-point at a sample offset.
#[derive(Debug, Clone, PartialEq)]
pub struct HotCue {
    pub label: String,
    pub sample_offset: f64,
    pub color: Color,
}

/// A named, colored `[start, end]` interval over sample offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub label: String,
    pub start_sample_offset: f64,
    pub end_sample_offset: f64,
    pub color: Color,
}

/// The colors hardware players light the eight performance pads up as.
pub const STANDARD_PAD_COLORS: [Color; 8] = [
    Color::new(0xFF, 0xEA, 0xC5, 0x32),
    Color::new(0xFF, 0xEA, 0x8F, 0x32),
    Color::new(0xFF, 0xB8, 0x55, 0xBF),
    Color::new(0xFF, 0xBA, 0x2A, 0x41),
    Color::new(0xFF, 0x86, 0xC6, 0x4B),
    Color::new(0xFF, 0x20, 0xC6, 0x7C),
    Color::new(0xFF, 0x00, 0xA8, 0xB1),
    Color::new(0xFF, 0x15, 0x8E, 0xE2),
];
