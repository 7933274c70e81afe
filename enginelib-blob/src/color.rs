/// An ARGB color, as lit up on a hardware performance pad.
///
/// The alpha channel is typically not used and is set to full brightness
/// by the reference hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color { a, r, g, b }
    }
}
