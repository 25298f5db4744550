//! RGBA colors and their packed word forms.

use bytemuck::{Pod, Zeroable};

/// An 8-bit RGBA color.
///
/// Packed words store the channels big-endian: red in the most significant
/// byte, alpha (or an unused byte for RGB words) in the least significant one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    /// Red component.
    pub red: u8,
    /// Green component.
    pub green: u8,
    /// Blue component.
    pub blue: u8,
    /// Alpha component.
    pub alpha: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a new opaque color.
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self::with_alpha(red, green, blue, 255)
    }

    /// Create a new color with an explicit alpha value.
    pub const fn with_alpha(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Create an opaque gray color.
    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Unpack a `0xRRGGBBAA` word.
    pub const fn from_rgba(value: u32) -> Self {
        let [red, green, blue, alpha] = value.to_be_bytes();
        Self::with_alpha(red, green, blue, alpha)
    }

    /// Unpack a `0xRRGGBBxx` word. The low byte is ignored and the color is
    /// opaque.
    pub const fn from_rgb(value: u32) -> Self {
        let [red, green, blue, _] = value.to_be_bytes();
        Self::new(red, green, blue)
    }

    /// Pack into a `0xRRGGBBAA` word.
    pub const fn to_rgba(self) -> u32 {
        u32::from_be_bytes([self.red, self.green, self.blue, self.alpha])
    }

    /// Pack into a `0xRRGGBB00` word.
    pub const fn to_rgb(self) -> u32 {
        u32::from_be_bytes([self.red, self.green, self.blue, 0])
    }

    /// The sum of the three color channels.
    pub(crate) fn intensity(self) -> u32 {
        self.red as u32 + self.green as u32 + self.blue as u32
    }

    /// Squared euclidean distance between the RGB parts of two colors.
    pub(crate) fn distance_sq(self, other: Self) -> u32 {
        let dr = self.red as i32 - other.red as i32;
        let dg = self.green as i32 - other.green as i32;
        let db = self.blue as i32 - other.blue as i32;

        (dr * dr + dg * dg + db * db) as u32
    }

    /// Whether the RGB parts of two colors are equal, ignoring alpha.
    pub(crate) fn same_rgb(self, other: Self) -> bool {
        self.red == other.red && self.green == other.green && self.blue == other.blue
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<[u8; 4]> for Color {
    fn from([red, green, blue, alpha]: [u8; 4]) -> Self {
        Self::with_alpha(red, green, blue, alpha)
    }
}

impl From<Color> for [u8; 4] {
    fn from(c: Color) -> Self {
        [c.red, c.green, c.blue, c.alpha]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_word() {
        assert_eq!(Color::from_rgba(0xFF00_00FF), Color::new(255, 0, 0));
        assert_eq!(
            Color::from_rgba(0x0102_0304),
            Color::with_alpha(1, 2, 3, 4)
        );
        assert_eq!(Color::with_alpha(1, 2, 3, 4).to_rgba(), 0x0102_0304);
    }

    #[test]
    fn rgb_word_forces_opaque() {
        let c = Color::from_rgb(0x0A14_1E00);
        assert_eq!(c, Color::with_alpha(10, 20, 30, 255));

        let c = Color::from_rgb(0x0A14_1E7F);
        assert_eq!(c.alpha, 255);
        assert_eq!(c.to_rgb(), 0x0A14_1E00);
    }

    #[test]
    fn default_is_opaque_black() {
        assert_eq!(Color::default(), Color::with_alpha(0, 0, 0, 255));
    }

    #[test]
    fn byte_view() {
        let colors = [Color::new(1, 2, 3), Color::with_alpha(4, 5, 6, 7)];
        let bytes: &[u8] = bytemuck::cast_slice(&colors);
        assert_eq!(bytes, &[1, 2, 3, 255, 4, 5, 6, 7]);
    }

    #[test]
    fn distance() {
        assert_eq!(Color::BLACK.distance_sq(Color::new(1, 2, 2)), 9);
        assert!(Color::new(1, 2, 3).same_rgb(Color::with_alpha(1, 2, 3, 0)));
    }
}
