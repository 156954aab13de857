//! Color type for the black/white panel
//!
//! Pixels are stored one bit each in the wire format:
//!
//! | Color | Bit | Fill byte |
//! |-------|-----|-----------|
//! | Black | 0   | 0x00      |
//! | White | 1   | 0xFF      |
//!
//! ## Example
//!
//! ```
//! use epd4in2::Color;
//!
//! assert_eq!(Color::Black.byte(), 0x00);
//! assert_eq!(Color::White.byte(), 0xFF);
//! assert!(Color::Black.is_black());
//! ```

/// Colors supported by the panel
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Black pixels
    Black,
    /// White pixels
    #[default]
    White,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU1;
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    /// `On` draws ink, so it maps to black
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        match color {
            embedded_graphics_core::pixelcolor::BinaryColor::On => Self::Black,
            embedded_graphics_core::pixelcolor::BinaryColor::Off => Self::White,
        }
    }
}

impl Color {
    /// Byte with all eight pixels set to this color
    pub fn byte(self) -> u8 {
        match self {
            Self::Black => 0x00,
            Self::White => 0xFF,
        }
    }

    /// Whether this color clears the pixel bit
    pub fn is_black(self) -> bool {
        self == Self::Black
    }

    /// Color of a pixel given its bit value in the wire format
    pub fn from_bit(set: bool) -> Self {
        if set { Self::White } else { Self::Black }
    }
}
