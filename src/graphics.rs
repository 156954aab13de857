//! Graphics support via embedded-graphics
//!
//! This module provides [`Framebuffer`], a packed 1-bit image that implements
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget). Its storage
//! is already in the panel's wire format, so it can be handed to
//! [`Display::display`](crate::Display::display) directly, or used anywhere a
//! [`PixelSource`] is accepted.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     prelude::*,
//!     primitives::{Line, PrimitiveStyle, Rectangle},
//!     text::Text,
//! };
//! use epd4in2::{Color, Dimensions, Framebuffer, Rotation};
//!
//! let dims = Dimensions::panel();
//! let mut storage = vec![0u8; dims.buffer_size()];
//! let mut fb = match Framebuffer::new(storage.as_mut_slice(), dims, Rotation::Rotate0) {
//!     Ok(fb) => fb,
//!     Err(_) => return,
//! };
//!
//! fb.clear(Color::White);
//!
//! let _ = Text::new(
//!     "Hello World",
//!     Point::new(30, 10),
//!     MonoTextStyle::new(&FONT_6X10, Color::Black),
//! )
//! .draw(&mut fb);
//!
//! let _ = Line::new(Point::new(30, 70), Point::new(40, 80))
//!     .into_styled(PrimitiveStyle::with_stroke(Color::Black, 1))
//!     .draw(&mut fb);
//!
//! let _ = Rectangle::new(Point::new(30, 110), Size::new(10, 10))
//!     .into_styled(PrimitiveStyle::with_fill(Color::Black))
//!     .draw(&mut fb);
//!
//! // fb.buffer() is ready for Display::display
//! assert_eq!(fb.buffer().len(), 15_000);
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    prelude::Pixel,
};

use crate::buffer::{PixelSource, pixel_location};
use crate::color::Color;
use crate::config::{Dimensions, Rotation};
use crate::error::BufferSizeError;
use crate::rotation::{apply_rotation, rotated_size};

/// Packed black/white image in the panel's wire format
///
/// ## Type Parameters
///
/// * `B` - Storage implementing `AsRef<[u8]>` and `AsMut<[u8]>`
///   (a slice, an array, or a `Vec`)
#[derive(Clone, Debug)]
pub struct Framebuffer<B> {
    /// Packed pixels, physical orientation
    buffer: B,
    /// Physical panel geometry
    dimensions: Dimensions,
    /// Drawing rotation relative to the panel
    rotation: Rotation,
}

impl<B> Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wrap `buffer` as an image of `dimensions`
    ///
    /// The buffer is used as-is; call [`clear`](Self::clear) to start blank.
    ///
    /// # Errors
    ///
    /// Returns [`BufferSizeError`] unless the buffer is exactly
    /// `dimensions.buffer_size()` bytes. The size is always calculated from
    /// **physical** (unrotated) dimensions regardless of rotation.
    pub fn new(
        buffer: B,
        dimensions: Dimensions,
        rotation: Rotation,
    ) -> Result<Self, BufferSizeError> {
        let expected = dimensions.buffer_size();
        let provided = buffer.as_ref().len();
        if provided != expected {
            return Err(BufferSizeError { expected, provided });
        }
        Ok(Self {
            buffer,
            dimensions,
            rotation,
        })
    }

    /// Fill the whole image with `color`
    pub fn clear(&mut self, color: Color) {
        self.buffer.as_mut().fill(color.byte());
    }

    /// Set the pixel at logical `(x, y)`; out-of-bounds pixels are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let Some((index, bit)) = self.locate(x, y) else {
            return;
        };
        let byte = &mut self.buffer.as_mut()[index];
        match color {
            Color::Black => *byte &= !bit,
            Color::White => *byte |= bit,
        }
    }

    /// Color of the pixel at logical `(x, y)`, `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let (index, bit) = self.locate(x, y)?;
        Some(Color::from_bit(self.buffer.as_ref()[index] & bit != 0))
    }

    /// The packed bytes
    pub fn buffer(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    /// Physical panel geometry
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Drawing rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Give back the storage
    pub fn into_inner(self) -> B {
        self.buffer
    }

    fn locate(&self, x: u32, y: u32) -> Option<(usize, u8)> {
        let width = self.dimensions.cols as u32;
        let height = self.dimensions.rows as u32;
        let (logical_w, logical_h) = rotated_size(width, height, self.rotation);
        if x >= logical_w || y >= logical_h {
            return None;
        }
        Some(apply_rotation(x, y, width, height, self.rotation))
    }
}

#[cfg(any(test, feature = "alloc"))]
impl Framebuffer<alloc::vec::Vec<u8>> {
    /// Allocate an all-white image of `dimensions`
    pub fn new_white(dimensions: Dimensions, rotation: Rotation) -> Self {
        Self {
            buffer: alloc::vec![Color::White.byte(); dimensions.buffer_size()],
            dimensions,
            rotation,
        }
    }
}

impl<B> DrawTarget for Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }
            self.set_pixel(x as u32, y as u32, color);
        }

        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        Framebuffer::clear(self, color);
        Ok(())
    }
}

impl<B> OriginDimensions for Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        let (width, height) = rotated_size(
            self.dimensions.cols as u32,
            self.dimensions.rows as u32,
            self.rotation,
        );
        Size::new(width, height)
    }
}

/// Seen as a pixel source the framebuffer is in physical orientation
impl<B> PixelSource for Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn width(&self) -> u16 {
        self.dimensions.cols
    }

    fn height(&self) -> u16 {
        self.dimensions.rows
    }

    fn is_black(&self, x: u16, y: u16) -> bool {
        let (index, bit) = pixel_location(x as u32, y as u32, self.dimensions.cols as u32);
        self.buffer.as_ref()[index] & bit == 0
    }

    fn packed(&self) -> Option<&[u8]> {
        Some(self.buffer.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{from_fn, pack_into};
    use crate::config::Dimensions;
    use alloc::vec;
    use alloc::vec::Vec;
    use embedded_graphics::{
        prelude::*,
        primitives::{PrimitiveStyle, Rectangle},
    };

    fn panel_fb(rotation: Rotation) -> Framebuffer<Vec<u8>> {
        let dims = Dimensions::panel();
        let mut fb = Framebuffer::new(vec![0u8; dims.buffer_size()], dims, rotation).unwrap();
        fb.clear(Color::White);
        fb
    }

    #[test]
    fn test_new_rejects_wrong_size() {
        let dims = Dimensions::panel();
        let result = Framebuffer::new(vec![0u8; 100], dims, Rotation::Rotate0);
        assert!(matches!(
            result,
            Err(BufferSizeError {
                expected: 15_000,
                provided: 100
            })
        ));
    }

    #[test]
    fn test_size_follows_rotation() {
        assert_eq!(panel_fb(Rotation::Rotate0).size(), Size::new(400, 300));
        assert_eq!(panel_fb(Rotation::Rotate90).size(), Size::new(300, 400));
    }

    #[test]
    fn test_set_pixel_clears_bit() {
        let mut fb = panel_fb(Rotation::Rotate0);
        fb.set_pixel(30, 10, Color::Black);
        assert_eq!(fb.buffer()[10 * 50 + 3], 0xFF & !(0x80 >> 6));
        assert_eq!(fb.pixel(30, 10), Some(Color::Black));
        assert_eq!(fb.pixel(31, 10), Some(Color::White));
        assert_eq!(fb.pixel(400, 0), None);

        fb.set_pixel(30, 10, Color::White);
        assert!(fb.buffer().iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn test_draw_rectangle_matches_reference_packing() {
        let mut fb = panel_fb(Rotation::Rotate0);
        Rectangle::new(Point::new(30, 110), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(Color::Black))
            .draw(&mut fb)
            .unwrap();

        let reference = from_fn(400, 300, |x, y| (30..40).contains(&x) && (110..120).contains(&y));
        let mut expected = vec![0u8; 15_000];
        pack_into(&reference, &mut expected).unwrap();
        assert_eq!(fb.buffer(), expected.as_slice());
    }

    #[test]
    fn test_draw_ignores_out_of_bounds() {
        let mut fb = panel_fb(Rotation::Rotate0);
        Rectangle::new(Point::new(-5, -5), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(Color::Black))
            .draw(&mut fb)
            .unwrap();
        Rectangle::new(Point::new(400, 300), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(Color::Black))
            .draw(&mut fb)
            .unwrap();
        assert!(fb.buffer().iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn test_rotated_drawing_lands_in_physical_buffer() {
        let mut fb = panel_fb(Rotation::Rotate180);
        fb.set_pixel(0, 0, Color::Black);
        // Logical origin is the physical bottom-right pixel
        assert!(fb.is_black(399, 299));
        assert_eq!(fb.buffer()[14_999], 0xFE);
    }

    #[test]
    fn test_pixel_source_is_pass_through() {
        let fb = panel_fb(Rotation::Rotate0);
        let packed = fb.packed().unwrap();
        assert!(core::ptr::eq(packed.as_ptr(), fb.buffer().as_ptr()));
    }

    #[test]
    fn test_clear_via_draw_target() {
        let mut fb = panel_fb(Rotation::Rotate0);
        DrawTarget::clear(&mut fb, Color::Black).unwrap();
        assert!(fb.buffer().iter().all(|b| *b == 0x00));
    }
}
