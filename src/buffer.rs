//! Pixel sources and the wire format
//!
//! The controller takes one bit per pixel, rows top to bottom, each row
//! padded to whole bytes, most significant bit first. A cleared bit is
//! black, a set bit white:
//!
//! ```text
//! byte  = x / 8 + y * ceil(width / 8)
//! mask  = 0x80 >> (x % 8)
//! ```
//!
//! Anything that can answer "is `(x, y)` black?" implements [`PixelSource`].
//! Sources that already hold packed bytes ([`PackedBuffer`],
//! [`Framebuffer`](crate::graphics::Framebuffer)) expose them through
//! [`PixelSource::packed`] so conversion can skip the per-pixel walk.
//!
//! ## Example
//!
//! ```
//! use epd4in2::buffer::{from_fn, pack_into, wire_size};
//!
//! // 16x2 checkerboard
//! let source = from_fn(16, 2, |x, y| (x + y) % 2 == 0);
//! let mut out = [0u8; 4];
//! assert_eq!(wire_size(16, 2), out.len());
//! pack_into(&source, &mut out).unwrap();
//! assert_eq!(out, [0x55, 0x55, 0xAA, 0xAA]);
//! ```

use crate::error::BufferSizeError;

/// Anything addressable by `(x, y)` that yields black or white
pub trait PixelSource {
    /// Width in pixels
    fn width(&self) -> u16;

    /// Height in pixels
    fn height(&self) -> u16;

    /// Whether the pixel at `(x, y)` is black
    ///
    /// Only called with `x < width()` and `y < height()`.
    fn is_black(&self, x: u16, y: u16) -> bool;

    /// The source's bytes if it is already in wire format
    fn packed(&self) -> Option<&[u8]> {
        None
    }
}

/// Bytes needed for a `width` x `height` image: `ceil(width / 8) * height`
pub fn wire_size(width: u16, height: u16) -> usize {
    (width as usize).div_ceil(8) * height as usize
}

/// Byte index and bit mask of pixel `(x, y)` in a row-padded buffer
pub fn pixel_location(x: u32, y: u32, width: u32) -> (usize, u8) {
    let stride = width.div_ceil(8);
    let index = (x / 8 + y * stride) as usize;
    (index, 0x80 >> (x % 8))
}

/// Pre-packed bytes viewed as a pixel source
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackedBuffer<'a> {
    data: &'a [u8],
    width: u16,
    height: u16,
}

impl<'a> PackedBuffer<'a> {
    /// Wrap `data` holding a `width` x `height` image
    ///
    /// # Errors
    ///
    /// Returns [`BufferSizeError`] if `data` is not exactly [`wire_size`] bytes.
    pub fn new(data: &'a [u8], width: u16, height: u16) -> Result<Self, BufferSizeError> {
        let expected = wire_size(width, height);
        if data.len() != expected {
            return Err(BufferSizeError {
                expected,
                provided: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// The wrapped bytes
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }
}

impl PixelSource for PackedBuffer<'_> {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn is_black(&self, x: u16, y: u16) -> bool {
        let (index, bit) = pixel_location(x as u32, y as u32, self.width as u32);
        self.data[index] & bit == 0
    }

    fn packed(&self) -> Option<&[u8]> {
        Some(self.data)
    }
}

/// Pixel source backed by a closure returning `true` for black
#[derive(Clone, Copy, Debug)]
pub struct FnSource<F> {
    width: u16,
    height: u16,
    pixel: F,
}

/// Build a [`FnSource`] of `width` x `height` pixels
pub fn from_fn<F>(width: u16, height: u16, pixel: F) -> FnSource<F>
where
    F: Fn(u16, u16) -> bool,
{
    FnSource {
        width,
        height,
        pixel,
    }
}

impl<F> PixelSource for FnSource<F>
where
    F: Fn(u16, u16) -> bool,
{
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn is_black(&self, x: u16, y: u16) -> bool {
        (self.pixel)(x, y)
    }
}

/// Pack `source` into `out`
///
/// `out` is filled white, then the bit of every black pixel is cleared.
/// Sources that are already packed are copied as-is.
///
/// # Errors
///
/// Returns [`BufferSizeError`] if `out` is not exactly [`wire_size`] bytes.
pub fn pack_into<S>(source: &S, out: &mut [u8]) -> Result<(), BufferSizeError>
where
    S: PixelSource + ?Sized,
{
    let expected = wire_size(source.width(), source.height());
    if out.len() != expected {
        return Err(BufferSizeError {
            expected,
            provided: out.len(),
        });
    }

    match source.packed() {
        Some(bytes) if bytes.len() == expected => out.copy_from_slice(bytes),
        _ => pack_pixels(source, out),
    }
    Ok(())
}

fn pack_pixels<S>(source: &S, out: &mut [u8])
where
    S: PixelSource + ?Sized,
{
    let width = source.width();
    out.fill(0xFF);
    for y in 0..source.height() {
        for x in 0..width {
            if source.is_black(x, y) {
                let (index, bit) = pixel_location(x as u32, y as u32, width as u32);
                out[index] &= !bit;
            }
        }
    }
}

/// Convert `source` to the wire format
///
/// Packed sources of the right size are passed through without copying;
/// anything else is packed into a new buffer of [`wire_size`] bytes.
#[cfg(any(test, feature = "alloc"))]
pub fn to_wire_format<S>(source: &S) -> alloc::borrow::Cow<'_, [u8]>
where
    S: PixelSource + ?Sized,
{
    use alloc::borrow::Cow;

    let expected = wire_size(source.width(), source.height());
    if let Some(bytes) = source.packed() {
        if bytes.len() == expected {
            return Cow::Borrowed(bytes);
        }
    }
    let mut out = alloc::vec![0xFF; expected];
    pack_pixels(source, &mut out);
    Cow::Owned(out)
}
