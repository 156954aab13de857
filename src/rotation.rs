//! Coordinate rotation utilities
//!
//! A rotated [`Framebuffer`](crate::graphics::Framebuffer) is drawn in
//! logical coordinates but stored in the panel's physical layout, so it can
//! be sent without any transposition. The functions here do the mapping.
//!
//! | Rotation    | Logical size  | Logical `(0, 0)` lands on |
//! |-------------|---------------|---------------------------|
//! | `Rotate0`   | `w x h`       | top-left                  |
//! | `Rotate90`  | `h x w`       | top-right                 |
//! | `Rotate180` | `w x h`       | bottom-right              |
//! | `Rotate270` | `h x w`       | bottom-left               |
//!
//! ## Example
//!
//! ```
//! use epd4in2::{rotation::apply_rotation, Rotation};
//!
//! // Portrait on the 400x300 panel: logical origin is the physical
//! // top-right pixel, the last bit of the first row
//! let (index, mask) = apply_rotation(0, 0, 400, 300, Rotation::Rotate90);
//! assert_eq!((index, mask), (49, 0x01));
//! ```

use crate::buffer::pixel_location;
use crate::config::Rotation;

/// Buffer byte index and bit mask for logical pixel `(x, y)`
///
/// `width` and `height` are the physical panel size. The caller keeps
/// `(x, y)` inside [`rotated_size`].
pub fn apply_rotation(x: u32, y: u32, width: u32, height: u32, rotation: Rotation) -> (usize, u8) {
    let (col, row) = match rotation {
        Rotation::Rotate0 => (x, y),
        Rotation::Rotate90 => (width - 1 - y, x),
        Rotation::Rotate180 => (width - 1 - x, height - 1 - y),
        Rotation::Rotate270 => (y, height - 1 - x),
    };
    pixel_location(col, row, width)
}

/// Logical `(width, height)` of a `width` x `height` panel under `rotation`
pub fn rotated_size(width: u32, height: u32, rotation: Rotation) -> (u32, u32) {
    match rotation {
        Rotation::Rotate0 | Rotation::Rotate180 => (width, height),
        Rotation::Rotate90 | Rotation::Rotate270 => (height, width),
    }
}
