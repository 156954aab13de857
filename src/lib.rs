//! 4.2" E-Paper Display Driver
//!
//! A driver for 400x300 bi-color e-paper panels on an SSD1683-class controller.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Full, fast, partial and 4-gray refresh modes
//! - Bounded busy-wait with a configurable timeout
//! - Custom LUT support
//! - Rotation support
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     prelude::*,
//!     text::Text,
//! };
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::SpiBus;
//! use epd4in2::{Builder, Color, Display, Framebuffer, Interface, Rotation};
//!
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiBus for MockSpi {
//! #     fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer(&mut self, _r: &mut [u8], _w: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let cs = MockPin;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let busy = MockPin;
//! # let mut delay = MockDelay;
//! let interface = match Interface::new(spi, cs, dc, rst, busy) {
//!     Ok(interface) => interface,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().busy_timeout_ms(10_000).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(interface, config);
//! let _ = display.init(&mut delay);
//! let _ = display.clear(&mut delay);
//!
//! let mut storage = [0u8; 15_000];
//! let mut fb = match Framebuffer::new(&mut storage[..], *display.dimensions(), Rotation::Rotate0) {
//!     Ok(fb) => fb,
//!     Err(_) => return,
//! };
//! fb.clear(Color::White);
//! let _ = Text::new(
//!     "Hello World",
//!     Point::new(30, 10),
//!     MonoTextStyle::new(&FONT_6X10, Color::Black),
//! )
//! .draw(&mut fb);
//!
//! let _ = display.display(fb.buffer(), &mut delay);
//! let _ = display.sleep(&mut delay);
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Pixel sources and the wire format
pub mod buffer;
/// Color type for the black/white panel
pub mod color;
/// Controller command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Hardware interface abstraction
pub mod interface;
/// Look-Up Tables for refresh modes
pub mod lut;
/// Coordinate rotation utilities
pub mod rotation;
/// Register sequences
pub mod sequence;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use buffer::{PackedBuffer, PixelSource, pack_into, wire_size};
#[cfg(any(test, feature = "alloc"))]
pub use buffer::to_wire_format;
pub use color::Color;
pub use config::{
    Builder, Config, DEFAULT_BUSY_POLL_INTERVAL_MS, DEFAULT_BUSY_TIMEOUT_MS,
    DEFAULT_SLEEP_SETTLE_MS, Dimensions, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS, PANEL_HEIGHT,
    PANEL_WIDTH, RefreshControl, Rotation,
};
pub use display::{Display, PowerState, RefreshMode};
pub use error::{BufferSizeError, BuilderError, Error};
pub use interface::{DisplayInterface, Interface, InterfaceError, SPI_FREQUENCY_HZ, SPI_MODE};

#[cfg(feature = "graphics")]
pub use graphics::Framebuffer;
