//! Controller command definitions
//!
//! Command bytes understood by the panel's controller. Commands are framed
//! with the DC line low, their payload bytes with DC high; see
//! [`DisplayInterface`](crate::DisplayInterface) for the framing rules.
//!
//! ## Example
//!
//! ```rust,no_run
//! use epd4in2::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::SpiBus;
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
//! # let mut interface = match Interface::new(MockSpi, MockPin, MockPin, MockPin, MockPin) {
//! #     Ok(interface) => interface,
//! #     Err(_) => return,
//! # };
//! // Point the RAM address counters at the first byte
//! let _ = interface.send_command(command::SET_RAM_X_COUNTER);
//! let _ = interface.send_data(&[0x00]);
//! let _ = interface.send_command(command::SET_RAM_Y_COUNTER);
//! let _ = interface.send_data(&[0x00, 0x00]);
//!
//! // Then stream eight white pixels into the new-image plane
//! let _ = interface.send_command(command::WRITE_RAM_BW);
//! let _ = interface.send_data(&[0xFF]);
//! ```

// Controller state

/// Software reset (0x12), no payload
///
/// Returns every register to its power-on value; wait for BUSY afterwards.
pub const SOFT_RESET: u8 = 0x12;

/// Deep sleep (0x07)
///
/// One payload byte, [`DEEP_SLEEP_ENTER`]. The controller then ignores the
/// bus until RST is pulsed.
pub const DEEP_SLEEP: u8 = 0x07;

/// [`DEEP_SLEEP`] payload
pub const DEEP_SLEEP_ENTER: u8 = 0x01;

/// Border waveform (0x3C), one byte
pub const BORDER_WAVEFORM: u8 = 0x3C;

// Addressing

/// Data entry mode (0x11), one byte
///
/// Low two bits pick the X/Y increment direction, bit 2 which counter
/// advances first. `0x03` walks rows left to right, top to bottom.
pub const DATA_ENTRY_MODE: u8 = 0x11;

/// RAM X window (0x44): `[start, end]`, in bytes of eight pixels
pub const SET_RAM_X_RANGE: u8 = 0x44;

/// RAM Y window (0x45): `[start_lo, start_hi, end_lo, end_hi]`, in rows
pub const SET_RAM_Y_RANGE: u8 = 0x45;

/// RAM X address counter (0x4E): `[byte]`
pub const SET_RAM_X_COUNTER: u8 = 0x4E;

/// RAM Y address counter (0x4F): `[row_lo, row_hi]`
pub const SET_RAM_Y_COUNTER: u8 = 0x4F;

// Image RAM

/// Write the new-image plane (0x24)
///
/// Followed by one data block of packed pixels, a cleared bit being black.
pub const WRITE_RAM_BW: u8 = 0x24;

/// Write the old-image plane (0x26)
///
/// The differential waveforms compare it against the new image.
pub const WRITE_RAM_RED: u8 = 0x26;

// Update

/// Display update control 1 (0x21): `[ram_option, source_mode]`
pub const DISPLAY_UPDATE_CTRL1: u8 = 0x21;

/// Display update control 2 (0x22), one byte choosing the update sequence
///
/// See [`RefreshControl`](crate::RefreshControl) for the values in use.
pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22;

/// Run the sequence chosen through [`DISPLAY_UPDATE_CTRL2`] (0x20)
///
/// BUSY stays asserted until the panel has finished updating.
pub const MASTER_ACTIVATION: u8 = 0x20;

/// [`DISPLAY_UPDATE_CTRL1`] RAM option: ignore the old-image plane
pub const CTRL1_BYPASS_RED: u8 = 0x40;

/// [`DISPLAY_UPDATE_CTRL1`] RAM option: use both planes
pub const CTRL1_NORMAL: u8 = 0x00;

// Waveform

/// Waveform LUT (0x32), the first 227 bytes of a table
pub const WRITE_LUT: u8 = 0x32;

/// LUT end option (0x3F), one byte
pub const LUT_END_OPTION: u8 = 0x3F;

/// Gate driving voltage (0x03), one byte
pub const GATE_VOLTAGE: u8 = 0x03;

/// Source driving voltages VSH1, VSH2, VSL (0x04), three bytes
pub const SOURCE_VOLTAGE: u8 = 0x04;

/// VCOM level (0x2C), one byte
pub const WRITE_VCOM: u8 = 0x2C;
