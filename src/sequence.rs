//! Register sequences
//!
//! The controller is programmed by replaying fixed lists of register writes.
//! Each list is data ([`Step`]s), so the byte stream sent to the panel can be
//! checked against the datasheet or a test without touching hardware.
//!
//! ## Example
//!
//! ```
//! use epd4in2::sequence::{InitSequence, Step};
//! use epd4in2::{command, Config};
//!
//! let init = InitSequence::new(&Config::default());
//! let steps = init.steps();
//! assert_eq!(steps[0], Step::command(command::SOFT_RESET));
//! assert_eq!(steps[1], Step::WaitReady);
//! assert_eq!(steps[5], Step::write(command::SET_RAM_X_RANGE, &[0x00, 0x31]));
//! ```

use crate::command::{
    BORDER_WAVEFORM, CTRL1_NORMAL, DATA_ENTRY_MODE, DISPLAY_UPDATE_CTRL1, SET_RAM_X_COUNTER,
    SET_RAM_X_RANGE, SET_RAM_Y_COUNTER, SET_RAM_Y_RANGE, SOFT_RESET,
};
use crate::config::{Config, Dimensions};

/// One entry of a register sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step<'a> {
    /// Send `command`, then `data` as one data block (skipped when empty)
    Write {
        /// Command byte
        command: u8,
        /// Payload bytes, in protocol order
        data: &'a [u8],
    },
    /// Block until BUSY is released
    WaitReady,
}

impl<'a> Step<'a> {
    /// A command with a payload
    pub const fn write(command: u8, data: &'a [u8]) -> Self {
        Self::Write { command, data }
    }

    /// A command without payload
    pub const fn command(command: u8) -> Self {
        Self::Write { command, data: &[] }
    }
}

/// RAM window covering the whole panel
///
/// X addresses are in bytes, Y addresses in rows; both count up from zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RamWindow {
    x_range: [u8; 2],
    y_range: [u8; 4],
    x_counter: [u8; 1],
    y_counter: [u8; 2],
}

impl RamWindow {
    /// Window spanning every pixel of `dims`
    pub fn full(dims: Dimensions) -> Self {
        // row_bytes() <= 50, so the X end always fits one byte. The fields are
        // public, so an empty geometry collapses to a one-cell window.
        let x_end = dims.row_bytes().saturating_sub(1) as u8;
        let [y_end_lo, y_end_hi] = dims.rows.saturating_sub(1).to_le_bytes();
        Self {
            x_range: [0x00, x_end],
            y_range: [0x00, 0x00, y_end_lo, y_end_hi],
            x_counter: [0x00],
            y_counter: [0x00, 0x00],
        }
    }

    /// Window range and address counter writes
    pub fn steps(&self) -> [Step<'_>; 4] {
        [
            Step::write(SET_RAM_X_RANGE, &self.x_range),
            Step::write(SET_RAM_Y_RANGE, &self.y_range),
            Step::write(SET_RAM_X_COUNTER, &self.x_counter),
            Step::write(SET_RAM_Y_COUNTER, &self.y_counter),
        ]
    }
}

/// Register programming run after the hardware reset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitSequence {
    ctrl1: [u8; 2],
    border: [u8; 1],
    data_entry: [u8; 1],
    window: RamWindow,
}

impl InitSequence {
    /// Build the sequence for `config`
    pub fn new(config: &Config) -> Self {
        Self {
            ctrl1: config.display_update_ctrl1,
            border: [config.border_waveform],
            data_entry: [config.data_entry_mode],
            window: RamWindow::full(config.dimensions),
        }
    }

    /// Soft reset, update control, border, entry mode, RAM window
    pub fn steps(&self) -> [Step<'_>; 10] {
        let [x_range, y_range, x_counter, y_counter] = self.window.steps();
        [
            Step::command(SOFT_RESET),
            Step::WaitReady,
            Step::write(DISPLAY_UPDATE_CTRL1, &self.ctrl1),
            Step::write(BORDER_WAVEFORM, &self.border),
            Step::write(DATA_ENTRY_MODE, &self.data_entry),
            x_range,
            y_range,
            x_counter,
            y_counter,
            Step::WaitReady,
        ]
    }
}

/// Register reprogramming run before every partial update
///
/// A reduced init: border waveform and RAM window only, so the loaded LUT
/// survives between partial updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartialSequence {
    ctrl1: [u8; 2],
    border: [u8; 1],
    window: RamWindow,
}

impl PartialSequence {
    /// Build the sequence for `config`
    pub fn new(config: &Config) -> Self {
        Self {
            ctrl1: [CTRL1_NORMAL, 0x00],
            border: [config.partial_border_waveform],
            window: RamWindow::full(config.dimensions),
        }
    }

    /// Border, update control (compare both RAMs), border, RAM window
    pub fn steps(&self) -> [Step<'_>; 7] {
        let [x_range, y_range, x_counter, y_counter] = self.window.steps();
        [
            Step::write(BORDER_WAVEFORM, &self.border),
            Step::write(DISPLAY_UPDATE_CTRL1, &self.ctrl1),
            Step::write(BORDER_WAVEFORM, &self.border),
            x_range,
            y_range,
            x_counter,
            y_counter,
        ]
    }
}
