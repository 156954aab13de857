//! Look-Up Tables for refresh modes
//!
//! The waveform table is one 233-byte blob consumed positionally by five
//! commands:
//!
//! | Bytes     | Command                                   |
//! |-----------|-------------------------------------------|
//! | 0..=226   | [`WRITE_LUT`] (0x32), waveform phases     |
//! | 227       | [`LUT_END_OPTION`] (0x3F)                 |
//! | 228       | [`GATE_VOLTAGE`] (0x03)                   |
//! | 229..=231 | [`SOURCE_VOLTAGE`] (0x04), VSH1/VSH2/VSL  |
//! | 232       | [`WRITE_VCOM`] (0x2C)                     |
//!
//! A LUT must be loaded before the fast, partial and 4-gray refresh
//! sequences are used. Full refresh runs from the controller's OTP waveform.
//!
//! ## Example
//!
//! ```
//! use epd4in2::lut::{lut_steps, LUT_ALL, LUT_SIZE};
//! use epd4in2::sequence::Step;
//!
//! let steps = lut_steps(&LUT_ALL);
//! let consumed: usize = steps
//!     .iter()
//!     .map(|step| match step {
//!         Step::Write { data, .. } => data.len(),
//!         Step::WaitReady => 0,
//!     })
//!     .sum();
//! assert_eq!(consumed, LUT_SIZE);
//! ```

use crate::command::{GATE_VOLTAGE, LUT_END_OPTION, SOURCE_VOLTAGE, WRITE_LUT, WRITE_VCOM};
use crate::sequence::Step;

/// Total LUT size in bytes
pub const LUT_SIZE: usize = 233;

/// Bytes of the table sent with [`WRITE_LUT`]
pub const WAVEFORM_LEN: usize = 227;

const END_OPTION_AT: usize = 227;
const GATE_VOLTAGE_AT: usize = 228;
const SOURCE_VOLTAGE_AT: usize = 229;
const VCOM_AT: usize = 232;

/// Waveform table for the fast, partial and 4-gray refresh sequences
#[rustfmt::skip]
pub const LUT_ALL: [u8; LUT_SIZE] = [
    0x01, 0x0A, 0x1B, 0x0F, 0x03, 0x01, 0x01,
    0x05, 0x0A, 0x01, 0x0A, 0x01, 0x01, 0x01,
    0x05, 0x08, 0x03, 0x02, 0x04, 0x01, 0x01,
    0x01, 0x04, 0x04, 0x02, 0x00, 0x01, 0x01,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01,
    0x01, 0x0A, 0x1B, 0x0F, 0x03, 0x01, 0x01,
    0x05, 0x4A, 0x01, 0x8A, 0x01, 0x01, 0x01,
    0x05, 0x48, 0x03, 0x82, 0x84, 0x01, 0x01,
    0x01, 0x84, 0x84, 0x82, 0x00, 0x01, 0x01,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01,
    0x01, 0x0A, 0x1B, 0x8F, 0x03, 0x01, 0x01,
    0x05, 0x4A, 0x01, 0x8A, 0x01, 0x01, 0x01,
    0x05, 0x48, 0x83, 0x82, 0x04, 0x01, 0x01,
    0x01, 0x04, 0x04, 0x02, 0x00, 0x01, 0x01,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01,
    0x01, 0x8A, 0x1B, 0x8F, 0x03, 0x01, 0x01,
    0x05, 0x4A, 0x01, 0x8A, 0x01, 0x01, 0x01,
    0x05, 0x48, 0x83, 0x02, 0x04, 0x01, 0x01,
    0x01, 0x04, 0x04, 0x02, 0x00, 0x01, 0x01,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01,
    0x01, 0x8A, 0x9B, 0x8F, 0x03, 0x01, 0x01,
    0x05, 0x4A, 0x01, 0x8A, 0x01, 0x01, 0x01,
    0x05, 0x48, 0x03, 0x42, 0x04, 0x01, 0x01,
    0x01, 0x04, 0x04, 0x42, 0x00, 0x01, 0x01,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x02, 0x00, 0x00, 0x07, 0x17, 0x41, 0xA8,
    0x32, 0x30,
];

/// Split a LUT into the five register writes that load it
pub fn lut_steps(lut: &[u8; LUT_SIZE]) -> [Step<'_>; 5] {
    [
        Step::write(WRITE_LUT, &lut[..WAVEFORM_LEN]),
        Step::write(LUT_END_OPTION, &lut[END_OPTION_AT..GATE_VOLTAGE_AT]),
        Step::write(GATE_VOLTAGE, &lut[GATE_VOLTAGE_AT..SOURCE_VOLTAGE_AT]),
        Step::write(SOURCE_VOLTAGE, &lut[SOURCE_VOLTAGE_AT..VCOM_AT]),
        Step::write(WRITE_VCOM, &lut[VCOM_AT..]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_lut_steps_commands_in_order() {
        let commands: Vec<u8> = lut_steps(&LUT_ALL)
            .iter()
            .filter_map(|step| match step {
                Step::Write { command, .. } => Some(*command),
                Step::WaitReady => None,
            })
            .collect();
        assert_eq!(commands, [0x32, 0x3F, 0x03, 0x04, 0x2C]);
    }

    #[test]
    fn test_lut_steps_consume_every_byte_once() {
        let mut replayed = Vec::new();
        for step in lut_steps(&LUT_ALL) {
            if let Step::Write { data, .. } = step {
                replayed.extend_from_slice(data);
            }
        }
        assert_eq!(replayed, LUT_ALL);
    }

    #[test]
    fn test_voltage_bytes() {
        let steps = lut_steps(&LUT_ALL);
        assert_eq!(steps[1], Step::write(LUT_END_OPTION, &[0x07]));
        assert_eq!(steps[2], Step::write(GATE_VOLTAGE, &[0x17]));
        assert_eq!(steps[3], Step::write(SOURCE_VOLTAGE, &[0x41, 0xA8, 0x32]));
        assert_eq!(steps[4], Step::write(WRITE_VCOM, &[0x30]));
    }
}
