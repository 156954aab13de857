//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`]),
//! buffer conversion ([`BufferSizeError`]) and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`BufferSizeError`] - A packed buffer does not match the panel geometry
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! None of the panel operations can be resumed halfway through: after any
//! [`Error`] the controller state is unknown and the caller should run
//! [`Display::init`](crate::Display::init) again.
//!
//! ## Example
//!
//! ```
//! use epd4in2::{BuilderError, Dimensions};
//!
//! // Larger than the controller's RAM
//! let result = Dimensions::new(480, 800);
//! assert!(matches!(result, Err(BuilderError::InvalidDimensions { .. })));
//!
//! // The native panel geometry
//! assert!(Dimensions::new(300, 400).is_ok());
//! ```

use crate::interface::DisplayInterface;

/// Maximum gate outputs (rows) supported by the controller
pub const MAX_GATE_OUTPUTS: u16 = 300;

/// Maximum source outputs (columns) supported by the controller
pub const MAX_SOURCE_OUTPUTS: u16 = 400;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`] implementation.
    Interface(I::Error),
    /// BUSY stayed asserted longer than the configured bound
    ///
    /// The controller is stuck or disconnected. Recover with a hardware reset.
    HardwareTimeout {
        /// The bound that was exceeded, in milliseconds
        timeout_ms: u32,
    },
    /// Caller-supplied buffer does not match `ceil(width / 8) * height`
    ///
    /// Rejected before any bus I/O takes place.
    InvalidBufferSize {
        /// Required buffer size in bytes
        expected: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// Invalid LUT length
    ///
    /// The waveform table is consumed positionally and must be exactly
    /// [`LUT_SIZE`](crate::lut::LUT_SIZE) bytes.
    InvalidLutLength {
        /// Expected length
        expected: usize,
        /// Provided length
        provided: usize,
    },
    /// The panel is in deep sleep
    ///
    /// Only [`Display::init`](crate::Display::init) (which starts with a
    /// hardware reset) is accepted until the panel is woken.
    Asleep,
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::HardwareTimeout { timeout_ms } => {
                write!(f, "Display still busy after {timeout_ms} ms")
            }
            Self::InvalidBufferSize { expected, provided } => {
                write!(
                    f,
                    "Invalid buffer size: expected {expected} bytes, provided {provided}"
                )
            }
            Self::InvalidLutLength { expected, provided } => {
                write!(
                    f,
                    "Invalid LUT length: expected {expected} bytes, provided {provided}"
                )
            }
            Self::Asleep => write!(f, "Display is in deep sleep"),
        }
    }
}

// Only the interface's error type needs to be Debug, not the interface itself
impl<I: DisplayInterface> core::fmt::Debug for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => f.debug_tuple("Interface").field(e).finish(),
            Self::HardwareTimeout { timeout_ms } => f
                .debug_struct("HardwareTimeout")
                .field("timeout_ms", timeout_ms)
                .finish(),
            Self::InvalidBufferSize { expected, provided } => f
                .debug_struct("InvalidBufferSize")
                .field("expected", expected)
                .field("provided", provided)
                .finish(),
            Self::InvalidLutLength { expected, provided } => f
                .debug_struct("InvalidLutLength")
                .field("expected", expected)
                .field("provided", provided)
                .finish(),
            Self::Asleep => f.write_str("Asleep"),
        }
    }
}

impl<I: DisplayInterface> core::error::Error for Error<I> {}

impl<I: DisplayInterface> From<BufferSizeError> for Error<I> {
    fn from(err: BufferSizeError) -> Self {
        Self::InvalidBufferSize {
            expected: err.expected,
            provided: err.provided,
        }
    }
}

/// A packed buffer whose length does not match the source geometry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferSizeError {
    /// Required buffer size in bytes
    pub expected: usize,
    /// Provided buffer size in bytes
    pub provided: usize,
}

impl core::fmt::Display for BufferSizeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Buffer size mismatch: expected {} bytes, provided {}",
            self.expected, self.provided
        )
    }
}

impl core::error::Error for BufferSizeError {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug, PartialEq)]
pub enum BuilderError {
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Number of rows (height) requested
        rows: u16,
        /// Number of columns (width) requested
        cols: u16,
    },
    /// Busy poll interval of zero
    ///
    /// The busy-wait would never advance towards its timeout.
    InvalidPollInterval,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidDimensions { rows, cols } => write!(
                f,
                "Invalid dimensions {rows}x{cols} (max {MAX_GATE_OUTPUTS}x{MAX_SOURCE_OUTPUTS})"
            ),
            Self::InvalidPollInterval => write!(f, "Busy poll interval must be non-zero"),
        }
    }
}

impl core::error::Error for BuilderError {}
