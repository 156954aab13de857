//! Display configuration types and builder
//!
//! Everything the register sequences need beyond the fixed command set lives
//! in [`Config`]. The defaults describe the 4.2" 400x300 panel; a different
//! panel on the same controller only needs its [`Dimensions`] changed.

pub use crate::error::{BuilderError, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS};
use crate::command::CTRL1_BYPASS_RED;

/// Native panel width in pixels
pub const PANEL_WIDTH: u16 = 400;

/// Native panel height in pixels
pub const PANEL_HEIGHT: u16 = 300;

/// Default busy-wait bound in milliseconds
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 30_000;

/// Default interval between two BUSY samples in milliseconds
pub const DEFAULT_BUSY_POLL_INTERVAL_MS: u32 = 20;

/// Default settle time after entering deep sleep in milliseconds
pub const DEFAULT_SLEEP_SETTLE_MS: u32 = 2_000;

/// Display dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Number of rows (height in pixels, corresponds to gate outputs)
    pub rows: u16,
    /// Number of columns (width in pixels, corresponds to source outputs)
    pub cols: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - rows is 0 or > MAX_GATE_OUTPUTS
    /// - cols is 0 or > MAX_SOURCE_OUTPUTS
    pub fn new(rows: u16, cols: u16) -> Result<Self, BuilderError> {
        if rows == 0 || rows > MAX_GATE_OUTPUTS {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        if cols == 0 || cols > MAX_SOURCE_OUTPUTS {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// The native 400x300 panel
    pub const fn panel() -> Self {
        Self {
            rows: PANEL_HEIGHT,
            cols: PANEL_WIDTH,
        }
    }

    /// Bytes per row: `ceil(cols / 8)`
    pub fn row_bytes(&self) -> usize {
        (self.cols as usize).div_ceil(8)
    }

    /// Calculate required buffer size in bytes
    ///
    /// Rows are padded to whole bytes, so this is `ceil(cols / 8) * rows`.
    pub fn buffer_size(&self) -> usize {
        self.row_bytes() * self.rows as usize
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::panel()
    }
}

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

/// Display Update Control 2 values selecting each refresh sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshControl {
    /// Full refresh from the OTP waveform
    pub full: u8,
    /// Fast refresh
    pub fast: u8,
    /// Partial (differential) refresh
    pub partial: u8,
    /// Four-level greyscale refresh
    pub gray4: u8,
}

impl Default for RefreshControl {
    fn default() -> Self {
        Self {
            full: 0xF7,
            fast: 0xC7,
            partial: 0xFF,
            gray4: 0xCF,
        }
    }
}

/// Display configuration
///
/// This struct holds all configurable parameters for the controller.
/// Use `Builder` to create a Config.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Display dimensions
    pub dimensions: Dimensions,
    /// Display Update Control 1 payload written during init
    pub display_update_ctrl1: [u8; 2],
    /// Border waveform written during init
    pub border_waveform: u8,
    /// Border waveform written before every partial update
    pub partial_border_waveform: u8,
    /// Data entry mode byte
    pub data_entry_mode: u8,
    /// Display Update Control 2 values per refresh mode
    pub refresh_control: RefreshControl,
    /// Upper bound for a single busy-wait in milliseconds (0 = wait forever)
    pub busy_timeout_ms: u32,
    /// Interval between BUSY samples in milliseconds
    pub busy_poll_interval_ms: u32,
    /// Time to hold off after entering deep sleep in milliseconds
    pub sleep_settle_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::panel(),
            display_update_ctrl1: [CTRL1_BYPASS_RED, 0x00],
            border_waveform: 0x05,
            partial_border_waveform: 0x80,
            // X increment, Y increment, X first
            data_entry_mode: 0x03,
            refresh_control: RefreshControl::default(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            busy_poll_interval_ms: DEFAULT_BUSY_POLL_INTERVAL_MS,
            sleep_settle_ms: DEFAULT_SLEEP_SETTLE_MS,
        }
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust,no_run
/// use epd4in2::{Builder, Dimensions};
///
/// let dims = match Dimensions::new(300, 400) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new().dimensions(dims).busy_timeout_ms(10_000).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a new Builder with the panel defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.config.dimensions = dims;
        self
    }

    /// Set Display Update Control 1 payload used during init
    pub fn display_update_ctrl1(mut self, value: [u8; 2]) -> Self {
        self.config.display_update_ctrl1 = value;
        self
    }

    /// Set border waveform used during init
    pub fn border_waveform(mut self, value: u8) -> Self {
        self.config.border_waveform = value;
        self
    }

    /// Set border waveform used for partial updates
    pub fn partial_border_waveform(mut self, value: u8) -> Self {
        self.config.partial_border_waveform = value;
        self
    }

    /// Set data entry mode
    pub fn data_entry_mode(mut self, value: u8) -> Self {
        self.config.data_entry_mode = value;
        self
    }

    /// Set Display Update Control 2 values for all refresh modes
    pub fn refresh_control(mut self, value: RefreshControl) -> Self {
        self.config.refresh_control = value;
        self
    }

    /// Set the busy-wait bound in milliseconds
    ///
    /// Default is 30,000ms (30 seconds). Set to 0 to disable the timeout.
    pub fn busy_timeout_ms(mut self, value: u32) -> Self {
        self.config.busy_timeout_ms = value;
        self
    }

    /// Set the interval between BUSY samples in milliseconds
    pub fn busy_poll_interval_ms(mut self, value: u32) -> Self {
        self.config.busy_poll_interval_ms = value;
        self
    }

    /// Set the settle delay after entering deep sleep
    pub fn sleep_settle_ms(mut self, value: u32) -> Self {
        self.config.sleep_settle_ms = value;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidPollInterval` if the poll interval is zero
    pub fn build(self) -> Result<Config, BuilderError> {
        if self.config.busy_poll_interval_ms == 0 {
            return Err(BuilderError::InvalidPollInterval);
        }
        Ok(self.config)
    }
}
