//! Core display operations

use embedded_hal::delay::DelayNs;

use crate::command::{
    DEEP_SLEEP, DEEP_SLEEP_ENTER, DISPLAY_UPDATE_CTRL2, MASTER_ACTIVATION, WRITE_RAM_BW,
    WRITE_RAM_RED,
};
use crate::config::{Config, Dimensions, RefreshControl};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::lut::{LUT_ALL, LUT_SIZE, lut_steps};
use crate::sequence::{InitSequence, PartialSequence, Step};

#[cfg(any(test, feature = "alloc"))]
use crate::buffer::{PixelSource, to_wire_format, wire_size};

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Refresh mode for display updates
///
/// Each mode selects a different update sequence through Display Update
/// Control 2. Everything but [`Full`](Self::Full) runs from the waveform
/// loaded with [`Display::load_lut`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RefreshMode {
    /// Full refresh from the OTP waveform (slowest, no ghosting)
    #[default]
    Full,
    /// Fast refresh
    ///
    /// Best for: UI updates, page turns. May leave slight ghosting.
    Fast,
    /// Partial (differential) refresh of changed pixels only
    Partial,
    /// Four-level greyscale refresh
    Gray4,
}

impl RefreshMode {
    /// Display Update Control 2 byte for this mode
    pub fn control_byte(self, control: &RefreshControl) -> u8 {
        match self {
            Self::Full => control.full,
            Self::Fast => control.fast,
            Self::Partial => control.partial,
            Self::Gray4 => control.gray4,
        }
    }

    /// Whether the mode runs from a host-loaded LUT
    pub fn needs_lut(self) -> bool {
        !matches!(self, Self::Full)
    }
}

/// Lifecycle of the panel as seen by the driver
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PowerState {
    /// Constructed, not yet initialized
    #[default]
    Uninitialized,
    /// Initialized and accepting updates
    Ready,
    /// In deep sleep; only [`Display::init`] wakes it
    Asleep,
}

/// Core display driver for the 4.2" panel
///
/// Owns the [`DisplayInterface`] for its whole lifetime; get it back with
/// [`release`](Self::release). Every operation borrows a delay provider for
/// the duration of the call.
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Lifecycle state
    state: PowerState,
    /// Whether a waveform LUT has been loaded since the last reset
    lut_loaded: bool,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    ///
    /// No bus traffic happens until [`init`](Self::init).
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            state: PowerState::Uninitialized,
            lut_loaded: false,
        }
    }

    /// Pulse RST and wait for the controller to come up
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        log::debug!("hardware reset");
        self.interface.reset(delay).map_err(Error::Interface)?;
        // A reset drops the controller out of deep sleep and forgets the LUT
        self.state = PowerState::Uninitialized;
        self.lut_loaded = false;
        self.wait_ready(delay)
    }

    /// Hardware reset followed by the register initialization sequence
    ///
    /// Also the only way to wake the panel from deep sleep.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.reset(delay)?;

        let init = InitSequence::new(&self.config);
        self.run(&init.steps(), delay)?;

        self.state = PowerState::Ready;
        log::debug!(
            "initialized {}x{} panel",
            self.config.dimensions.cols,
            self.config.dimensions.rows
        );
        Ok(())
    }

    /// Block until BUSY is released
    ///
    /// Polls every `busy_poll_interval_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HardwareTimeout`] once `busy_timeout_ms` has elapsed
    /// with BUSY still asserted. A timeout of zero waits forever.
    pub fn wait_ready<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let interval = self.config.busy_poll_interval_ms.max(1);
        let timeout_ms = self.config.busy_timeout_ms;
        let mut waited_ms: u32 = 0;

        while self.interface.is_busy().map_err(Error::Interface)? {
            if timeout_ms != 0 && waited_ms >= timeout_ms {
                log::warn!("display busy for {waited_ms} ms, giving up");
                return Err(Error::HardwareTimeout { timeout_ms });
            }
            // the last sleep ends on the deadline
            let step = if timeout_ms == 0 {
                interval
            } else {
                interval.min(timeout_ms - waited_ms)
            };
            delay.delay_ms(step);
            waited_ms = waited_ms.saturating_add(step);
        }

        Ok(())
    }

    /// Load the built-in waveform table
    pub fn load_lut(&mut self) -> DisplayResult<I> {
        self.write_lut(&LUT_ALL)
    }

    /// Load a caller-supplied waveform table
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidLutLength` if the LUT is not exactly
    /// [`LUT_SIZE`] bytes.
    pub fn load_custom_lut(&mut self, lut: &[u8]) -> DisplayResult<I> {
        let lut: &[u8; LUT_SIZE] = lut.try_into().map_err(|_| Error::InvalidLutLength {
            expected: LUT_SIZE,
            provided: lut.len(),
        })?;
        self.write_lut(lut)
    }

    fn write_lut(&mut self, lut: &[u8; LUT_SIZE]) -> DisplayResult<I> {
        self.ensure_awake()?;
        for step in lut_steps(lut) {
            if let Step::Write { command, data } = step {
                self.send_command(command)?;
                self.send_data(data)?;
            }
        }
        self.lut_loaded = true;
        log::debug!("waveform LUT loaded");
        Ok(())
    }

    /// Run the update sequence selected by `mode` and wait for it to finish
    pub fn refresh<D: DelayNs>(&mut self, mode: RefreshMode, delay: &mut D) -> DisplayResult<I> {
        self.ensure_awake()?;
        if mode.needs_lut() && !self.lut_loaded {
            log::warn!("{mode:?} refresh without a loaded LUT");
        }

        let control = mode.control_byte(&self.config.refresh_control);
        self.send_command(DISPLAY_UPDATE_CTRL2)?;
        self.send_data(&[control])?;
        self.send_command(MASTER_ACTIVATION)?;
        self.wait_ready(delay)
    }

    /// Clear both RAM planes to white and run a full refresh
    pub fn clear<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.ensure_awake()?;
        let size = self.config.dimensions.buffer_size();

        self.send_command(WRITE_RAM_BW)?;
        self.fill_data(0xFF, size)?;
        self.send_command(WRITE_RAM_RED)?;
        self.fill_data(0xFF, size)?;

        self.refresh(RefreshMode::Full, delay)
    }

    /// Show `buffer` with a full refresh
    ///
    /// # Arguments
    ///
    /// * `buffer` - Packed pixels, `ceil(width / 8) * height` bytes
    ///   (0 = black, 1 = white)
    /// * `delay` - Delay implementation
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidBufferSize` before touching the bus if the
    /// buffer has the wrong length.
    pub fn display<D: DelayNs>(&mut self, buffer: &[u8], delay: &mut D) -> DisplayResult<I> {
        self.display_with_mode(buffer, RefreshMode::Full, delay)
    }

    /// Show `buffer` with the given refresh mode
    ///
    /// Both RAM planes receive the same image, so a following partial update
    /// compares against it.
    pub fn display_with_mode<D: DelayNs>(
        &mut self,
        buffer: &[u8],
        mode: RefreshMode,
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.check_size(buffer)?;
        self.ensure_awake()?;

        self.send_command(WRITE_RAM_BW)?;
        self.send_data(buffer)?;
        self.send_command(WRITE_RAM_RED)?;
        self.send_data(buffer)?;

        self.refresh(mode, delay)
    }

    /// Convert `source` to the wire format and show it with a full refresh
    ///
    /// Packed sources are sent without copying.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidBufferSize` if the source geometry differs from
    /// the panel.
    #[cfg(any(test, feature = "alloc"))]
    pub fn display_source<S, D>(&mut self, source: &S, delay: &mut D) -> DisplayResult<I>
    where
        S: PixelSource + ?Sized,
        D: DelayNs,
    {
        let dims = self.config.dimensions;
        if source.width() != dims.cols || source.height() != dims.rows {
            return Err(Error::InvalidBufferSize {
                expected: dims.buffer_size(),
                provided: wire_size(source.width(), source.height()),
            });
        }
        let wire = to_wire_format(source);
        self.display(&wire, delay)
    }

    /// Show `buffer` with a partial refresh
    ///
    /// Reprograms the border and RAM window, writes the new image to the
    /// black/white plane only and lets the controller update the pixels that
    /// differ from the previous image. Load a LUT first.
    pub fn display_partial<D: DelayNs>(
        &mut self,
        buffer: &[u8],
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.check_size(buffer)?;
        self.ensure_awake()?;

        let partial = PartialSequence::new(&self.config);
        self.run(&partial.steps(), delay)?;

        self.send_command(WRITE_RAM_BW)?;
        self.send_data(buffer)?;

        self.refresh(RefreshMode::Partial, delay)
    }

    /// Enter deep sleep
    ///
    /// Waits `sleep_settle_ms` afterwards. Does nothing if already asleep.
    pub fn sleep<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        if self.state == PowerState::Asleep {
            return Ok(());
        }

        self.send_command(DEEP_SLEEP)?;
        self.send_data(&[DEEP_SLEEP_ENTER])?;
        delay.delay_ms(self.config.sleep_settle_ms);

        self.state = PowerState::Asleep;
        self.lut_loaded = false;
        log::debug!("entered deep sleep");
        Ok(())
    }

    /// Consume the driver and hand back the interface
    pub fn release(self) -> I {
        self.interface
    }

    /// Get display dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Whether a waveform LUT is loaded
    pub fn lut_loaded(&self) -> bool {
        self.lut_loaded
    }

    fn run<D: DelayNs>(&mut self, steps: &[Step<'_>], delay: &mut D) -> DisplayResult<I> {
        for step in steps {
            match *step {
                Step::Write { command, data } => {
                    self.send_command(command)?;
                    self.send_data(data)?;
                }
                Step::WaitReady => self.wait_ready(delay)?,
            }
        }
        Ok(())
    }

    fn check_size(&self, buffer: &[u8]) -> DisplayResult<I> {
        let expected = self.config.dimensions.buffer_size();
        if buffer.len() != expected {
            return Err(Error::InvalidBufferSize {
                expected,
                provided: buffer.len(),
            });
        }
        Ok(())
    }

    fn ensure_awake(&self) -> DisplayResult<I> {
        if self.state == PowerState::Asleep {
            return Err(Error::Asleep);
        }
        Ok(())
    }

    /// Send a command to the display controller
    fn send_command(&mut self, cmd: u8) -> DisplayResult<I> {
        log::trace!("command {cmd:#04x}");
        self.interface.send_command(cmd).map_err(Error::Interface)
    }

    /// Send data to the display controller
    fn send_data(&mut self, data: &[u8]) -> DisplayResult<I> {
        if data.is_empty() {
            return Ok(());
        }
        log::trace!("data, {} bytes", data.len());
        self.interface.send_data(data).map_err(Error::Interface)
    }

    fn fill_data(&mut self, value: u8, len: usize) -> DisplayResult<I> {
        log::trace!("fill {value:#04x}, {len} bytes");
        self.interface
            .send_data_fill(value, len)
            .map_err(Error::Interface)
    }
}
