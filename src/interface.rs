//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for communicating with the panel controller over SPI.
//!
//! ## Hardware Requirements
//!
//! The panel requires:
//! - SPI bus (MOSI + SCK) at [`SPI_FREQUENCY_HZ`], [`SPI_MODE`]
//! - 4 GPIO pins:
//!   - **CS**: Chip select (output, active low)
//!   - **DC**: Data/Command select (output)
//!   - **RST**: Reset (output, active low)
//!   - **BUSY**: Busy status (input, active high)
//!
//! ## Framing
//!
//! Every command byte and every data block is one transmission:
//!
//! 1. Drive DC (low for a command, high for data)
//! 2. Assert CS (low)
//! 3. Write the bytes and flush the bus
//! 4. Deassert CS (high)
//!
//! DC never changes while CS is asserted.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::SpiBus;
//! use epd4in2::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
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
//! # let mut delay = MockDelay;
//! // Create interface with SPI bus and GPIO pins
//! let mut interface = match Interface::new(MockSpi, MockPin, MockPin, MockPin, MockPin) {
//!     Ok(interface) => interface,
//!     Err(_) => return,
//! };
//!
//! // Send command
//! let _ = interface.send_command(0x12); // Soft reset
//!
//! // Send data
//! let _ = interface.send_data(&[0xFF, 0x00, 0xFF]);
//!
//! // Pulse the reset line
//! let _ = interface.reset(&mut delay);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::{MODE_0, Mode, SpiBus};

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// SPI clock the panel is specified for
pub const SPI_FREQUENCY_HZ: u32 = 20_000_000;

/// SPI mode the panel expects (CPOL = 0, CPHA = 0)
pub const SPI_MODE: Mode = MODE_0;

/// Time RST is held at each level around the reset pulse, in milliseconds
pub const RESET_SETTLE_MS: u32 = 100;

/// Width of the active-low reset pulse, in milliseconds
pub const RESET_PULSE_MS: u32 = 2;

/// Size of the stack block used to stream constant fills
const FILL_BLOCK: usize = 64;

/// Trait for hardware interface to the panel controller
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// SPI + GPIO implementation that satisfies embedded-hal traits.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct. If you need
/// custom behavior (e.g., a shared bus), implement this trait on your own type.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send a command byte to the controller
    ///
    /// The implementation must set DC low before asserting CS and keep it
    /// there until CS is released.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send data bytes to the controller
    ///
    /// The implementation must set DC high before asserting CS and transmit
    /// the whole slice within a single CS assertion.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Send `len` copies of `value` as one data transmission
    ///
    /// Used to clear RAM without a full-size buffer in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_data_fill(&mut self, value: u8, len: usize) -> InterfaceResult<(), Self::Error>;

    /// Perform hardware reset
    ///
    /// The implementation must drive RST high, wait [`RESET_SETTLE_MS`],
    /// drive it low for [`RESET_PULSE_MS`], then high again and wait
    /// another [`RESET_SETTLE_MS`].
    ///
    /// # Errors
    ///
    /// Returns an error if the reset pin cannot be driven.
    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;

    /// Sample the BUSY line once
    ///
    /// Returns `true` while the controller is processing a command.
    ///
    /// # Errors
    ///
    /// Returns an error if the busy pin cannot be read.
    fn is_busy(&mut self) -> InterfaceResult<bool, Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
    /// A control line could not be put in its idle state at construction
    HardwareUnavailable(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::HardwareUnavailable(e) => write!(f, "Hardware unavailable: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Hardware interface implementation for the panel
///
/// Implements [`DisplayInterface`] for an embedded-hal v1.0 [`SpiBus`] with a
/// dedicated chip-select pin. The interface owns the bus and all four pins
/// until [`release`](Self::release) hands them back.
///
/// ## Type Parameters
///
/// * `SPI` - SPI bus implementing [`SpiBus`]
/// * `CS` - Chip select pin implementing [`OutputPin`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BUSY` - Busy pin implementing [`InputPin`]
pub struct Interface<SPI, CS, DC, RST, BUSY> {
    /// SPI bus for communication
    spi: SPI,
    /// Chip select pin (active low)
    cs: CS,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    /// Busy pin (active high)
    busy: BUSY,
    /// Busy pin polarity (true = active high, false = active low)
    busy_active_high: bool,
    /// Largest single bus write in bytes (0 = unbounded)
    max_transfer: usize,
}

impl<SPI, CS, DC, RST, BUSY, PinErr> Interface<SPI, CS, DC, RST, BUSY>
where
    SPI: SpiBus,
    CS: OutputPin<Error = PinErr>,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
{
    /// Create a new Interface
    ///
    /// Deasserts CS and releases RST so the controller sees an idle bus.
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI bus, configured for [`SPI_FREQUENCY_HZ`] and [`SPI_MODE`]
    /// * `cs` - Chip select pin (output, active low)
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `rst` - Reset pin (output, active low)
    /// * `busy` - Busy pin (input, active high)
    ///
    /// # Errors
    ///
    /// Returns [`InterfaceError::HardwareUnavailable`] if CS or RST cannot be driven.
    pub fn new(
        spi: SPI,
        mut cs: CS,
        dc: DC,
        mut rst: RST,
        busy: BUSY,
    ) -> InterfaceResult<Self, InterfaceError<SPI::Error, PinErr>> {
        cs.set_high().map_err(InterfaceError::HardwareUnavailable)?;
        rst.set_high().map_err(InterfaceError::HardwareUnavailable)?;
        Ok(Self {
            spi,
            cs,
            dc,
            rst,
            busy,
            busy_active_high: true,
            max_transfer: 0,
        })
    }

    /// Set busy pin polarity
    ///
    /// Default is active-high. Set to false for active-low panels.
    pub fn set_busy_active_high(&mut self, active_high: bool) -> &mut Self {
        self.busy_active_high = active_high;
        self
    }

    /// Get busy pin polarity (true = active high)
    pub fn busy_active_high(&self) -> bool {
        self.busy_active_high
    }

    /// Limit the size of a single bus write
    ///
    /// Longer data blocks are split into several writes under one CS
    /// assertion. Set to 0 (the default) to write every block at once.
    pub fn set_max_transfer(&mut self, bytes: usize) -> &mut Self {
        self.max_transfer = bytes;
        self
    }

    /// Get the maximum single write size (0 = unbounded)
    pub fn max_transfer(&self) -> usize {
        self.max_transfer
    }

    /// Give back the bus and pins
    pub fn release(self) -> (SPI, CS, DC, RST, BUSY) {
        (self.spi, self.cs, self.dc, self.rst, self.busy)
    }

    /// Run `write` inside one DC-selected, CS-bracketed transmission
    ///
    /// CS is released even when the write fails.
    fn framed<F>(
        &mut self,
        data_mode: bool,
        write: F,
    ) -> InterfaceResult<(), InterfaceError<SPI::Error, PinErr>>
    where
        F: FnOnce(&mut SPI, usize) -> Result<(), SPI::Error>,
    {
        let dc = if data_mode {
            self.dc.set_high()
        } else {
            self.dc.set_low()
        };
        dc.map_err(InterfaceError::Pin)?;

        self.cs.set_low().map_err(InterfaceError::Pin)?;
        let written = write(&mut self.spi, self.max_transfer).and_then(|()| self.spi.flush());
        let released = self.cs.set_high();

        written.map_err(InterfaceError::Spi)?;
        released.map_err(InterfaceError::Pin)
    }
}

/// Write `data` in pieces of at most `max` bytes (0 = one piece)
fn write_chunked<S: SpiBus>(spi: &mut S, data: &[u8], max: usize) -> Result<(), S::Error> {
    if max == 0 {
        return spi.write(data);
    }
    for chunk in data.chunks(max) {
        spi.write(chunk)?;
    }
    Ok(())
}

/// Write `len` copies of `value` in pieces of at most `max` bytes (0 = block size)
fn write_fill<S: SpiBus>(spi: &mut S, value: u8, len: usize, max: usize) -> Result<(), S::Error> {
    let block = [value; FILL_BLOCK];
    let step = if max == 0 { FILL_BLOCK } else { max.min(FILL_BLOCK) };
    let mut remaining = len;
    while remaining > 0 {
        let n = remaining.min(step);
        spi.write(&block[..n])?;
        remaining -= n;
    }
    Ok(())
}

impl<SPI, CS, DC, RST, BUSY, PinErr> DisplayInterface for Interface<SPI, CS, DC, RST, BUSY>
where
    SPI: SpiBus,
    SPI::Error: Debug,
    CS: OutputPin<Error = PinErr>,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.framed(false, |spi, _| spi.write(&[command]))
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.framed(true, |spi, max| write_chunked(spi, data, max))
    }

    fn send_data_fill(&mut self, value: u8, len: usize) -> InterfaceResult<(), Self::Error> {
        self.framed(true, |spi, max| write_fill(spi, value, len, max))
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        // HIGH -> 100ms -> LOW -> 2ms -> HIGH -> 100ms
        self.rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_SETTLE_MS);
        self.rst.set_low().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }

    fn is_busy(&mut self) -> InterfaceResult<bool, Self::Error> {
        let level = if self.busy_active_high {
            self.busy.is_high()
        } else {
            self.busy.is_low()
        };
        level.map_err(InterfaceError::Pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use embedded_hal::digital::ErrorType;
    use embedded_hal::spi::ErrorType as SpiErrorType;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct MockError;

    impl embedded_hal::digital::Error for MockError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl embedded_hal::spi::Error for MockError {
        fn kind(&self) -> embedded_hal::spi::ErrorKind {
            embedded_hal::spi::ErrorKind::Other
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Cs(bool),
        Dc(bool),
        Rst(bool),
        Write(Vec<u8>),
        Flush,
        DelayMs(u32),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct MockSpi {
        log: Log,
        fail_writes: bool,
    }

    impl SpiErrorType for MockSpi {
        type Error = MockError;
    }

    impl SpiBus for MockSpi {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }
        fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
            if self.fail_writes {
                return Err(MockError);
            }
            self.log.borrow_mut().push(Event::Write(words.to_vec()));
            Ok(())
        }
        fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }
        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }
        fn flush(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push(Event::Flush);
            Ok(())
        }
    }

    #[derive(Clone, Copy)]
    enum Line {
        Cs,
        Dc,
        Rst,
    }

    struct MockOutput {
        log: Log,
        line: Line,
        broken: bool,
    }

    impl ErrorType for MockOutput {
        type Error = MockError;
    }

    impl OutputPin for MockOutput {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.set(false)
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.set(true)
        }
    }

    impl MockOutput {
        fn set(&mut self, level: bool) -> Result<(), MockError> {
            if self.broken {
                return Err(MockError);
            }
            let event = match self.line {
                Line::Cs => Event::Cs(level),
                Line::Dc => Event::Dc(level),
                Line::Rst => Event::Rst(level),
            };
            self.log.borrow_mut().push(event);
            Ok(())
        }
    }

    struct MockBusy {
        level: bool,
    }

    impl ErrorType for MockBusy {
        type Error = MockError;
    }

    impl InputPin for MockBusy {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.level)
        }
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.level)
        }
    }

    struct MockDelay {
        log: Log,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}
        fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(Event::DelayMs(ms));
        }
    }

    type TestInterface = Interface<MockSpi, MockOutput, MockOutput, MockOutput, MockBusy>;

    fn output(log: &Log, line: Line) -> MockOutput {
        MockOutput {
            log: log.clone(),
            line,
            broken: false,
        }
    }

    fn test_interface(log: &Log) -> TestInterface {
        let interface = Interface::new(
            MockSpi {
                log: log.clone(),
                fail_writes: false,
            },
            output(log, Line::Cs),
            output(log, Line::Dc),
            output(log, Line::Rst),
            MockBusy { level: false },
        )
        .unwrap();
        log.borrow_mut().clear();
        interface
    }

    fn new_log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn test_new_idles_cs_and_rst() {
        let log = new_log();
        let _interface = Interface::new(
            MockSpi {
                log: log.clone(),
                fail_writes: false,
            },
            output(&log, Line::Cs),
            output(&log, Line::Dc),
            output(&log, Line::Rst),
            MockBusy { level: false },
        )
        .unwrap();
        assert_eq!(*log.borrow(), [Event::Cs(true), Event::Rst(true)]);
    }

    #[test]
    fn test_new_with_broken_cs_is_hardware_unavailable() {
        let log = new_log();
        let mut cs = output(&log, Line::Cs);
        cs.broken = true;
        let result = Interface::new(
            MockSpi {
                log: log.clone(),
                fail_writes: false,
            },
            cs,
            output(&log, Line::Dc),
            output(&log, Line::Rst),
            MockBusy { level: false },
        );
        assert!(matches!(
            result,
            Err(InterfaceError::HardwareUnavailable(MockError))
        ));
    }

    #[test]
    fn test_send_command_framing() {
        let log = new_log();
        let mut interface = test_interface(&log);
        interface.send_command(0x12).unwrap();
        assert_eq!(
            *log.borrow(),
            [
                Event::Dc(false),
                Event::Cs(false),
                Event::Write(alloc::vec![0x12]),
                Event::Flush,
                Event::Cs(true),
            ]
        );
    }

    #[test]
    fn test_send_data_framing() {
        let log = new_log();
        let mut interface = test_interface(&log);
        interface.send_data(&[0x00, 0x31]).unwrap();
        assert_eq!(
            *log.borrow(),
            [
                Event::Dc(true),
                Event::Cs(false),
                Event::Write(alloc::vec![0x00, 0x31]),
                Event::Flush,
                Event::Cs(true),
            ]
        );
    }

    #[test]
    fn test_send_data_chunks_within_single_assertion() {
        let log = new_log();
        let mut interface = test_interface(&log);
        interface.set_max_transfer(4);
        interface.send_data(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]).unwrap();

        let events = log.borrow();
        let asserts = events.iter().filter(|e| **e == Event::Cs(false)).count();
        assert_eq!(asserts, 1);
        let writes: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::Write(bytes) => Some(bytes.len()),
                _ => None,
            })
            .collect();
        assert_eq!(writes, [4, 4, 2]);
        assert_eq!(events.last(), Some(&Event::Cs(true)));
    }

    #[test]
    fn test_send_data_fill_streams_value() {
        let log = new_log();
        let mut interface = test_interface(&log);
        interface.send_data_fill(0xFF, 150).unwrap();

        let events = log.borrow();
        let mut total = 0;
        for event in events.iter() {
            if let Event::Write(bytes) = event {
                assert!(bytes.iter().all(|b| *b == 0xFF));
                total += bytes.len();
            }
        }
        assert_eq!(total, 150);
        assert_eq!(events.iter().filter(|e| **e == Event::Cs(false)).count(), 1);
    }

    #[test]
    fn test_cs_released_after_spi_failure() {
        let log = new_log();
        let mut interface = test_interface(&log);
        interface.spi.fail_writes = true;
        let result = interface.send_data(&[0xAA]);
        assert!(matches!(result, Err(InterfaceError::Spi(MockError))));
        assert_eq!(log.borrow().last(), Some(&Event::Cs(true)));
    }

    #[test]
    fn test_reset_timing() {
        let log = new_log();
        let mut interface = test_interface(&log);
        let mut delay = MockDelay { log: log.clone() };
        interface.reset(&mut delay).unwrap();
        assert_eq!(
            *log.borrow(),
            [
                Event::Rst(true),
                Event::DelayMs(100),
                Event::Rst(false),
                Event::DelayMs(2),
                Event::Rst(true),
                Event::DelayMs(100),
            ]
        );
    }

    #[test]
    fn test_busy_polarity() {
        let log = new_log();
        let mut interface = test_interface(&log);
        assert!(interface.busy_active_high());
        assert!(!interface.is_busy().unwrap());

        interface.set_busy_active_high(false);
        assert!(interface.is_busy().unwrap());
    }

    #[test]
    fn test_set_max_transfer() {
        let log = new_log();
        let mut interface = test_interface(&log);
        assert_eq!(interface.max_transfer(), 0);
        interface.set_max_transfer(4096);
        assert_eq!(interface.max_transfer(), 4096);
    }
}
