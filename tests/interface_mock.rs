//! Bus-level tests: the real `Interface` driven through embedded-hal-mock.
//!
//! Every expectation list below is the exact pin/bus traffic the panel sees,
//! so these tests pin down framing order as well as the bytes.
//!
//! Run with: cargo test --test interface_mock

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::ErrorKind;

use embedded_hal_mock::eh1::MockError;
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
use epd4in2::{Builder, Dimensions, Display, Error, Interface, InterfaceError, PowerState};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Expected traffic for a run of transmissions
#[derive(Default)]
struct Expect {
    spi: Vec<SpiTransaction<u8>>,
    cs: Vec<PinTransaction>,
    dc: Vec<PinTransaction>,
    busy: Vec<PinTransaction>,
}

impl Expect {
    /// Interface construction idles CS high
    fn new() -> Self {
        Self {
            cs: vec![PinTransaction::set(PinState::High)],
            ..Self::default()
        }
    }

    fn frame(&mut self, dc: PinState, bytes: &[u8]) {
        self.dc.push(PinTransaction::set(dc));
        self.cs.push(PinTransaction::set(PinState::Low));
        self.spi.push(SpiTransaction::write_vec(bytes.to_vec()));
        self.spi.push(SpiTransaction::flush());
        self.cs.push(PinTransaction::set(PinState::High));
    }

    fn command(&mut self, command: u8) -> &mut Self {
        self.frame(PinState::Low, &[command]);
        self
    }

    fn data(&mut self, data: &[u8]) -> &mut Self {
        self.frame(PinState::High, data);
        self
    }

    /// BUSY reads high `busy_polls` times, then low
    fn wait_ready(&mut self, busy_polls: usize) -> &mut Self {
        for _ in 0..busy_polls {
            self.busy.push(PinTransaction::get(PinState::High));
        }
        self.busy.push(PinTransaction::get(PinState::Low));
        self
    }
}

struct Mocks {
    spi: SpiMock<u8>,
    cs: PinMock,
    dc: PinMock,
    rst: PinMock,
    busy: PinMock,
}

impl Mocks {
    fn new(expect: &Expect, rst: &[PinTransaction]) -> Self {
        Self {
            spi: SpiMock::new(&expect.spi),
            cs: PinMock::new(&expect.cs),
            dc: PinMock::new(&expect.dc),
            rst: PinMock::new(rst),
            busy: PinMock::new(&expect.busy),
        }
    }

    fn interface(&self) -> Interface<SpiMock<u8>, PinMock, PinMock, PinMock, PinMock> {
        Interface::new(
            self.spi.clone(),
            self.cs.clone(),
            self.dc.clone(),
            self.rst.clone(),
            self.busy.clone(),
        )
        .expect("pins must idle")
    }

    fn done(mut self) {
        self.spi.done();
        self.cs.done();
        self.dc.done();
        self.rst.done();
        self.busy.done();
    }
}

/// RST idles high at construction
fn rst_idle() -> Vec<PinTransaction> {
    vec![PinTransaction::set(PinState::High)]
}

/// RST idle plus one reset pulse
fn rst_with_reset() -> Vec<PinTransaction> {
    vec![
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ]
}

/// 16x2 pixels, four bytes of frame data
fn tiny_config() -> epd4in2::Config {
    Builder::new()
        .dimensions(Dimensions::new(2, 16).unwrap())
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// A full-refresh display writes both planes, triggers 0xF7 and polls BUSY
/// until it drops.
#[test]
fn test_display_frames_every_transmission() {
    let frame = [0xFF, 0x00, 0xAA, 0x55];
    let mut expect = Expect::new();
    expect
        .command(0x24)
        .data(&frame)
        .command(0x26)
        .data(&frame)
        .command(0x22)
        .data(&[0xF7])
        .command(0x20)
        .wait_ready(2);

    let mocks = Mocks::new(&expect, &rst_idle());
    let mut display = Display::new(mocks.interface(), tiny_config());
    display.display(&frame, &mut NoopDelay).unwrap();

    mocks.done();
}

/// Hardware reset, soft reset and the register table, in order.
#[test]
fn test_init_sequence_on_the_bus() {
    let mut expect = Expect::new();
    expect
        .wait_ready(0)
        .command(0x12)
        .wait_ready(1)
        .command(0x21)
        .data(&[0x40, 0x00])
        .command(0x3C)
        .data(&[0x05])
        .command(0x11)
        .data(&[0x03])
        .command(0x44)
        .data(&[0x00, 0x01])
        .command(0x45)
        .data(&[0x00, 0x00, 0x01, 0x00])
        .command(0x4E)
        .data(&[0x00])
        .command(0x4F)
        .data(&[0x00, 0x00])
        .wait_ready(0);

    let mocks = Mocks::new(&expect, &rst_with_reset());
    let mut display = Display::new(mocks.interface(), tiny_config());
    display.init(&mut NoopDelay).unwrap();
    assert_eq!(display.state(), PowerState::Ready);

    mocks.done();
}

/// Clearing streams 0xFF fill blocks within a single CS assertion per plane.
#[test]
fn test_clear_streams_fill_in_one_frame() {
    let mut expect = Expect::new();
    expect.command(0x24).data(&[0xFF; 4]);
    expect.command(0x26).data(&[0xFF; 4]);
    expect.command(0x22).data(&[0xF7]).command(0x20).wait_ready(0);

    let mocks = Mocks::new(&expect, &rst_idle());
    let mut display = Display::new(mocks.interface(), tiny_config());
    display.clear(&mut NoopDelay).unwrap();

    mocks.done();
}

/// Deep sleep is 0x07 with payload 0x01; the panel then refuses updates
/// without any further bus traffic.
#[test]
fn test_sleep_then_refuse_updates() {
    let mut expect = Expect::new();
    expect.command(0x07).data(&[0x01]);

    let mocks = Mocks::new(&expect, &rst_idle());
    let mut display = Display::new(mocks.interface(), tiny_config());
    display.sleep(&mut NoopDelay).unwrap();

    let result = display.display(&[0xFF; 4], &mut NoopDelay);
    assert!(matches!(result, Err(Error::Asleep)));

    mocks.done();
}

/// A wrong-size frame is rejected before the bus is touched.
#[test]
fn test_wrong_size_frame_rejected_without_io() {
    let expect = Expect::new();
    let mocks = Mocks::new(&expect, &rst_idle());
    let mut display = Display::new(mocks.interface(), tiny_config());

    let result = display.display(&[0xFF; 100], &mut NoopDelay);
    assert!(matches!(
        result,
        Err(Error::InvalidBufferSize {
            expected: 4,
            provided: 100
        })
    ));

    mocks.done();
}

/// BUSY stuck high turns into a timeout once the bound is reached.
#[test]
fn test_busy_timeout() {
    let config = Builder::new()
        .dimensions(Dimensions::new(2, 16).unwrap())
        .busy_timeout_ms(40)
        .busy_poll_interval_ms(20)
        .build()
        .unwrap();

    let mut expect = Expect::new();
    // polled at 0, 20 and 40 ms
    for _ in 0..3 {
        expect.busy.push(PinTransaction::get(PinState::High));
    }

    let mocks = Mocks::new(&expect, &rst_idle());
    let mut display = Display::new(mocks.interface(), config);
    let result = display.wait_ready(&mut NoopDelay);
    assert!(matches!(
        result,
        Err(Error::HardwareTimeout { timeout_ms: 40 })
    ));

    mocks.done();
}

/// A chip-select that cannot be driven makes construction fail.
#[test]
fn test_unavailable_chip_select() {
    let mut spi = SpiMock::new(&[]);
    let mut cs = PinMock::new(&[PinTransaction::set(PinState::High)
        .with_error(MockError::Io(ErrorKind::NotConnected))]);
    let mut dc = PinMock::new(&[]);
    let mut rst = PinMock::new(&[]);
    let mut busy = PinMock::new(&[]);

    let result = Interface::new(
        spi.clone(),
        cs.clone(),
        dc.clone(),
        rst.clone(),
        busy.clone(),
    );
    assert!(matches!(
        result,
        Err(InterfaceError::HardwareUnavailable(_))
    ));

    spi.done();
    cs.done();
    dc.done();
    rst.done();
    busy.done();
}

/// The interface and its pins come back out of the driver.
#[test]
fn test_release_returns_bus_and_pins() {
    let expect = Expect::new();
    let mocks = Mocks::new(&expect, &rst_idle());
    let display = Display::new(mocks.interface(), tiny_config());

    let (_spi, _cs, _dc, _rst, _busy) = display.release().release();

    mocks.done();
}
