//! Full-duplex transceiver tying decoder, timebase and state machines

use crate::config::{ControlWord, FrameFormat};
use crate::error::Result;
use crate::rx::Receiver;
use crate::status::Status;
use crate::tick::BaudTickGenerator;
use crate::tx::Transmitter;

/// A full-duplex UART core evaluated one sampling-clock step at a time
///
/// The transmitter and receiver are independent automata sharing only the
/// tick stream and the decoded control word, both read-only. Each call to
/// [`step`] advances one sampling-clock cycle: the tick generator runs
/// first, then both machines observe the same tick.
///
/// Starting a transmission is fire-and-forget: pulse the request in and
/// poll [`Status::tx_busy`] for completion. Receiving is push-only: the
/// core raises [`Status::rx_ready`] for one step and the caller must read
/// [`rx_data`] before the next frame overwrites the single slot. There is
/// no backpressure signal for a slow reader.
///
/// [`step`]: Uart::step
/// [`rx_data`]: Uart::rx_data
#[derive(Debug, Clone)]
pub struct Uart {
    control: ControlWord,
    baud: BaudTickGenerator,
    tx: Transmitter,
    rx: Receiver,
}

impl Uart {
    /// Create a transceiver emitting 16 ticks per bit period, one tick
    /// every `divisor` steps
    pub fn new(divisor: u32) -> Result<Self> {
        Ok(Uart {
            control: ControlWord::default(),
            baud: BaudTickGenerator::new(divisor)?,
            tx: Transmitter::new(),
            rx: Receiver::new(),
        })
    }

    /// Synchronous reset: both machines to idle, flags cleared, tick
    /// phase restarted
    pub fn reset(&mut self) {
        self.baud.reset();
        self.tx.reset();
        self.rx.reset();
    }

    /// Set the live control word
    ///
    /// Both machines sample it at frame-start boundaries only, so a change
    /// mid-frame never corrupts a frame in progress.
    pub fn set_control_word(&mut self, word: ControlWord) {
        self.control = word;
    }

    /// Get the live control word
    pub fn control_word(&self) -> ControlWord {
        self.control
    }

    /// Frame parameters the next frame will be latched with
    pub fn frame_format(&self) -> FrameFormat {
        FrameFormat::from_control(self.control)
    }

    /// Gate the shared timebase; while disabled, nothing advances
    pub fn set_clock_enable(&mut self, enabled: bool) {
        self.baud.set_enabled(enabled);
    }

    /// Request transmission of `byte`
    ///
    /// Accepted only while the transmitter is idle; a request while busy
    /// is silently ignored. Poll [`tx_busy`] before issuing a new one.
    ///
    /// [`tx_busy`]: Uart::tx_busy
    pub fn start_transmit(&mut self, byte: u8) {
        self.tx.start(byte, self.frame_format());
    }

    /// Advance one sampling-clock cycle
    ///
    /// `rx_line` is the serial input level for this cycle. Returns the
    /// aggregated status; the pulse flags in it are valid for this step
    /// only.
    pub fn step(&mut self, rx_line: bool) -> Status {
        let tick = self.baud.step();
        let format = FrameFormat::from_control(self.control);

        self.rx.step(tick, rx_line, format);
        self.tx.step(tick);

        Status::aggregate(&self.tx, &self.rx)
    }

    /// Whether a transmit frame is in flight
    pub fn tx_busy(&self) -> bool {
        self.tx.busy()
    }

    /// Current level of the transmit line
    pub fn tx_line(&self) -> bool {
        self.tx.line()
    }

    /// Last received byte, valid from the ready pulse until the next
    /// frame overwrites it
    pub fn rx_data(&self) -> u8 {
        self.rx.data()
    }

    /// Aggregated status without advancing time
    pub fn status(&self) -> Status {
        Status::aggregate(&self.tx, &self.rx)
    }
}
