//! # UART Transceiver Core
//!
//! A cycle-accurate model of an asynchronous serial transceiver (UART):
//! two independent finite-state automata (transmit and receive) driven by
//! a shared 16x-oversampling baud tick generator, parameterized by a 5-bit
//! control word selecting data-bit count, parity mode and stop-bit count.
//!
//! The core is a pure, steppable automaton: one [`Uart::step`] call per
//! sampling-clock cycle, no threads, no I/O, no callbacks. This library
//! provides:
//!
//! - Bit-exact serialization of start/data/parity/stop bits, one bit per
//!   16 ticks
//! - Start-edge synchronization and mid-bit sampling on the receive line
//! - Parity and framing validation with frame-scoped, non-fatal error
//!   reporting
//! - A packed status register aggregating line level, busy, ready and
//!   error flags
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization support
//!
//! ## Example
//!
//! ```
//! use uart_transceiver::{ControlWord, Uart};
//!
//! // 8 data bits, no parity, 1 stop bit; one tick per step
//! let mut uart = Uart::new(1)?;
//! uart.set_control_word(ControlWord::new(ControlWord::EIGHT_N_ONE));
//!
//! // Loop the transmit line back into the receiver
//! let mut line = true;
//! for _ in 0..8 {
//!     line = uart.step(line).tx_line;
//! }
//! uart.start_transmit(0xA5);
//!
//! let mut received = None;
//! for _ in 0..200 {
//!     let status = uart.step(line);
//!     if status.rx_ready {
//!         received = Some(uart.rx_data());
//!     }
//!     line = status.tx_line;
//! }
//! assert_eq!(received, Some(0xA5));
//! # Ok::<(), uart_transceiver::UartError>(())
//! ```

pub mod config;
pub mod error;
pub mod rx;
pub mod status;
pub mod tick;
pub mod transceiver;
pub mod tx;

pub use config::{ControlWord, DataBits, FrameFormat, Parity, StopBits};
pub use error::{Result, UartError};
pub use rx::Receiver;
pub use status::{Status, StatusWord};
pub use tick::BaudTickGenerator;
pub use transceiver::Uart;
pub use tx::Transmitter;

/// Fixed timing constants of the transceiver
pub mod spec {
    /// Oversampling ticks per bit period
    pub const TICKS_PER_BIT: u8 = 16;

    /// Tick at which each bit is sampled (the midpoint of the period)
    pub const MID_BIT_TICK: u8 = 8;

    /// Minimum supported data bits per frame
    pub const MIN_DATA_BITS: u8 = 5;

    /// Maximum supported data bits per frame
    pub const MAX_DATA_BITS: u8 = 8;

    /// Maximum supported stop bits per frame
    pub const MAX_STOP_BITS: u8 = 2;

    /// Significant bits in the control word
    pub const CONTROL_WORD_BITS: u8 = 5;
}
