//! Status aggregation for the externally observable status bus

use bitfield::bitfield;

use crate::rx::Receiver;
use crate::tx::Transmitter;

/// Observable status of the transceiver for one sampling-clock step
///
/// `rx_ready`, `frame_error` and `parity_error` are one-step pulses, not
/// latches: they are asserted exactly once per completed receive frame and
/// fall back on the next step. Callers that poll slower than one frame
/// period can miss them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Status {
    /// Current level of the serial transmit line (idle-high)
    pub tx_line: bool,
    /// Transmit frame in flight
    pub tx_busy: bool,
    /// A receive frame completed this step
    pub rx_ready: bool,
    /// Stop bit at the wrong level, or a false start was rejected
    pub frame_error: bool,
    /// Received parity bit mismatched the computed parity
    pub parity_error: bool,
}

impl Status {
    /// Combine the two state machines into one status view
    ///
    /// Pure fan-in evaluated each step; the aggregator holds no state of
    /// its own.
    pub fn aggregate(tx: &Transmitter, rx: &Receiver) -> Self {
        Status {
            tx_line: tx.line(),
            tx_busy: tx.busy(),
            rx_ready: rx.ready(),
            frame_error: rx.frame_error(),
            parity_error: rx.parity_error(),
        }
    }

    /// Whether either error flag is raised
    pub fn has_error(&self) -> bool {
        self.frame_error || self.parity_error
    }

    /// Pack into the 8-bit status register layout
    pub fn to_word(&self) -> StatusWord {
        let mut word = StatusWord(0);
        word.set_tx_line(self.tx_line);
        word.set_tx_busy(self.tx_busy);
        word.set_rx_ready(self.rx_ready);
        word.set_frame_error(self.frame_error);
        word.set_parity_error(self.parity_error);
        word
    }
}

bitfield! {
    /// Packed 8-bit status register
    ///
    /// Bit 0 carries the transmit line itself so a caller watching only
    /// the status bus can still loop it back. Bits 5-7 read as zero.
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct StatusWord(u8);
    impl Debug;
    pub tx_line, set_tx_line: 0;
    pub tx_busy, set_tx_busy: 1;
    pub rx_ready, set_rx_ready: 2;
    pub frame_error, set_frame_error: 3;
    pub parity_error, set_parity_error: 4;
}

impl StatusWord {
    /// Get the raw register value
    pub fn raw(&self) -> u8 {
        self.0
    }
}

impl From<Status> for StatusWord {
    fn from(status: Status) -> Self {
        status.to_word()
    }
}
