//! Transmit state machine

use crate::config::{FrameFormat, Parity};
use crate::spec::TICKS_PER_BIT;

/// Transmitter state; each non-idle state lasts one bit period (16 ticks)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    Idle,
    Start,
    Data(u8),
    Parity,
    Stop(u8),
}

/// Serializer driving the transmit line one bit per 16 ticks
///
/// A byte and the decoded frame parameters are latched together when a
/// start request is accepted, so the frame in progress is immune to
/// control-word changes. Requests arriving while busy are dropped
/// silently; callers poll [`busy`] before starting a new frame.
///
/// [`busy`]: Transmitter::busy
#[derive(Debug, Clone)]
pub struct Transmitter {
    state: TxState,
    ticks: u8,
    shift: u8,
    format: FrameFormat,
}

impl Transmitter {
    /// Create a new transmitter in the idle (mark) state
    pub fn new() -> Self {
        Transmitter {
            state: TxState::Idle,
            ticks: 0,
            shift: 0,
            format: FrameFormat::default(),
        }
    }

    /// Request transmission of `byte` with the given frame parameters
    ///
    /// Accepted only from idle; returns whether the request was latched.
    /// A rejected request raises no error flag anywhere.
    pub fn start(&mut self, byte: u8, format: FrameFormat) -> bool {
        if self.state != TxState::Idle {
            return false;
        }

        self.shift = byte;
        self.format = format;
        self.ticks = 0;
        self.state = TxState::Start;
        true
    }

    /// Advance the state machine; transitions happen only on a tick
    pub fn step(&mut self, tick: bool) {
        if !tick || self.state == TxState::Idle {
            return;
        }

        self.ticks += 1;
        if self.ticks < TICKS_PER_BIT {
            return;
        }
        self.ticks = 0;

        self.state = match self.state {
            TxState::Idle => TxState::Idle,
            TxState::Start => TxState::Data(0),
            TxState::Data(bit) => {
                let next = bit + 1;
                if next == self.format.data_bits.count() {
                    if self.format.parity == Parity::None {
                        TxState::Stop(0)
                    } else {
                        TxState::Parity
                    }
                } else {
                    TxState::Data(next)
                }
            }
            TxState::Parity => TxState::Stop(0),
            TxState::Stop(index) => {
                if index + 1 == self.format.stop_bits.count() {
                    TxState::Idle
                } else {
                    TxState::Stop(index + 1)
                }
            }
        };
    }

    /// Current level of the transmit line (idle-high)
    pub fn line(&self) -> bool {
        match self.state {
            TxState::Idle => true,
            TxState::Start => false,
            TxState::Data(bit) => (self.shift >> bit) & 1 != 0,
            TxState::Parity => self
                .format
                .parity
                .expected_bit(self.shift, self.format.data_bits)
                .unwrap_or(true),
            TxState::Stop(_) => true,
        }
    }

    /// Whether a frame is in flight; false only in idle
    pub fn busy(&self) -> bool {
        self.state != TxState::Idle
    }

    /// Force the machine back to idle
    pub fn reset(&mut self) {
        self.state = TxState::Idle;
        self.ticks = 0;
        self.shift = 0;
    }
}

impl Default for Transmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControlWord;

    fn format_8n1() -> FrameFormat {
        FrameFormat::from_control(ControlWord::new(ControlWord::EIGHT_N_ONE))
    }

    /// Run the transmitter one tick per step and record the line level at
    /// the start of each bit period.
    fn capture_bits(tx: &mut Transmitter, bit_periods: usize) -> Vec<u8> {
        let mut bits = Vec::with_capacity(bit_periods);
        for _ in 0..bit_periods {
            bits.push(tx.line() as u8);
            for _ in 0..16 {
                tx.step(true);
            }
        }
        bits
    }

    #[test]
    fn test_idle_line_is_mark() {
        let tx = Transmitter::new();
        assert!(tx.line());
        assert!(!tx.busy());
    }

    #[test]
    fn test_8n1_bit_sequence() {
        let mut tx = Transmitter::new();
        assert!(tx.start(0xA5, format_8n1()));

        // Start, 0xA5 LSB-first, stop
        let bits = capture_bits(&mut tx, 10);
        assert_eq!(bits, vec![0, 1, 0, 1, 0, 0, 1, 0, 1, 1]);
        assert!(!tx.busy());
        assert!(tx.line());
    }

    #[test]
    fn test_busy_duration_is_exact() {
        let mut tx = Transmitter::new();
        tx.start(0xA5, format_8n1());
        assert!(tx.busy());

        // (1 start + 8 data + 1 stop) * 16 ticks
        for _ in 0..159 {
            tx.step(true);
        }
        assert!(tx.busy());
        tx.step(true);
        assert!(!tx.busy());
    }

    #[test]
    fn test_parity_bit_is_driven() {
        let format = FrameFormat::new(8, Parity::Odd, 1).unwrap();
        let mut tx = Transmitter::new();
        tx.start(0xA5, format);

        // Start + 8 data + parity + stop; 0xA5 has even ones, odd parity = 1
        let bits = capture_bits(&mut tx, 11);
        assert_eq!(bits, vec![0, 1, 0, 1, 0, 0, 1, 0, 1, 1, 1]);
    }

    #[test]
    fn test_two_stop_bits() {
        let format = FrameFormat::new(5, Parity::None, 2).unwrap();
        let mut tx = Transmitter::new();
        tx.start(0b10110, format);

        let bits = capture_bits(&mut tx, 8);
        assert_eq!(bits, vec![0, 0, 1, 1, 0, 1, 1, 1]);
        assert!(!tx.busy());
    }

    #[test]
    fn test_start_while_busy_is_dropped() {
        let mut tx = Transmitter::new();
        assert!(tx.start(0xA5, format_8n1()));
        assert!(!tx.start(0xFF, format_8n1()));

        // The frame in flight is untouched by the dropped request
        let bits = capture_bits(&mut tx, 10);
        assert_eq!(bits, vec![0, 1, 0, 1, 0, 0, 1, 0, 1, 1]);
    }

    #[test]
    fn test_no_transition_without_tick() {
        let mut tx = Transmitter::new();
        tx.start(0x00, format_8n1());
        for _ in 0..1000 {
            tx.step(false);
        }
        assert!(tx.busy());
        assert!(!tx.line()); // still in the start bit
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut tx = Transmitter::new();
        tx.start(0xA5, format_8n1());
        tx.step(true);
        tx.reset();
        assert!(!tx.busy());
        assert!(tx.line());
    }
}
