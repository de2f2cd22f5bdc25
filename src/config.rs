//! Control-word decoding and frame format for the UART transceiver

use bitfield::bitfield;

use crate::error::{Result, UartError};

bitfield! {
    /// Raw 5-bit control register parameterizing the frame shape
    ///
    /// Bit layout, high to low:
    /// - Bit 4: stop bits (0 = one, 1 = two)
    /// - Bit 3: parity enable
    /// - Bit 2: parity type (0 = even, 1 = odd)
    /// - Bits 1-0: data-bit selector (`0b00` = 5 bits .. `0b11` = 8 bits)
    ///
    /// Bits above bit 4 are ignored. Every bit pattern is a valid
    /// configuration; this layout must be preserved for compatibility with
    /// existing callers.
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct ControlWord(u8);
    impl Debug;
    pub u8, data_bits_selector, set_data_bits_selector: 1, 0;
    pub parity_type_odd, set_parity_type_odd: 2;
    pub parity_enabled, set_parity_enabled: 3;
    pub two_stop_bits, set_two_stop_bits: 4;
}

impl ControlWord {
    /// 8 data bits, no parity, 1 stop bit
    pub const EIGHT_N_ONE: u8 = 0b00011;

    /// Create a control word from its raw register value
    pub fn new(raw: u8) -> Self {
        ControlWord(raw)
    }

    /// Get the raw register value
    pub fn raw(&self) -> u8 {
        self.0
    }
}

impl Default for ControlWord {
    fn default() -> Self {
        ControlWord(Self::EIGHT_N_ONE)
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataBits {
    /// 5 data bits
    Five,
    /// 6 data bits
    Six,
    /// 7 data bits
    Seven,
    /// 8 data bits
    Eight,
}

impl DataBits {
    /// Decode from the 2-bit control-word selector
    ///
    /// Only the low two bits are considered, so any input maps
    /// deterministically to one of the four supported widths.
    pub fn from_selector(selector: u8) -> Self {
        match selector & 0x3 {
            0b00 => DataBits::Five,
            0b01 => DataBits::Six,
            0b10 => DataBits::Seven,
            _ => DataBits::Eight,
        }
    }

    /// Get the bit count as an integer
    pub fn count(&self) -> u8 {
        match self {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }

    /// Encode as the 2-bit control-word selector
    pub fn selector(&self) -> u8 {
        self.count() - 5
    }
}

impl std::fmt::Display for DataBits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} data bits", self.count())
    }
}

/// Number of stop bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopBits {
    /// 1 stop bit
    One,
    /// 2 stop bits
    Two,
}

impl StopBits {
    /// Get the stop-bit count as an integer
    pub fn count(&self) -> u8 {
        match self {
            StopBits::One => 1,
            StopBits::Two => 2,
        }
    }
}

impl std::fmt::Display for StopBits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} stop bit(s)", self.count())
    }
}

/// Parity mode for the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parity {
    /// No parity bit transmitted or checked
    None,
    /// Parity bit makes the total number of ones even
    Even,
    /// Parity bit makes the total number of ones odd
    Odd,
}

impl Parity {
    /// Compute the expected parity bit for a payload of `data_bits` width
    ///
    /// Even parity is the XOR of all data bits; odd parity is its
    /// complement. Returns `None` when parity is disabled.
    pub fn expected_bit(&self, data: u8, data_bits: DataBits) -> Option<bool> {
        let mask = if data_bits.count() == 8 {
            0xFF
        } else {
            (1u8 << data_bits.count()) - 1
        };
        let ones_odd = (data & mask).count_ones() % 2 == 1;

        match self {
            Parity::None => None,
            Parity::Even => Some(ones_odd),
            Parity::Odd => Some(!ones_odd),
        }
    }
}

impl std::fmt::Display for Parity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Parity::None => write!(f, "no parity"),
            Parity::Even => write!(f, "even parity"),
            Parity::Odd => write!(f, "odd parity"),
        }
    }
}

/// Decoded frame parameters shared by transmitter and receiver
///
/// Both state machines capture a `FrameFormat` at frame start and hold it
/// for the whole frame, so a control-word change mid-frame never corrupts
/// a frame in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameFormat {
    /// Number of data bits
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl FrameFormat {
    /// Create a frame format from raw integer parameters, validating ranges
    pub fn new(data_bits: u8, parity: Parity, stop_bits: u8) -> Result<Self> {
        if !(5..=8).contains(&data_bits) {
            return Err(UartError::invalid_data_bits(format!(
                "Data bits {} out of range [5, 8]",
                data_bits
            )));
        }
        if !(1..=2).contains(&stop_bits) {
            return Err(UartError::invalid_stop_bits(format!(
                "Stop bits {} out of range [1, 2]",
                stop_bits
            )));
        }

        Ok(FrameFormat {
            data_bits: DataBits::from_selector(data_bits - 5),
            parity,
            stop_bits: if stop_bits == 2 {
                StopBits::Two
            } else {
                StopBits::One
            },
        })
    }

    /// Decode a control word into frame parameters
    ///
    /// Pure and total: any register value yields a usable configuration.
    /// With parity disabled, the parity-type bit is ignored.
    pub fn from_control(word: ControlWord) -> Self {
        let parity = if word.parity_enabled() {
            if word.parity_type_odd() {
                Parity::Odd
            } else {
                Parity::Even
            }
        } else {
            Parity::None
        };

        FrameFormat {
            data_bits: DataBits::from_selector(word.data_bits_selector()),
            parity,
            stop_bits: if word.two_stop_bits() {
                StopBits::Two
            } else {
                StopBits::One
            },
        }
    }

    /// Encode frame parameters back into a control word
    pub fn to_control(&self) -> ControlWord {
        let mut word = ControlWord::new(0);
        word.set_data_bits_selector(self.data_bits.selector());
        word.set_parity_enabled(self.parity != Parity::None);
        word.set_parity_type_odd(self.parity == Parity::Odd);
        word.set_two_stop_bits(self.stop_bits == StopBits::Two);
        word
    }

    /// Total frame length in bit periods (start + data + parity + stop)
    pub fn frame_bits(&self) -> u8 {
        let parity_bits = if self.parity == Parity::None { 0 } else { 1 };
        1 + self.data_bits.count() + parity_bits + self.stop_bits.count()
    }
}

impl Default for FrameFormat {
    fn default() -> Self {
        FrameFormat::from_control(ControlWord::default())
    }
}

impl std::fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}, {}", self.data_bits, self.parity, self.stop_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_eight_n_one() {
        let format = FrameFormat::from_control(ControlWord::new(0b00011));
        assert_eq!(format.data_bits, DataBits::Eight);
        assert_eq!(format.parity, Parity::None);
        assert_eq!(format.stop_bits, StopBits::One);
        assert_eq!(format.frame_bits(), 10);
    }

    #[test]
    fn test_decode_all_fields() {
        // 2 stop bits, odd parity, 6 data bits
        let format = FrameFormat::from_control(ControlWord::new(0b11101));
        assert_eq!(format.data_bits, DataBits::Six);
        assert_eq!(format.parity, Parity::Odd);
        assert_eq!(format.stop_bits, StopBits::Two);
        assert_eq!(format.frame_bits(), 10);
    }

    #[test]
    fn test_parity_type_ignored_when_disabled() {
        let even = FrameFormat::from_control(ControlWord::new(0b00011));
        let odd = FrameFormat::from_control(ControlWord::new(0b00111));
        assert_eq!(even.parity, Parity::None);
        assert_eq!(odd.parity, Parity::None);
    }

    #[test]
    fn test_high_bits_ignored() {
        let format = FrameFormat::from_control(ControlWord::new(0b1110_0011));
        assert_eq!(format.data_bits, DataBits::Eight);
        assert_eq!(format.stop_bits, StopBits::One);
    }

    #[test]
    fn test_control_roundtrip() {
        for raw in 0u8..0b100000 {
            let format = FrameFormat::from_control(ControlWord::new(raw));
            let redecoded = FrameFormat::from_control(format.to_control());
            assert_eq!(format, redecoded);
        }
    }

    #[test]
    fn test_frame_format_validation() {
        assert!(FrameFormat::new(5, Parity::None, 1).is_ok());
        assert!(FrameFormat::new(8, Parity::Odd, 2).is_ok());
        assert!(FrameFormat::new(4, Parity::None, 1).is_err());
        assert!(FrameFormat::new(9, Parity::None, 1).is_err());
        assert!(FrameFormat::new(8, Parity::None, 0).is_err());
        assert!(FrameFormat::new(8, Parity::None, 3).is_err());
    }

    #[test]
    fn test_expected_parity_bit() {
        // 0xA5 has four ones: even parity bit is 0, odd is 1
        assert_eq!(
            Parity::Even.expected_bit(0xA5, DataBits::Eight),
            Some(false)
        );
        assert_eq!(Parity::Odd.expected_bit(0xA5, DataBits::Eight), Some(true));
        assert_eq!(Parity::None.expected_bit(0xA5, DataBits::Eight), None);

        // Masking: 0xE1 restricted to 5 bits is 0b00001, a single one
        assert_eq!(Parity::Even.expected_bit(0xE1, DataBits::Five), Some(true));
    }

    #[test]
    fn test_data_bits_selector() {
        assert_eq!(DataBits::from_selector(0b00).count(), 5);
        assert_eq!(DataBits::from_selector(0b11).count(), 8);
        // Out-of-range selectors are masked, never rejected
        assert_eq!(DataBits::from_selector(0xFF), DataBits::Eight);
    }

    #[test]
    fn test_display() {
        let format = FrameFormat::default();
        assert_eq!(format.to_string(), "8 data bits, no parity, 1 stop bit(s)");
    }
}
