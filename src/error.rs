//! Error types for UART transceiver configuration

use thiserror::Error;

/// Result type for UART transceiver operations
pub type Result<T> = std::result::Result<T, UartError>;

/// Error types encountered while configuring the transceiver
///
/// Receive-side frame and parity faults are *not* errors in this sense:
/// they are frame-scoped status flags reported alongside every completed
/// frame (see [`Status`]), because the receiver never discards a frame.
///
/// [`Status`]: crate::Status
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UartError {
    /// Data-bit count outside the supported 5..=8 range
    #[error("Invalid data bits: {0}")]
    InvalidDataBits(String),

    /// Stop-bit count outside the supported 1..=2 range
    #[error("Invalid stop bits: {0}")]
    InvalidStopBits(String),

    /// Baud divisor that cannot produce a tick stream
    #[error("Invalid divisor: {0}")]
    InvalidDivisor(String),
}

impl UartError {
    /// Create a new InvalidDataBits error
    pub fn invalid_data_bits(msg: impl Into<String>) -> Self {
        UartError::InvalidDataBits(msg.into())
    }

    /// Create a new InvalidStopBits error
    pub fn invalid_stop_bits(msg: impl Into<String>) -> Self {
        UartError::InvalidStopBits(msg.into())
    }

    /// Create a new InvalidDivisor error
    pub fn invalid_divisor(msg: impl Into<String>) -> Self {
        UartError::InvalidDivisor(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UartError::invalid_data_bits("test");
        assert!(err.to_string().contains("Invalid data bits"));

        let err = UartError::invalid_divisor("zero");
        assert!(err.to_string().contains("Invalid divisor"));
    }
}
