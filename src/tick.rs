//! Shared 16x-oversampling baud tick generator

use crate::error::{Result, UartError};

/// Free-running timebase producing sixteen ticks per bit period
///
/// One tick is emitted every `divisor` sampling-clock steps. Both state
/// machines observe the same tick stream, which keeps them bit-for-bit
/// synchronized; no state transition happens in either machine except on
/// a tick.
#[derive(Debug, Clone)]
pub struct BaudTickGenerator {
    divisor: u32,
    count: u32,
    enabled: bool,
}

impl BaudTickGenerator {
    /// Create a new tick generator emitting one tick every `divisor` steps
    pub fn new(divisor: u32) -> Result<Self> {
        if divisor == 0 {
            return Err(UartError::invalid_divisor(
                "Divisor must be at least 1".to_string(),
            ));
        }

        Ok(BaudTickGenerator {
            divisor,
            count: 0,
            enabled: true,
        })
    }

    /// Advance one sampling-clock step; returns true on a tick
    ///
    /// While disabled the counter freezes, so re-enabling resumes the
    /// tick phase rather than restarting it.
    pub fn step(&mut self) -> bool {
        if !self.enabled {
            return false;
        }

        self.count += 1;
        if self.count == self.divisor {
            self.count = 0;
            true
        } else {
            false
        }
    }

    /// Gate tick generation
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether tick generation is currently enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get the configured divisor
    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    /// Restart the tick phase
    pub fn reset(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divisor_validation() {
        assert!(BaudTickGenerator::new(0).is_err());
        assert!(BaudTickGenerator::new(1).is_ok());
    }

    #[test]
    fn test_tick_every_step_with_unit_divisor() {
        let mut gen = BaudTickGenerator::new(1).unwrap();
        for _ in 0..32 {
            assert!(gen.step());
        }
    }

    #[test]
    fn test_tick_period_is_constant() {
        let mut gen = BaudTickGenerator::new(4).unwrap();
        let mut gaps = Vec::new();
        let mut since_last = 0u32;

        for _ in 0..64 {
            since_last += 1;
            if gen.step() {
                gaps.push(since_last);
                since_last = 0;
            }
        }

        assert_eq!(gaps.len(), 16);
        assert!(gaps.iter().all(|&g| g == 4));
    }

    #[test]
    fn test_disabled_holds_phase() {
        let mut gen = BaudTickGenerator::new(4).unwrap();
        assert!(!gen.step());
        assert!(!gen.step());
        assert!(!gen.step());

        gen.set_enabled(false);
        for _ in 0..10 {
            assert!(!gen.step());
        }

        // One more enabled step completes the interrupted period
        gen.set_enabled(true);
        assert!(gen.step());
    }
}
