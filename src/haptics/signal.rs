//! Vibrotactile signal descriptions
//!
//! The waveform type is an opaque byte handed to the actuator firmware as is.
//! Only steady and sine are known to the current firmware; configuration may
//! carry other codes through untouched.

use serde::{Deserialize, Serialize};

use crate::consts::NB_ROD_LENGTHS;

/// Waveform codes understood by the actuator firmware
pub mod signal_type {
    pub const STEADY: u8 = 0x01;
    pub const SINE: u8 = 0x02;

    /// Human readable name for logging
    pub fn name(code: u8) -> &'static str {
        match code {
            STEADY => "steady",
            SINE => "sine",
            _ => "unknown",
        }
    }
}

/// Parameters of one actuator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub signal_type: u8,
    pub amplitude: u8,
    pub offset: u8,
    pub duty: u8,
    pub period: u16,
    pub phase: u16,
}

impl Signal {
    /// Short, full-amplitude pulse marking a sustained collision
    pub const IMPULSE: Signal = Signal::steady(255);

    pub const fn new(
        signal_type: u8,
        amplitude: u8,
        offset: u8,
        duty: u8,
        period: u16,
        phase: u16,
    ) -> Self {
        Self {
            signal_type,
            amplitude,
            offset,
            duty,
            period,
            phase,
        }
    }

    pub const fn steady(amplitude: u8) -> Self {
        Self::new(signal_type::STEADY, amplitude, 0, 0, 0, 0)
    }

    pub const fn sine(amplitude: u8, period: u16) -> Self {
        Self::new(signal_type::SINE, amplitude, 0, 0, period, 0)
    }
}

/// One signal per rod length, indexed by `length - 1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalTable([Signal; NB_ROD_LENGTHS]);

impl Default for SignalTable {
    /// Sine waves that slow down as rods get longer
    fn default() -> Self {
        Self(std::array::from_fn(|i| Signal::sine(200, 100 + 50 * i as u16)))
    }
}

impl SignalTable {
    pub fn new(signals: [Signal; NB_ROD_LENGTHS]) -> Self {
        Self(signals)
    }

    /// Signal for a rod of the given length, if the length is in 1..=10
    pub fn get(&self, length: u8) -> Option<&Signal> {
        usize::from(length)
            .checked_sub(1)
            .and_then(|i| self.0.get(i))
    }

    pub fn signals(&self) -> &[Signal; NB_ROD_LENGTHS] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup_by_length() {
        let table = SignalTable::default();
        assert_eq!(table.get(1).map(|s| s.period), Some(100));
        assert_eq!(table.get(10).map(|s| s.period), Some(550));
        assert!(table.get(0).is_none());
        assert!(table.get(11).is_none());
    }

    #[test]
    fn test_unknown_signal_type_passes_through_serde() {
        let json = r#"{"signal_type":5,"amplitude":1,"offset":2,"duty":3,"period":4,"phase":6}"#;
        let signal: Signal = serde_json::from_str(json).unwrap();
        assert_eq!(signal.signal_type, 5);
        assert_eq!(signal_type::name(signal.signal_type), "unknown");
    }

    #[test]
    fn test_impulse_is_full_amplitude_steady() {
        assert_eq!(Signal::IMPULSE.signal_type, signal_type::STEADY);
        assert_eq!(Signal::IMPULSE.amplitude, 255);
    }
}
