//! Known CAN controllers and their bit-timing limits.
//!
//! ```rust
//! let sja1000 = can_bit_timing::controller::find("sja1000").unwrap();
//! assert_eq!(sja1000.bittiming_const.brp_max, 64);
//! assert_eq!(sja1000.ref_clocks[0].clk, 8_000_000);
//! ```

mod table;

use std::fmt;

use crate::bittiming::{BitTimingConst, BitTimingLimits};
use crate::encoder::Encoder;
use crate::Error;

/// Nominal bitrates calculated when none is given.
pub static COMMON_BITRATES: &[u32] = &[
    1_000_000, 800_000, 666_666, 500_000, 250_000, 125_000, 100_000, 83_333, 50_000, 33_333,
    20_000, 10_000,
];

/// Data phase bitrates calculated when none is given.
pub static COMMON_DATA_BITRATES: &[u32] = &[
    12_000_000, 10_000_000, 8_000_000, 5_000_000, 4_000_000, 2_000_000, 1_000_000,
];

/// A clock a controller is commonly fed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RefClock {
    /// Frequency in Hz.
    pub clk: u32,
    /// Board or SoC this clock is found on.
    pub name: Option<&'static str>,
}

impl fmt::Display for RefClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} MHz ref clock", self.clk as f64 / 1_000_000.0)?;
        if let Some(name) = self.name {
            write!(f, " ({})", name)?;
        }
        Ok(())
    }
}

/// Which phase of a CAN FD frame a set of limits applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Nominal,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Controller {
    pub name: &'static str,
    /// Limits of the arbitration phase.
    pub bittiming_const: BitTimingLimits,
    /// Limits of the data phase, CAN FD controllers only.
    pub data_bittiming_const: Option<BitTimingLimits>,
    pub ref_clocks: &'static [RefClock],
    /// Register layout used to print the timing, if known.
    pub encoder: Option<Encoder>,
}

impl Controller {
    pub fn is_fd(&self) -> bool {
        self.data_bittiming_const.is_some()
    }

    pub fn limits(&self, phase: Phase) -> Option<BitTimingLimits> {
        match phase {
            Phase::Nominal => Some(self.bittiming_const),
            Phase::Data => self.data_bittiming_const,
        }
    }

    /// Limits of `phase` at the clock `clock_hz`.
    pub fn at_clock(&self, phase: Phase, clock_hz: u32) -> Result<BitTimingConst, Error> {
        self.limits(phase)
            .map(|limits| limits.at_clock(clock_hz))
            .ok_or_else(|| Error::NoDataPhase(self.name.to_string()))
    }
}

/// All known controllers, in display order.
pub fn all() -> &'static [Controller] {
    table::CONTROLLERS
}

/// Looks up a controller by name.
pub fn find(name: &str) -> Result<&'static Controller, Error> {
    let controller = all()
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| Error::UnknownController(name.to_string()))?;

    tracing::debug!(
        "Found controller {} ({} ref clocks, fd: {})",
        controller.name,
        controller.ref_clocks.len(),
        controller.is_fd()
    );
    Ok(controller)
}

/// Names of all known controllers, in display order.
pub fn names() -> impl Iterator<Item = &'static str> {
    all().iter().map(|c| c.name)
}
