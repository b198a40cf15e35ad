//! Controller hardware limits and the constants of the calculation.

use crate::bittiming::math::is_multiple_of;

/// The synchronization segment is always one time quantum long.
pub const CAN_SYNC_SEG: u32 = 1;

/// Maximum accepted bitrate error, in one-tenth of a percent (5.0%).
pub const CAN_CALC_MAX_ERROR: u32 = 50;

/// Sample point in one-tenth of a percent recommended by CiA for `bitrate`.
pub fn cia_sample_point(bitrate: u32) -> u32 {
    if bitrate > 800_000 {
        750
    } else if bitrate > 500_000 {
        800
    } else {
        875
    }
}

/// Bit timing ranges of a controller, independent of its input clock.
///
/// This is what the controller table stores. Pair it with a clock using
/// [`BitTimingLimits::at_clock`] to get something the solver can work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitTimingLimits {
    pub tseg1_min: u32,
    pub tseg1_max: u32,
    pub tseg2_min: u32,
    pub tseg2_max: u32,
    pub sjw_max: u32,
    pub brp_min: u32,
    pub brp_max: u32,
    pub brp_inc: u32,
}

impl BitTimingLimits {
    pub const fn at_clock(self, clock_hz: u32) -> BitTimingConst {
        BitTimingConst {
            clock_hz,
            tseg1_min: self.tseg1_min,
            tseg1_max: self.tseg1_max,
            tseg2_min: self.tseg2_min,
            tseg2_max: self.tseg2_max,
            sjw_max: self.sjw_max,
            brp_min: self.brp_min,
            brp_max: self.brp_max,
            brp_inc: self.brp_inc,
        }
    }
}

/// Hardware limits and input clock used to calculate and validate CAN bit timing.
///
/// `tseg1` is `prop_seg + phase_seg1`, `tseg2` is `phase_seg2`. All bounds are
/// inclusive. The descriptor is assumed to be well formed: `min <= max` for every
/// pair and `clock_hz > 0`. A `brp_inc` of `0` is treated as `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitTimingConst {
    pub clock_hz: u32,
    pub tseg1_min: u32,
    pub tseg1_max: u32,
    pub tseg2_min: u32,
    pub tseg2_max: u32,
    pub sjw_max: u32,
    pub brp_min: u32,
    pub brp_max: u32,
    pub brp_inc: u32,
}

impl BitTimingConst {
    /// Prescaler step, never zero.
    #[inline]
    pub fn brp_step(&self) -> u32 {
        self.brp_inc.max(1)
    }

    /// Whether `brp` is inside the prescaler range and on the `brp_inc` grid
    /// starting at `brp_min`.
    pub fn brp_is_admissible(&self, brp: u32) -> bool {
        brp >= self.brp_min
            && brp <= self.brp_max
            && is_multiple_of(brp - self.brp_min, self.brp_step())
    }

    /// Rounds `brp` down onto the `brp_inc` grid starting at `brp_min`.
    ///
    /// Returns `None` if `brp` is below `brp_min`.
    pub fn floor_brp(&self, brp: u32) -> Option<u32> {
        if brp < self.brp_min {
            return None;
        }
        Some(brp - (brp - self.brp_min) % self.brp_step())
    }

    pub fn limits(&self) -> BitTimingLimits {
        BitTimingLimits {
            tseg1_min: self.tseg1_min,
            tseg1_max: self.tseg1_max,
            tseg2_min: self.tseg2_min,
            tseg2_max: self.tseg2_max,
            sjw_max: self.sjw_max,
            brp_min: self.brp_min,
            brp_max: self.brp_max,
            brp_inc: self.brp_inc,
        }
    }
}
