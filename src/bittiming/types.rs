use crate::bittiming::constants::CAN_SYNC_SEG;
use crate::bittiming::error::BitrateError;

/// Target of a bit-timing calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitTimingRequest {
    /// Nominal bitrate in bits per second.
    pub bitrate: u32,
    /// Nominal sample point in one-tenth of a percent, `0` for the CiA recommendation.
    pub sample_point: u32,
    /// Synchronization jump width in time quanta, `None` for the default.
    pub sjw: Option<u32>,
}

impl BitTimingRequest {
    pub fn new(bitrate: u32) -> Self {
        Self {
            bitrate,
            sample_point: 0,
            sjw: None,
        }
    }

    pub fn with_sample_point(mut self, sample_point: u32) -> Self {
        self.sample_point = sample_point;
        self
    }

    pub fn with_sjw(mut self, sjw: u32) -> Self {
        self.sjw = Some(sjw);
        self
    }
}

/// Segments and time quantum chosen by hand, to be checked and completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManualBitTiming {
    pub prop_seg: u32,
    pub phase_seg1: u32,
    pub phase_seg2: u32,
    /// Time quantum in nanoseconds.
    pub tq_ns: u32,
    pub sjw: Option<u32>,
}

impl From<&BitTiming> for ManualBitTiming {
    fn from(bt: &BitTiming) -> Self {
        Self {
            prop_seg: bt.prop_seg,
            phase_seg1: bt.phase_seg1,
            phase_seg2: bt.phase_seg2,
            tq_ns: bt.tq_ns,
            sjw: Some(bt.sjw),
        }
    }
}

/// Bit-timing parameters as programmed into a controller.
///
/// All segments are in time quanta and at least one quantum long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitTiming {
    pub prop_seg: u32,
    pub phase_seg1: u32,
    pub phase_seg2: u32,
    pub sjw: u32,
    pub brp: u32,
    /// Time quantum in nanoseconds, for display only.
    pub tq_ns: u32,
    /// Realized bitrate in bits per second.
    pub bitrate: u32,
    /// Realized sample point in one-tenth of a percent.
    pub sample_point: u32,
}

impl BitTiming {
    /// Duration of one bit in time quanta.
    pub fn bit_time_tq(&self) -> u32 {
        CAN_SYNC_SEG + self.prop_seg + self.phase_seg1 + self.phase_seg2
    }

    /// `prop_seg + phase_seg1`, as most registers want it.
    pub fn tseg1(&self) -> u32 {
        self.prop_seg + self.phase_seg1
    }

    pub fn tseg2(&self) -> u32 {
        self.phase_seg2
    }
}

/// A successful calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    pub timing: BitTiming,
    /// Set if the bitrate is not matched exactly.
    pub warning: Option<BitrateError>,
}

impl From<BitTiming> for Solution {
    fn from(timing: BitTiming) -> Self {
        Self {
            timing,
            warning: None,
        }
    }
}
