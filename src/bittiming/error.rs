//! Error types for the bit-timing calculation.

use std::fmt;

use thiserror::Error;

/// Which user supplied segment was empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segment {
    PropSeg,
    PhaseSeg1,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::PropSeg => write!(f, "prop-seg"),
            Segment::PhaseSeg1 => write!(f, "phase-seg1"),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("bitrate {bitrate} not possible")]
    BitrateNotPossible { bitrate: u32 },
    #[error("bitrate error: {}.{}% too high", .permille / 10, .permille % 10)]
    BitrateErrorTooHigh { permille: u32 },
    #[error("prop-seg + phase-seg1: {tseg1} less than tseg1-min: {min}")]
    PropPhase1BelowMin { tseg1: u32, min: u32 },
    #[error("prop-seg + phase-seg1: {tseg1} greater than tseg1-max: {max}")]
    PropPhase1AboveMax { tseg1: u32, max: u32 },
    #[error("phase-seg2: {phase_seg2} less than tseg2-min: {min}")]
    PhaseSeg2BelowMin { phase_seg2: u32, min: u32 },
    #[error("phase-seg2: {phase_seg2} greater than tseg2-max: {max}")]
    PhaseSeg2AboveMax { phase_seg2: u32, max: u32 },
    #[error("resulting brp: {brp} less than brp-min: {min}")]
    BrpBelowMin { brp: u32, min: u32 },
    #[error("resulting brp: {brp} greater than brp-max: {max}")]
    BrpAboveMax { brp: u32, max: u32 },
    #[error("brp: {brp} is not a multiple of brp-inc: {brp_inc} above brp-min: {min}")]
    BrpNotAdmissible { brp: u32, min: u32, brp_inc: u32 },
    #[error("sjw: {sjw} greater than max sjw: {max}")]
    SjwExceedsMax { sjw: u32, max: u32 },
    #[error("sjw: {sjw} greater than phase-seg1: {phase_seg1}")]
    SjwExceedsPhaseSeg1 { sjw: u32, phase_seg1: u32 },
    #[error("sjw: {sjw} greater than phase-seg2: {phase_seg2}")]
    SjwExceedsPhaseSeg2 { sjw: u32, phase_seg2: u32 },
    #[error("{0} must be at least one time quantum")]
    EmptySegment(Segment),
    #[error("sample point {0} must be below 1000 (one-tenth of a percent)")]
    InvalidSamplePoint(u32),
    #[error("cannot mix bitrate-based and manual timing configuration")]
    MixedConfiguration,
    #[error("no bitrate or timing configuration provided")]
    MissingConfiguration,
    #[error("missing timing field: {0}")]
    MissingField(&'static str),
}

/// Non-fatal difference between the requested and the realized bitrate.
///
/// Returned next to a successful calculation whenever the bitrate could not be
/// matched exactly. Errors above [`CAN_CALC_MAX_ERROR`](crate::bittiming::CAN_CALC_MAX_ERROR)
/// are reported as [`Error::BitrateErrorTooHigh`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitrateError {
    /// Error in one-tenth of a percent, rounded down.
    pub permille: u32,
}

impl fmt::Display for BitrateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bitrate error: {}.{}%", self.permille / 10, self.permille % 10)
    }
}
