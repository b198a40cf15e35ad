//! Splitting a fixed number of time quanta into `tseg1` and `tseg2` so that the
//! sample point comes as close as possible to, without exceeding, the nominal one.

use crate::bittiming::algorithm::TieBreak;
use crate::bittiming::constants::{BitTimingConst, CAN_SYNC_SEG};
use crate::bittiming::math::{abs_diff, clamp};

/// Sample point error of a `tseg` that has no acceptable split.
pub const SAMPLE_POINT_ERROR_INFINITE: u32 = u32::MAX;

/// Result of refining one `tseg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePointCandidate {
    /// Realized sample point in one-tenth of a percent.
    pub sample_point: u32,
    /// `|nominal - realized|`, or [`SAMPLE_POINT_ERROR_INFINITE`].
    pub sample_point_error: u32,
    pub tseg1: u32,
    pub tseg2: u32,
}

impl SamplePointCandidate {
    pub fn is_acceptable(&self) -> bool {
        self.sample_point_error != SAMPLE_POINT_ERROR_INFINITE
    }
}

/// Picks `(tseg1, tseg2)` with `tseg1 + tseg2 == tseg` for the nominal sample point.
///
/// Two values of `tseg2` are tried: the one derived from the nominal sample point
/// and one quantum less. A candidate is only acceptable if its sample point does
/// not exceed the nominal one and `tseg1` is long enough to hold a propagation and
/// a phase segment. If neither is acceptable the first candidate's segments are
/// returned with an infinite error so the caller can discard this `tseg`.
pub fn update_sample_point(
    btc: &BitTimingConst,
    sample_point_nominal: u32,
    tseg: u32,
    tie_break: TieBreak,
) -> SamplePointCandidate {
    let tsegall = tseg + CAN_SYNC_SEG;
    let tseg1_floor = btc.tseg1_min.max(2);

    let mut best: Option<SamplePointCandidate> = None;
    let mut fallback: Option<SamplePointCandidate> = None;

    for i in 0..=1 {
        let nominal_tseg1 = (sample_point_nominal as u64 * tsegall as u64 / 1000) as u32;
        let tseg2 = tsegall.saturating_sub(nominal_tseg1).saturating_sub(i);
        let mut tseg2 = clamp(tseg2, btc.tseg2_min, btc.tseg2_max);
        let mut tseg1 = tseg.saturating_sub(tseg2);
        if tseg1 > btc.tseg1_max {
            tseg1 = btc.tseg1_max;
            tseg2 = tseg - tseg1;
        }

        let sample_point = (1000 * (CAN_SYNC_SEG + tseg1) as u64 / tsegall as u64) as u32;
        let candidate = SamplePointCandidate {
            sample_point,
            sample_point_error: abs_diff(sample_point_nominal, sample_point),
            tseg1,
            tseg2,
        };
        fallback.get_or_insert(candidate);

        if sample_point > sample_point_nominal || tseg1 < tseg1_floor {
            continue;
        }

        let better = match (best, tie_break) {
            (None, _) => true,
            (Some(b), TieBreak::First) => candidate.sample_point_error < b.sample_point_error,
            (Some(b), TieBreak::Last) => candidate.sample_point_error <= b.sample_point_error,
        };
        if better {
            best = Some(candidate);
        }
    }

    best.unwrap_or_else(|| {
        let fallback = fallback.unwrap_or(SamplePointCandidate {
            sample_point: 0,
            sample_point_error: 0,
            tseg1: 0,
            tseg2: 0,
        });
        SamplePointCandidate {
            sample_point_error: SAMPLE_POINT_ERROR_INFINITE,
            ..fallback
        }
    })
}
