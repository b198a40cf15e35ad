//! Synchronization jump width selection.

use crate::bittiming::algorithm::SjwPolicy;
use crate::bittiming::constants::BitTimingConst;
use crate::bittiming::error::Error;

/// Resolves the SJW for the given phase segments.
///
/// A requested SJW of `0` counts as not requested.
pub fn calc_sjw(
    btc: &BitTimingConst,
    requested: Option<u32>,
    phase_seg1: u32,
    phase_seg2: u32,
    policy: SjwPolicy,
) -> Result<u32, Error> {
    let requested = requested.filter(|&sjw| sjw != 0);

    match policy {
        SjwPolicy::Validate => {
            let sjw = requested.unwrap_or_else(|| default_sjw(phase_seg1, phase_seg2));
            check_sjw(btc, sjw, phase_seg1, phase_seg2)?;
            Ok(sjw)
        }
        SjwPolicy::Clamp => Ok(clamp_sjw(btc, requested, phase_seg2)),
    }
}

/// Half of `phase_seg2`, bounded by `phase_seg1`, at least one quantum.
pub fn default_sjw(phase_seg1: u32, phase_seg2: u32) -> u32 {
    std::cmp::max(1, std::cmp::min(phase_seg1, phase_seg2 / 2))
}

pub fn check_sjw(
    btc: &BitTimingConst,
    sjw: u32,
    phase_seg1: u32,
    phase_seg2: u32,
) -> Result<(), Error> {
    if sjw > btc.sjw_max {
        return Err(Error::SjwExceedsMax {
            sjw,
            max: btc.sjw_max,
        });
    }
    if sjw > phase_seg1 {
        return Err(Error::SjwExceedsPhaseSeg1 { sjw, phase_seg1 });
    }
    if sjw > phase_seg2 {
        return Err(Error::SjwExceedsPhaseSeg2 { sjw, phase_seg2 });
    }
    Ok(())
}

fn clamp_sjw(btc: &BitTimingConst, requested: Option<u32>, phase_seg2: u32) -> u32 {
    match requested {
        Some(sjw) if btc.sjw_max != 0 => sjw.min(btc.sjw_max).min(phase_seg2).max(1),
        _ => 1,
    }
}
