//! Bit-timing calculation for a nominal bitrate and sample point.
//!
//! Derived from the Linux kernel's `can_calc_bittiming()`, which in turn is
//! based on LinCAN.

use crate::bittiming::algorithm::{Acceptance, Algorithm};
use crate::bittiming::constants::{
    cia_sample_point, BitTimingConst, CAN_CALC_MAX_ERROR, CAN_SYNC_SEG,
};
use crate::bittiming::error::{BitrateError, Error};
use crate::bittiming::math::{abs_diff, div_round_closest};
use crate::bittiming::sample_point::{update_sample_point, SAMPLE_POINT_ERROR_INFINITE};
use crate::bittiming::sjw::calc_sjw;
use crate::bittiming::types::{BitTiming, BitTimingRequest, Solution};

const NSEC_PER_SEC: u64 = 1_000_000_000;

/// Calculates prescaler, segments and SJW for `request` on the controller `btc`.
///
/// The search walks all `tseg = tseg1 + tseg2` from the longest to the shortest
/// bit, trying the prescaler rounded down and up for each. The candidate with the
/// smallest bitrate error wins, ties are broken by the sample point error.
///
/// Fails with [`Error::BitrateNotPossible`] if no prescaler fits, and with
/// [`Error::BitrateErrorTooHigh`] if the best bitrate is more than
/// [`CAN_CALC_MAX_ERROR`] permille off. Smaller errors are returned as a
/// warning in the [`Solution`].
pub fn calc_bittiming(
    btc: &BitTimingConst,
    request: &BitTimingRequest,
    algorithm: Algorithm,
) -> Result<Solution, Error> {
    let quirks = algorithm.quirks();
    let bitrate = request.bitrate;

    if bitrate == 0 || btc.clock_hz == 0 {
        return Err(Error::BitrateNotPossible { bitrate });
    }

    let sample_point_nominal = if request.sample_point != 0 {
        request.sample_point
    } else {
        cia_sample_point(bitrate)
    };

    let mut best_bitrate_error = u32::MAX;
    let mut best_sample_point_error = SAMPLE_POINT_ERROR_INFINITE;
    let mut best: Option<(u32, u32)> = None;

    let max_tseg = (btc.tseg1_max + btc.tseg2_max) * 2 + 1;
    let min_tseg = (btc.tseg1_min + btc.tseg2_min) * 2;

    // tseg even = round down, odd = round up
    for tseg_double in (min_tseg..=max_tseg).rev() {
        let tseg = tseg_double / 2;
        let tsegall = CAN_SYNC_SEG + tseg;

        let brp = (btc.clock_hz as u64 / (tsegall as u64 * bitrate as u64)) as u32;
        let brp = brp.saturating_add(tseg_double % 2);

        // choose brp step which is possible in system
        let Some(brp) = btc.floor_brp(brp) else {
            continue;
        };
        if brp == 0 || brp > btc.brp_max {
            continue;
        }

        let calc_bitrate = (btc.clock_hz as u64 / (brp as u64 * tsegall as u64)) as u32;
        let bitrate_error = abs_diff(bitrate, calc_bitrate);

        if bitrate_error > best_bitrate_error {
            continue;
        }

        // reset sample point error if we have a better bitrate
        if bitrate_error < best_bitrate_error {
            best_sample_point_error = SAMPLE_POINT_ERROR_INFINITE;
        }

        let candidate = update_sample_point(btc, sample_point_nominal, tseg, quirks.tie_break);
        if !candidate.is_acceptable() {
            continue;
        }

        let worse = match quirks.acceptance {
            Acceptance::Strict => candidate.sample_point_error >= best_sample_point_error,
            Acceptance::NonStrict => candidate.sample_point_error > best_sample_point_error,
        };
        if worse {
            continue;
        }

        best_bitrate_error = bitrate_error;
        best_sample_point_error = candidate.sample_point_error;
        best = Some((tseg, brp));

        if bitrate_error == 0 && candidate.sample_point_error == 0 {
            break;
        }
    }

    let Some((best_tseg, best_brp)) = best else {
        return Err(Error::BitrateNotPossible { bitrate });
    };

    let mut warning = None;
    if best_bitrate_error != 0 {
        // error in one-tenth of a percent
        let permille = (best_bitrate_error as u64 * 1000 / bitrate as u64) as u32;
        if permille > CAN_CALC_MAX_ERROR {
            return Err(Error::BitrateErrorTooHigh { permille });
        }
        warning = Some(BitrateError { permille });
    }

    // real sample point
    let candidate = update_sample_point(btc, sample_point_nominal, best_tseg, quirks.tie_break);
    let (prop_seg, phase_seg1) = quirks.split.split(candidate.tseg1, candidate.tseg2);
    let phase_seg2 = candidate.tseg2;

    let sjw = calc_sjw(btc, request.sjw, phase_seg1, phase_seg2, quirks.sjw)?;

    let mut timing = BitTiming {
        prop_seg,
        phase_seg1,
        phase_seg2,
        sjw,
        brp: best_brp,
        tq_ns: u32::try_from(div_round_closest(best_brp as u64 * NSEC_PER_SEC, btc.clock_hz))
            .unwrap_or(u32::MAX),
        bitrate: 0,
        sample_point: candidate.sample_point,
    };

    // real bitrate
    timing.bitrate = (btc.clock_hz as u64 / (best_brp as u64 * timing.bit_time_tq() as u64)) as u32;

    Ok(Solution { timing, warning })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BTC: BitTimingConst = BitTimingConst {
        clock_hz: 80_000_000,
        tseg1_min: 1,
        tseg1_max: 16,
        tseg2_min: 1,
        tseg2_max: 8,
        sjw_max: 4,
        brp_min: 1,
        brp_max: 1024,
        brp_inc: 1,
    };

    fn calc(bitrate: u32, sample_point: u32) -> Result<Solution, Error> {
        calc_bittiming(
            &BTC,
            &BitTimingRequest::new(bitrate).with_sample_point(sample_point),
            Algorithm::default(),
        )
    }

    #[test]
    fn bitrate_500k_800() {
        let solution = calc(500_000, 800).unwrap();

        assert_eq!(
            solution.timing,
            BitTiming {
                prop_seg: 7,
                phase_seg1: 8,
                phase_seg2: 4,
                sjw: 2,
                brp: 8,
                tq_ns: 100,
                bitrate: 500_000,
                sample_point: 800,
            }
        );
        assert_eq!(solution.warning, None);
    }

    #[test]
    fn default_sample_point() {
        let solution = calc(2_000_000, 0).unwrap();

        assert_eq!(solution.timing.bitrate, 2_000_000);
        assert_eq!(solution.timing.sample_point, 750);
    }

    #[test]
    fn requested_sjw_is_kept() {
        let request = BitTimingRequest::new(500_000)
            .with_sample_point(800)
            .with_sjw(4);
        let solution = calc_bittiming(&BTC, &request, Algorithm::V5_19).unwrap();
        assert_eq!(solution.timing.sjw, 4);
    }

    #[test]
    fn requested_sjw_too_large() {
        let request = BitTimingRequest::new(500_000)
            .with_sample_point(800)
            .with_sjw(5);
        assert_eq!(
            calc_bittiming(&BTC, &request, Algorithm::V5_19),
            Err(Error::SjwExceedsMax { sjw: 5, max: 4 })
        );

        // the legacy algorithms clamp instead
        let solution = calc_bittiming(&BTC, &request, Algorithm::V4_8).unwrap();
        assert_eq!(solution.timing.sjw, 4);
    }

    #[test]
    fn zero_bitrate() {
        assert_eq!(calc(0, 0), Err(Error::BitrateNotPossible { bitrate: 0 }));
    }

    #[test]
    fn zero_clock() {
        let btc = BitTimingConst { clock_hz: 0, ..BTC };
        assert_eq!(
            calc_bittiming(&btc, &BitTimingRequest::new(500_000), Algorithm::default()),
            Err(Error::BitrateNotPossible { bitrate: 500_000 })
        );
    }

    #[test]
    fn strict_acceptance_prefers_small_prescaler() {
        // 160 clocks per bit: 20 tq * 8, 16 tq * 10, 8 tq * 20 and 4 tq * 40 all
        // sample at 750 for a nominal 777
        let request = BitTimingRequest::new(500_000).with_sample_point(777);

        let current = calc_bittiming(&BTC, &request, Algorithm::V5_19).unwrap();
        assert_eq!(current.timing.brp, 8);
        assert_eq!(
            (
                current.timing.prop_seg,
                current.timing.phase_seg1,
                current.timing.phase_seg2
            ),
            (7, 7, 5)
        );
        assert_eq!(current.timing.sjw, 2);
        assert_eq!(current.timing.sample_point, 750);

        let legacy = calc_bittiming(&BTC, &request, Algorithm::V4_8).unwrap();
        assert_eq!(legacy.timing.brp, 40);
        assert_eq!(
            (
                legacy.timing.prop_seg,
                legacy.timing.phase_seg1,
                legacy.timing.phase_seg2
            ),
            (1, 1, 1)
        );
        assert_eq!(legacy.timing.sjw, 1);
        assert_eq!(legacy.timing.sample_point, 750);
        assert_eq!(legacy.timing.bitrate, 500_000);
    }

    #[test]
    fn legacy_split_with_long_phase_seg2() {
        let request = BitTimingRequest::new(500_000).with_sample_point(400);

        let current = calc_bittiming(&BTC, &request, Algorithm::V5_19).unwrap();
        assert_eq!(current.timing.brp, 16);
        assert_eq!(
            (
                current.timing.prop_seg,
                current.timing.phase_seg1,
                current.timing.phase_seg2
            ),
            (1, 2, 6)
        );
        assert_eq!(current.timing.sample_point, 400);

        let legacy = calc_bittiming(&BTC, &request, Algorithm::V2_6_31).unwrap();
        assert_eq!(legacy.timing.brp, 16);
        assert_eq!(
            (
                legacy.timing.prop_seg,
                legacy.timing.phase_seg1,
                legacy.timing.phase_seg2
            ),
            (2, 1, 6)
        );
        assert_eq!(legacy.timing.sample_point, 400);
    }

    #[test]
    fn brp_increment_from_brp_min() {
        let btc = BitTimingConst {
            brp_min: 1,
            brp_inc: 2,
            ..BTC
        };
        let solution = calc_bittiming(
            &btc,
            &BitTimingRequest::new(500_000).with_sample_point(800),
            Algorithm::default(),
        )
        .unwrap();

        // only odd prescalers: 7 * 23 tq is the closest to 160 clocks
        assert!(btc.brp_is_admissible(solution.timing.brp));
        assert_eq!(solution.timing.brp, 7);
        assert_eq!(solution.timing.bit_time_tq(), 23);
        assert_eq!(solution.timing.bitrate, 496_894);
        assert_eq!(solution.warning, Some(BitrateError { permille: 6 }));
    }
}
