//! Checking and completing bit-timing parameters given by hand.

use crate::bittiming::algorithm::Algorithm;
use crate::bittiming::constants::{BitTimingConst, CAN_SYNC_SEG};
use crate::bittiming::error::{Error, Segment};
use crate::bittiming::math::div_round_closest;
use crate::bittiming::sjw::calc_sjw;
use crate::bittiming::types::{BitTiming, ManualBitTiming, Solution};

const NSEC_PER_SEC: u64 = 1_000_000_000;

/// Validates the segments in `manual` against `btc` and derives the prescaler
/// from the requested time quantum.
///
/// The prescaler is rounded to the closest multiple of `brp_inc` and must then
/// be admissible. The reported `tq_ns` is recalculated from the prescaler, so it
/// may differ from the request.
pub fn fixup_bittiming(
    btc: &BitTimingConst,
    manual: &ManualBitTiming,
    algorithm: Algorithm,
) -> Result<Solution, Error> {
    check_segments(btc, manual.prop_seg, manual.phase_seg1, manual.phase_seg2)?;

    let sjw = calc_sjw(
        btc,
        manual.sjw,
        manual.phase_seg1,
        manual.phase_seg2,
        algorithm.quirks().sjw,
    )?;

    let brp = brp_from_tq(btc, manual.tq_ns);
    check_brp(btc, brp)?;

    Ok(complete(btc, manual.prop_seg, manual.phase_seg1, manual.phase_seg2, sjw, brp).into())
}

/// Decodes raw register values: a prescaler and the two time segments.
///
/// `tseg1` is split into `prop_seg = tseg1 / 2` and `phase_seg1`. Unlike
/// [`fixup_bittiming`] the prescaler is taken as is and must be admissible.
pub fn bittiming_from_registers(
    btc: &BitTimingConst,
    brp: u32,
    tseg1: u32,
    tseg2: u32,
    sjw: Option<u32>,
    algorithm: Algorithm,
) -> Result<Solution, Error> {
    let prop_seg = tseg1 / 2;
    let phase_seg1 = tseg1 - prop_seg;
    check_segments(btc, prop_seg, phase_seg1, tseg2)?;

    let sjw = calc_sjw(btc, sjw, phase_seg1, tseg2, algorithm.quirks().sjw)?;

    check_brp(btc, brp)?;

    Ok(complete(btc, prop_seg, phase_seg1, tseg2, sjw, brp).into())
}

fn check_segments(
    btc: &BitTimingConst,
    prop_seg: u32,
    phase_seg1: u32,
    phase_seg2: u32,
) -> Result<(), Error> {
    if prop_seg == 0 {
        return Err(Error::EmptySegment(Segment::PropSeg));
    }
    if phase_seg1 == 0 {
        return Err(Error::EmptySegment(Segment::PhaseSeg1));
    }

    let Some(tseg1) = prop_seg.checked_add(phase_seg1) else {
        return Err(Error::PropPhase1AboveMax {
            tseg1: u32::MAX,
            max: btc.tseg1_max,
        });
    };
    if tseg1 < btc.tseg1_min {
        return Err(Error::PropPhase1BelowMin {
            tseg1,
            min: btc.tseg1_min,
        });
    }
    if tseg1 > btc.tseg1_max {
        return Err(Error::PropPhase1AboveMax {
            tseg1,
            max: btc.tseg1_max,
        });
    }
    if phase_seg2 < btc.tseg2_min {
        return Err(Error::PhaseSeg2BelowMin {
            phase_seg2,
            min: btc.tseg2_min,
        });
    }
    if phase_seg2 > btc.tseg2_max {
        return Err(Error::PhaseSeg2AboveMax {
            phase_seg2,
            max: btc.tseg2_max,
        });
    }
    Ok(())
}

/// Range first, then the `brp_inc` grid starting at `brp_min`.
fn check_brp(btc: &BitTimingConst, brp: u32) -> Result<(), Error> {
    if brp < btc.brp_min {
        return Err(Error::BrpBelowMin {
            brp,
            min: btc.brp_min,
        });
    }
    if brp > btc.brp_max {
        return Err(Error::BrpAboveMax {
            brp,
            max: btc.brp_max,
        });
    }
    if !btc.brp_is_admissible(brp) {
        return Err(Error::BrpNotAdmissible {
            brp,
            min: btc.brp_min,
            brp_inc: btc.brp_step(),
        });
    }
    Ok(())
}

/// Fills in tq, bitrate and sample point for checked segments and prescaler.
fn complete(
    btc: &BitTimingConst,
    prop_seg: u32,
    phase_seg1: u32,
    phase_seg2: u32,
    sjw: u32,
    brp: u32,
) -> BitTiming {
    let mut timing = BitTiming {
        prop_seg,
        phase_seg1,
        phase_seg2,
        sjw,
        brp,
        tq_ns: u32::try_from(div_round_closest(brp as u64 * NSEC_PER_SEC, btc.clock_hz))
            .unwrap_or(u32::MAX),
        bitrate: 0,
        sample_point: 0,
    };

    let bit_time = timing.bit_time_tq();
    timing.bitrate = (btc.clock_hz as u64 / (brp as u64 * bit_time as u64)) as u32;
    timing.sample_point = (CAN_SYNC_SEG + timing.tseg1()) * 1000 / bit_time;
    timing
}

/// The practicable prescaler for a time quantum of `tq_ns`.
fn brp_from_tq(btc: &BitTimingConst, tq_ns: u32) -> u32 {
    let brp_inc = btc.brp_step() as u64;

    let mut brp64 = btc.clock_hz as u64 * tq_ns as u64;
    brp64 /= brp_inc;
    brp64 += NSEC_PER_SEC / 2 - 1;
    brp64 /= NSEC_PER_SEC;
    brp64 *= brp_inc;

    u32::try_from(brp64).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MCAN: BitTimingConst = BitTimingConst {
        clock_hz: 40_000_000,
        tseg1_min: 2,
        tseg1_max: 256,
        tseg2_min: 2,
        tseg2_max: 128,
        sjw_max: 128,
        brp_min: 1,
        brp_max: 512,
        brp_inc: 1,
    };

    fn manual(prop_seg: u32, phase_seg1: u32, phase_seg2: u32, tq_ns: u32) -> ManualBitTiming {
        ManualBitTiming {
            prop_seg,
            phase_seg1,
            phase_seg2,
            tq_ns,
            sjw: None,
        }
    }

    #[test]
    fn mcan_40mhz() {
        let solution = fixup_bittiming(&MCAN, &manual(1, 31, 8, 25), Algorithm::default()).unwrap();
        assert_eq!(
            solution.timing,
            BitTiming {
                prop_seg: 1,
                phase_seg1: 31,
                phase_seg2: 8,
                sjw: 4,
                brp: 1,
                tq_ns: 25,
                bitrate: 975_609,
                sample_point: 804,
            }
        );
        assert_eq!(solution.warning, None);
    }

    #[test]
    fn tq_rounds_to_closest_brp() {
        // 40 MHz: brp 2 is 50 ns, brp 3 is 75 ns
        let at = |tq_ns| brp_from_tq(&MCAN, tq_ns);
        assert_eq!(at(50), 2);
        assert_eq!(at(62), 2);
        assert_eq!(at(63), 3);
        assert_eq!(at(75), 3);
    }

    #[test]
    fn tq_with_brp_inc() {
        let btc = BitTimingConst { brp_inc: 4, ..MCAN };
        // 40 MHz * 230 ns = 9.2 clocks -> 2.3 steps of 4 -> brp 8
        assert_eq!(brp_from_tq(&btc, 230), 8);
        // 40 MHz * 260 ns = 10.4 clocks -> 2.6 steps of 4 -> brp 12
        assert_eq!(brp_from_tq(&btc, 260), 12);
    }

    #[test]
    fn reported_tq_is_recalculated() {
        let solution = fixup_bittiming(&MCAN, &manual(1, 31, 8, 60), Algorithm::default()).unwrap();
        assert_eq!(solution.timing.brp, 2);
        assert_eq!(solution.timing.tq_ns, 50);
    }

    #[test]
    fn segment_ranges() {
        assert_eq!(
            fixup_bittiming(&MCAN, &manual(1, 0, 8, 25), Algorithm::default()),
            Err(Error::EmptySegment(Segment::PhaseSeg1))
        );
        assert_eq!(
            fixup_bittiming(&MCAN, &manual(0, 31, 8, 25), Algorithm::default()),
            Err(Error::EmptySegment(Segment::PropSeg))
        );
        assert_eq!(
            fixup_bittiming(&MCAN, &manual(200, 57, 8, 25), Algorithm::default()),
            Err(Error::PropPhase1AboveMax { tseg1: 257, max: 256 })
        );
        assert_eq!(
            fixup_bittiming(&MCAN, &manual(1, 31, 1, 25), Algorithm::default()),
            Err(Error::PhaseSeg2BelowMin {
                phase_seg2: 1,
                min: 2
            })
        );
        assert_eq!(
            fixup_bittiming(&MCAN, &manual(1, 31, 129, 25), Algorithm::default()),
            Err(Error::PhaseSeg2AboveMax {
                phase_seg2: 129,
                max: 128
            })
        );

        let btc = BitTimingConst {
            tseg1_min: 4,
            ..MCAN
        };
        assert_eq!(
            fixup_bittiming(&btc, &manual(1, 2, 8, 25), Algorithm::default()),
            Err(Error::PropPhase1BelowMin { tseg1: 3, min: 4 })
        );
    }

    #[test]
    fn brp_range() {
        assert_eq!(
            fixup_bittiming(&MCAN, &manual(1, 31, 8, 10), Algorithm::default()),
            Err(Error::BrpBelowMin { brp: 0, min: 1 })
        );
        assert_eq!(
            fixup_bittiming(&MCAN, &manual(1, 31, 8, 13_000), Algorithm::default()),
            Err(Error::BrpAboveMax { brp: 520, max: 512 })
        );
    }

    #[test]
    fn tq_must_land_on_brp_grid() {
        let odd = BitTimingConst {
            brp_min: 1,
            brp_inc: 2,
            ..MCAN
        };
        assert_eq!(
            fixup_bittiming(&odd, &manual(5, 5, 4, 50), Algorithm::default()),
            Err(Error::BrpNotAdmissible {
                brp: 2,
                min: 1,
                brp_inc: 2
            })
        );

        let even = BitTimingConst { brp_min: 2, ..odd };
        let solution = fixup_bittiming(&even, &manual(5, 5, 4, 50), Algorithm::default()).unwrap();
        assert_eq!(solution.timing.brp, 2);
        assert_eq!(solution.timing.bitrate, 1_333_333);
        assert_eq!(solution.timing.sample_point, 733);
    }

    #[test]
    fn huge_segments_are_above_max() {
        assert_eq!(
            fixup_bittiming(&MCAN, &manual(u32::MAX, 1, 4, 25), Algorithm::default()),
            Err(Error::PropPhase1AboveMax {
                tseg1: u32::MAX,
                max: 256
            })
        );
    }

    #[test]
    fn tq_saturates_for_slow_clocks() {
        let btc = BitTimingConst {
            clock_hz: 1,
            brp_max: 1024,
            ..MCAN
        };
        let solution =
            bittiming_from_registers(&btc, 1024, 4, 4, None, Algorithm::default()).unwrap();
        assert_eq!(solution.timing.tq_ns, u32::MAX);
    }

    #[test]
    fn sjw_checked_before_brp() {
        let mut m = manual(1, 31, 8, 10);
        m.sjw = Some(9);
        assert_eq!(
            fixup_bittiming(&MCAN, &m, Algorithm::default()),
            Err(Error::SjwExceedsPhaseSeg2 {
                sjw: 9,
                phase_seg2: 8
            })
        );
        assert_eq!(
            fixup_bittiming(&MCAN, &manual(1, 31, 8, 25), Algorithm::V4_8)
                .unwrap()
                .timing
                .sjw,
            1
        );
    }

    #[test]
    fn registers_decoded() {
        let solution =
            bittiming_from_registers(&MCAN, 1, 32, 8, None, Algorithm::default()).unwrap();
        assert_eq!(solution.timing.prop_seg, 16);
        assert_eq!(solution.timing.phase_seg1, 16);
        assert_eq!(solution.timing.bitrate, 975_609);
        assert_eq!(solution.timing.sample_point, 804);
    }

    #[test]
    fn registers_need_admissible_brp() {
        let btc = BitTimingConst {
            brp_min: 1,
            brp_inc: 2,
            ..MCAN
        };
        assert!(bittiming_from_registers(&btc, 3, 32, 8, None, Algorithm::default()).is_ok());
        assert_eq!(
            bittiming_from_registers(&btc, 4, 32, 8, None, Algorithm::default()),
            Err(Error::BrpNotAdmissible {
                brp: 4,
                min: 1,
                brp_inc: 2
            })
        );
        assert_eq!(
            bittiming_from_registers(&btc, 513, 32, 8, None, Algorithm::default()),
            Err(Error::BrpAboveMax { brp: 513, max: 512 })
        );
    }
}
