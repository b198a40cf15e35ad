//! Builder for CAN bit-timing settings.
//!
//! One builder accepts three kinds of input:
//! - a target `bitrate` (+ optional `sample_point`), solved by searching
//! - a manual timing: time quantum plus `prop_seg`, `phase_seg1`, `phase_seg2`
//! - raw register values: `brp`, `tseg1`, `tseg2`
//!
//! An `sjw` and the [`Algorithm`] variant can be given in every mode.

use crate::bittiming::algorithm::Algorithm;
use crate::bittiming::calc::calc_bittiming;
use crate::bittiming::constants::BitTimingConst;
use crate::bittiming::error::Error;
use crate::bittiming::fixup::{bittiming_from_registers, fixup_bittiming};
use crate::bittiming::types::{BitTimingRequest, ManualBitTiming, Solution};

/// Builder for CAN bit-timing settings.
///
/// ## Bitrate mode
///
/// An SJA1000 behind an 8 MHz crystal, at the CiA sample point for 500 kbit/s.
///
/// ```rust
/// use can_bit_timing::bittiming::{BitTimingBuilder, BitTimingConst};
///
/// let sja1000 = BitTimingConst {
///     clock_hz: 8_000_000,
///     tseg1_min: 1,
///     tseg1_max: 16,
///     tseg2_min: 1,
///     tseg2_max: 8,
///     sjw_max: 4,
///     brp_min: 1,
///     brp_max: 64,
///     brp_inc: 1,
/// };
///
/// let solution = BitTimingBuilder::new(sja1000).bitrate(500_000).build().unwrap();
///
/// assert_eq!(solution.timing.brp, 1);
/// assert_eq!(solution.timing.sample_point, 875);
/// assert_eq!(solution.warning, None);
/// ```
///
/// ## Manual mode
///
/// A 25 ns time quantum on an M_CAN at 40 MHz. The prescaler follows from the clock.
///
/// ```rust
/// use can_bit_timing::bittiming::{BitTimingBuilder, BitTimingConst};
///
/// let mcan = BitTimingConst {
///     clock_hz: 40_000_000,
///     tseg1_min: 2,
///     tseg1_max: 256,
///     tseg2_min: 2,
///     tseg2_max: 128,
///     sjw_max: 128,
///     brp_min: 1,
///     brp_max: 512,
///     brp_inc: 1,
/// };
///
/// let solution = BitTimingBuilder::new(mcan)
///     .tq(25)
///     .prop_seg(1)
///     .phase_seg1(31)
///     .phase_seg2(8)
///     .build()
///     .unwrap();
///
/// assert_eq!(solution.timing.brp, 1);
/// assert_eq!(solution.timing.bitrate, 975_609);
/// assert_eq!(solution.timing.sample_point, 804);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BitTimingBuilder {
    timing_const: BitTimingConst,
    algorithm: Algorithm,
    bitrate: Option<u32>,
    sample_point: Option<u32>,
    sjw: Option<u32>,
    tq_ns: Option<u32>,
    prop_seg: Option<u32>,
    phase_seg1: Option<u32>,
    phase_seg2: Option<u32>,
    brp: Option<u32>,
    tseg1: Option<u32>,
    tseg2: Option<u32>,
}

impl BitTimingBuilder {
    pub fn new(timing_const: BitTimingConst) -> Self {
        Self {
            timing_const,
            algorithm: Algorithm::default(),
            bitrate: None,
            sample_point: None,
            sjw: None,
            tq_ns: None,
            prop_seg: None,
            phase_seg1: None,
            phase_seg2: None,
            brp: None,
            tseg1: None,
            tseg2: None,
        }
    }

    /// Target bitrate in bits per second.
    pub fn bitrate(mut self, bitrate: u32) -> Self {
        self.bitrate = Some(bitrate);
        self
    }

    /// Target sample point in one-tenth of a percent. `0` picks the CiA default.
    pub fn sample_point(mut self, sample_point: u32) -> Self {
        self.sample_point = Some(sample_point);
        self
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Synchronization jump width override.
    pub fn sjw(mut self, sjw: u32) -> Self {
        self.sjw = Some(sjw);
        self
    }

    /// Time quantum in nanoseconds.
    pub fn tq(mut self, tq_ns: u32) -> Self {
        self.tq_ns = Some(tq_ns);
        self
    }

    pub fn prop_seg(mut self, prop_seg: u32) -> Self {
        self.prop_seg = Some(prop_seg);
        self
    }

    pub fn phase_seg1(mut self, phase_seg1: u32) -> Self {
        self.phase_seg1 = Some(phase_seg1);
        self
    }

    pub fn phase_seg2(mut self, phase_seg2: u32) -> Self {
        self.phase_seg2 = Some(phase_seg2);
        self
    }

    /// Raw bit-rate prescaler.
    pub fn brp(mut self, brp: u32) -> Self {
        self.brp = Some(brp);
        self
    }

    /// Raw `tseg1`, split into `prop_seg = tseg1 / 2` and `phase_seg1`.
    pub fn tseg1(mut self, tseg1: u32) -> Self {
        self.tseg1 = Some(tseg1);
        self
    }

    /// Raw `tseg2`, the same as `phase_seg2`.
    pub fn tseg2(mut self, tseg2: u32) -> Self {
        self.tseg2 = Some(tseg2);
        self
    }

    pub fn build(self) -> Result<Solution, Error> {
        let has_bitrate_mode = self.bitrate.is_some();
        let has_manual_fields = self.tq_ns.is_some()
            || self.prop_seg.is_some()
            || self.phase_seg1.is_some()
            || self.phase_seg2.is_some();
        let has_register_fields =
            self.brp.is_some() || self.tseg1.is_some() || self.tseg2.is_some();

        let modes = [has_bitrate_mode, has_manual_fields, has_register_fields]
            .into_iter()
            .filter(|&mode| mode)
            .count();
        if modes > 1 {
            return Err(Error::MixedConfiguration);
        }

        if has_bitrate_mode {
            self.build_from_bitrate()
        } else if self.sample_point.is_some() {
            // a sample point alone is only meaningful together with a bitrate
            Err(Error::MixedConfiguration)
        } else if has_manual_fields {
            self.build_from_manual()
        } else if has_register_fields {
            self.build_from_registers()
        } else {
            Err(Error::MissingConfiguration)
        }
    }

    fn build_from_bitrate(self) -> Result<Solution, Error> {
        let bitrate = self.bitrate.ok_or(Error::MissingConfiguration)?;

        let mut request = BitTimingRequest::new(bitrate);
        if let Some(sample_point) = self.sample_point {
            if sample_point >= 1000 {
                return Err(Error::InvalidSamplePoint(sample_point));
            }
            request = request.with_sample_point(sample_point);
        }
        request.sjw = self.sjw;

        calc_bittiming(&self.timing_const, &request, self.algorithm)
    }

    fn build_from_manual(self) -> Result<Solution, Error> {
        let manual = ManualBitTiming {
            prop_seg: self.prop_seg.ok_or(Error::MissingField("prop_seg"))?,
            phase_seg1: self.phase_seg1.ok_or(Error::MissingField("phase_seg1"))?,
            phase_seg2: self.phase_seg2.ok_or(Error::MissingField("phase_seg2"))?,
            tq_ns: self.tq_ns.ok_or(Error::MissingField("tq"))?,
            sjw: self.sjw,
        };

        fixup_bittiming(&self.timing_const, &manual, self.algorithm)
    }

    fn build_from_registers(self) -> Result<Solution, Error> {
        let brp = self.brp.ok_or(Error::MissingField("brp"))?;
        let tseg1 = self.tseg1.ok_or(Error::MissingField("tseg1"))?;
        let tseg2 = self.tseg2.ok_or(Error::MissingField("tseg2"))?;

        bittiming_from_registers(
            &self.timing_const,
            brp,
            tseg1,
            tseg2,
            self.sjw,
            self.algorithm,
        )
    }
}
