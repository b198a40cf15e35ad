//! Tabular report of bit timings for a controller across clocks and bitrates.

use std::io::{self, Write};

use tracing::{debug, warn};

use crate::bittiming::{
    bittiming_from_registers, calc_bittiming, cia_sample_point, fixup_bittiming, Algorithm,
    BitTimingConst, BitTimingLimits, BitTimingRequest, ManualBitTiming, Solution,
};
use crate::controller::{Controller, Phase, RefClock, COMMON_BITRATES, COMMON_DATA_BITRATES};
use crate::encoder::Encoder;

/// Hand-picked timing to be checked against every clock instead of searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualTiming {
    /// Segments and a time quantum, the prescaler follows from the clock.
    Segments(ManualBitTiming),
    /// Segments and a prescaler, the time quantum follows from the clock.
    Registers {
        brp: u32,
        tseg1: u32,
        tseg2: u32,
        sjw: Option<u32>,
    },
}

impl ManualTiming {
    fn solve(&self, btc: &BitTimingConst, algorithm: Algorithm) -> Result<Solution, crate::Error> {
        let solution = match *self {
            ManualTiming::Segments(manual) => fixup_bittiming(btc, &manual, algorithm)?,
            ManualTiming::Registers {
                brp,
                tseg1,
                tseg2,
                sjw,
            } => bittiming_from_registers(btc, brp, tseg1, tseg2, sjw, algorithm)?,
        };
        Ok(solution)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportOptions {
    /// Only print the header for the first table.
    pub quiet: bool,
    pub algorithm: Algorithm,
    /// Nominal sample point in one-tenth of a percent, `0` for the CiA recommendation.
    pub sample_point: u32,
    /// Replaces the controller's reference clocks.
    pub ref_clock: Option<u32>,
    /// Replaces the common nominal bitrates.
    pub bitrate: Option<u32>,
    /// Replaces the common data bitrates.
    pub data_bitrate: Option<u32>,
    pub manual: Option<ManualTiming>,
}

pub struct Report {
    options: ReportOptions,
}

impl Report {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Writes the tables for the nominal and, if present, the data phase of `controller`.
    pub fn write_controller<W: Write>(&self, w: &mut W, controller: &Controller) -> io::Result<()> {
        let ref_clocks = self.ref_clocks(controller);

        self.write_phase(
            w,
            controller,
            Phase::Nominal,
            controller.bittiming_const,
            &ref_clocks,
            &self.bitrates(Phase::Nominal),
        )?;

        if let Some(limits) = controller.data_bittiming_const {
            self.write_phase(
                w,
                controller,
                Phase::Data,
                limits,
                &ref_clocks,
                &self.bitrates(Phase::Data),
            )?;
        }
        Ok(())
    }

    fn ref_clocks(&self, controller: &Controller) -> Vec<RefClock> {
        match self.options.ref_clock {
            Some(clk) => vec![RefClock {
                clk,
                name: Some("cmd-line"),
            }],
            None => controller.ref_clocks.to_vec(),
        }
    }

    fn bitrates(&self, phase: Phase) -> Vec<u32> {
        let option = match phase {
            Phase::Nominal => self.options.bitrate,
            Phase::Data => self.options.data_bitrate.or(self.options.bitrate),
        };
        match (option, phase) {
            (Some(bitrate), _) => vec![bitrate],
            (None, Phase::Nominal) => COMMON_BITRATES.to_vec(),
            (None, Phase::Data) => COMMON_DATA_BITRATES.to_vec(),
        }
    }

    fn write_phase<W: Write>(
        &self,
        w: &mut W,
        controller: &Controller,
        phase: Phase,
        limits: BitTimingLimits,
        ref_clocks: &[RefClock],
        bitrates: &[u32],
    ) -> io::Result<()> {
        if ref_clocks.is_empty() && !self.options.quiet {
            writeln!(
                w,
                "Skipping bit timing parameter calculation for {}, no ref clock defined\n",
                controller.name
            )?;
        }

        for ref_clock in ref_clocks {
            let btc = limits.at_clock(ref_clock.clk);

            for (i, &bitrate) in bitrates.iter().enumerate() {
                if i == 0 && !self.options.quiet {
                    self.write_header(w, controller, phase, ref_clock)?;
                }
                let line = self.line(&btc, controller.encoder, bitrate);
                writeln!(w, "{}", line)?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    fn write_header<W: Write>(
        &self,
        w: &mut W,
        controller: &Controller,
        phase: Phase,
        ref_clock: &RefClock,
    ) -> io::Result<()> {
        let registers = controller.encoder.map(Encoder::header).unwrap_or_default();

        writeln!(
            w,
            "{}Bit timing parameters for {} with {} using algo '{}'",
            if phase == Phase::Data { "Data " } else { "" },
            controller.name,
            ref_clock,
            self.options.algorithm
        )?;
        writeln!(
            w,
            " nominal                                  real  Bitrt    nom   real  SampP"
        )?;
        writeln!(
            w,
            " Bitrate TQ[ns] PrS PhS1 PhS2 SJW BRP  Bitrate  Error  SampP  SampP  Error   {}",
            registers
        )
    }

    /// One table row for `bitrate` on `btc`, without the trailing newline.
    pub fn line(&self, btc: &BitTimingConst, encoder: Option<Encoder>, bitrate: u32) -> String {
        let sample_point = if self.options.sample_point != 0 {
            self.options.sample_point
        } else {
            cia_sample_point(bitrate)
        };

        let result = match &self.options.manual {
            Some(manual) => manual.solve(btc, self.options.algorithm),
            None => {
                let request = BitTimingRequest::new(bitrate).with_sample_point(sample_point);
                calc_bittiming(btc, &request, self.options.algorithm).map_err(crate::Error::from)
            }
        };

        let solution = match result {
            Ok(solution) => solution,
            Err(e) => {
                debug!("{} bit/s at {} Hz: {}", bitrate, btc.clock_hz, e);
                return match self.options.manual {
                    Some(_) => format!("{:8} ***parameters exceed controller's range***", bitrate),
                    None => format!("{:8} ***bitrate not possible***", bitrate),
                };
            }
        };

        if let Some(warning) = solution.warning {
            warn!("{} bit/s at {} Hz: {}", bitrate, btc.clock_hz, warning);
        }

        let bt = solution.timing;
        let mut line = format!(
            "{:8} {:6} {:3} {:4} {:4} {:3} {:3} {:8}  ",
            bitrate, bt.tq_ns, bt.prop_seg, bt.phase_seg1, bt.phase_seg2, bt.sjw, bt.brp, bt.bitrate
        );

        line.push_str(&percent(bitrate.abs_diff(bt.bitrate), bitrate));
        line.push_str("  ");
        line.push_str(&format!(
            "{:4.1}%  {:4.1}%  ",
            sample_point as f64 / 10.0,
            bt.sample_point as f64 / 10.0
        ));
        line.push_str(&percent(sample_point.abs_diff(bt.sample_point), sample_point));
        line.push_str("   ");

        if let Some(encoder) = encoder {
            line.push_str(&encoder.encode(&bt).to_string());
        }
        line
    }
}

/// `error` relative to `nominal` in percent, capped at 100.
fn percent(error: u32, nominal: u32) -> String {
    let percent = if nominal == 0 {
        f64::INFINITY
    } else {
        100.0 * error as f64 / nominal as f64
    };

    if percent > 99.9 {
        "≥100%".to_string()
    } else {
        format!("{:4.1}%", percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller;

    fn render(options: ReportOptions, name: &str) -> String {
        let mut out = Vec::new();
        Report::new(options)
            .write_controller(&mut out, controller::find(name).unwrap())
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn sja1000_500k() {
        let options = ReportOptions {
            bitrate: Some(500_000),
            ref_clock: Some(8_000_000),
            ..Default::default()
        };
        let out = render(options, "sja1000");
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(
            lines[0],
            "Bit timing parameters for sja1000 with 8.000000 MHz ref clock (cmd-line) using algo 'v5.19'"
        );
        assert!(lines[2].ends_with("BTR0 BTR1"));
        assert_eq!(
            lines[3],
            "  500000    125   6    7    2   1   1   500000   0.0%  87.5%  87.5%   0.0%   0x00 0x1c"
        );
        assert_eq!(lines[4], "");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn quiet_has_no_header() {
        let options = ReportOptions {
            quiet: true,
            bitrate: Some(500_000),
            ref_clock: Some(8_000_000),
            ..Default::default()
        };
        let out = render(options, "sja1000");
        assert!(!out.contains("Bit timing parameters"));
        assert!(out.starts_with("  500000"));
    }

    #[test]
    fn not_possible() {
        let options = ReportOptions {
            quiet: true,
            bitrate: Some(1_000),
            ref_clock: Some(8_000_000),
            ..Default::default()
        };
        assert_eq!(
            render(options, "sja1000"),
            "    1000 ***bitrate not possible***\n\n"
        );
    }

    #[test]
    fn manual_out_of_range() {
        let options = ReportOptions {
            quiet: true,
            bitrate: Some(500_000),
            ref_clock: Some(8_000_000),
            manual: Some(ManualTiming::Segments(ManualBitTiming {
                prop_seg: 10,
                phase_seg1: 10,
                phase_seg2: 2,
                tq_ns: 125,
                sjw: None,
            })),
            ..Default::default()
        };
        assert_eq!(
            render(options, "sja1000"),
            "  500000 ***parameters exceed controller's range***\n\n"
        );
    }

    #[test]
    fn manual_registers() {
        let options = ReportOptions {
            quiet: true,
            bitrate: Some(500_000),
            ref_clock: Some(8_000_000),
            manual: Some(ManualTiming::Registers {
                brp: 1,
                tseg1: 13,
                tseg2: 2,
                sjw: None,
            }),
            ..Default::default()
        };
        let out = render(options, "sja1000");
        assert!(out.contains("   500000   0.0%"), "{}", out);
        assert!(out.contains("0x00 0x1c"), "{}", out);
    }

    #[test]
    fn skips_controllers_without_clock() {
        let options = ReportOptions {
            bitrate: Some(500_000),
            ..Default::default()
        };
        assert_eq!(
            render(options, "sun4i_can"),
            "Skipping bit timing parameter calculation for sun4i_can, no ref clock defined\n\n"
        );
    }

    #[test]
    fn fd_controller_has_data_table() {
        let options = ReportOptions {
            bitrate: Some(1_000_000),
            data_bitrate: Some(2_000_000),
            ref_clock: Some(40_000_000),
            ..Default::default()
        };
        let out = render(options, "mcan-v3.1+");
        assert!(out.contains("Bit timing parameters for mcan-v3.1+"));
        assert!(out.contains("Data Bit timing parameters for mcan-v3.1+"));
        assert!(out.contains(" 1000000 "));
        assert!(out.contains(" 2000000 "));
    }

    #[test]
    fn default_bitrates() {
        let options = ReportOptions {
            quiet: true,
            ..Default::default()
        };
        let out = render(options, "sja1000");
        // two reference clocks, every common bitrate and a blank line each
        assert_eq!(out.lines().count(), 2 * (COMMON_BITRATES.len() + 1));
    }

    #[test]
    fn percent_is_capped() {
        assert_eq!(percent(0, 500_000), " 0.0%");
        assert_eq!(percent(3_000, 500_000), " 0.6%");
        assert_eq!(percent(500_000, 500_000), "≥100%");
        assert_eq!(percent(1, 0), "≥100%");
    }
}
