//! Calculate CAN bit timing parameters for known controllers.

use std::io::{self, Write};
use std::process::ExitCode;
use std::str::FromStr;

use clap::{ArgAction, Parser};
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

use can_bit_timing::bittiming::{Algorithm, ManualBitTiming};
use can_bit_timing::controller::{self, Controller};
use can_bit_timing::report::{ManualTiming, Report, ReportOptions};
use can_bit_timing::Error;

#[derive(Parser, Debug)]
#[command(
    name = "can-calc-bit-timing",
    version,
    about = "Calculate CAN bit timing parameters",
    after_help = "Supply low level bit timing parameters (--tq with --prop-seg/--phase-seg1/--phase-seg2, \
                  or --brp with --tseg1/--tseg2) to decode them instead."
)]
struct Cli {
    /// Don't print header line
    #[arg(short, action = ArgAction::SetTrue)]
    quiet: bool,

    /// List all supported CAN controller names
    #[arg(short, action = ArgAction::SetTrue)]
    list: bool,

    /// Arbitration bit-rate in bits/sec
    #[arg(short, value_name = "BITRATE")]
    bitrate: Option<u32>,

    /// Data bit-rate in bits/sec
    #[arg(short, value_name = "BITRATE")]
    data_bitrate: Option<u32>,

    /// Sample-point in one-tenth of a percent, or 0 for CIA recommended sample points
    #[arg(short, value_name = "SAMP_PT", default_value_t = 0, value_parser = parse_sample_point)]
    sample_point: u32,

    /// Real CAN system clock in Hz
    #[arg(short, value_name = "CLOCK")]
    clock: Option<u32>,

    /// Choose specified algorithm for bit-timing calculation, list them without a value
    #[arg(long, value_name = "ALG", num_args = 0..=1, default_missing_value = "")]
    alg: Option<String>,

    /// Time quantum in ns
    #[arg(long)]
    tq: Option<u32>,

    /// Propagation segment in TQs
    #[arg(long)]
    prop_seg: Option<u32>,

    /// Phase buffer segment 1 in TQs
    #[arg(long)]
    phase_seg1: Option<u32>,

    /// Phase buffer segment 2 in TQs
    #[arg(long)]
    phase_seg2: Option<u32>,

    /// Synchronisation jump width in TQs
    #[arg(long)]
    sjw: Option<u32>,

    /// Bit-rate prescaler
    #[arg(long)]
    brp: Option<u32>,

    /// Time segment 1 = prop-seg + phase-seg1
    #[arg(long)]
    tseg1: Option<u32>,

    /// Time segment 2 = phase_seg2
    #[arg(long)]
    tseg2: Option<u32>,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "error")]
    log_level: String,

    /// More logging, may be repeated
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// CAN controller name, all controllers if omitted
    controller: Option<String>,
}

fn parse_sample_point(s: &str) -> Result<u32, String> {
    let sample_point: u32 = s.parse().map_err(|e| format!("{}", e))?;
    if sample_point != 0 && !(100..1000).contains(&sample_point) {
        return Err("sample point must be 0 or in 100..1000".to_string());
    }
    Ok(sample_point)
}

impl Cli {
    fn log_filter(&self) -> EnvFilter {
        let level = match self.verbose {
            0 => self.log_level.as_str(),
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }

    fn algorithm(&self) -> Result<Algorithm, Error> {
        match self.alg.as_deref() {
            None | Some("default") => Ok(Algorithm::default()),
            Some(name) => {
                Algorithm::from_str(name).map_err(|_| Error::UnknownAlgorithm(name.to_string()))
            }
        }
    }

    /// `--tseg1` overrides `--prop-seg` and `--phase-seg1`.
    fn segments(&self) -> (Option<u32>, Option<u32>) {
        match self.tseg1 {
            Some(tseg1) => {
                let prop_seg = tseg1 / 2;
                (Some(prop_seg), Some(tseg1 - prop_seg))
            }
            None => (self.prop_seg, self.phase_seg1),
        }
    }

    fn manual(&self) -> Option<ManualTiming> {
        let (prop_seg, phase_seg1) = self.segments();
        let prop_seg = prop_seg.filter(|&p| p != 0)?;
        let phase_seg1 = phase_seg1.unwrap_or(0);
        let phase_seg2 = self.phase_seg2.or(self.tseg2).unwrap_or(0);

        match (self.tq, self.brp) {
            (None, Some(brp)) => Some(ManualTiming::Registers {
                brp,
                tseg1: prop_seg.saturating_add(phase_seg1),
                tseg2: phase_seg2,
                sjw: self.sjw,
            }),
            (tq, _) => Some(ManualTiming::Segments(ManualBitTiming {
                prop_seg,
                phase_seg1,
                phase_seg2,
                tq_ns: tq.unwrap_or(0),
                sjw: self.sjw,
            })),
        }
    }

    fn report_options(&self, algorithm: Algorithm) -> ReportOptions {
        ReportOptions {
            quiet: self.quiet,
            algorithm,
            sample_point: self.sample_point,
            ref_clock: self.clock.filter(|&c| c != 0),
            bitrate: self.bitrate.filter(|&b| b != 0),
            data_bitrate: self.data_bitrate.filter(|&b| b != 0),
            manual: self.manual(),
        }
    }
}

fn list_controllers<W: Write>(w: &mut W) -> io::Result<()> {
    for name in controller::names() {
        writeln!(w, "{}", name)?;
    }
    Ok(())
}

fn list_algorithms<W: Write>(w: &mut W) -> io::Result<()> {
    for alg in Algorithm::iter() {
        writeln!(w, "    {}", alg)?;
    }
    Ok(())
}

fn run(cli: Cli) -> io::Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.alg.as_deref() == Some("") {
        writeln!(out, "Supported CAN calc bit timing algorithms:\n")?;
        list_algorithms(&mut out)?;
        writeln!(out)?;
        return Ok(ExitCode::SUCCESS);
    }

    if cli.list {
        list_controllers(&mut out)?;
        return Ok(ExitCode::SUCCESS);
    }

    let algorithm = match cli.algorithm() {
        Ok(algorithm) => algorithm,
        Err(e) => {
            eprintln!("error: {}, try one of these:\n", e);
            list_algorithms(&mut io::stderr())?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let controllers: Vec<&Controller> = match cli.controller.as_deref() {
        None => controller::all().iter().collect(),
        Some(name) => match controller::find(name) {
            Ok(controller) => vec![controller],
            Err(e) => {
                eprintln!("error: {}, try one of these:\n", e);
                list_controllers(&mut io::stderr())?;
                return Ok(ExitCode::FAILURE);
            }
        },
    };

    let report = Report::new(cli.report_options(algorithm));
    for controller in controllers {
        report.write_controller(&mut out, controller)?;
    }
    out.flush()?;

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter())
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
