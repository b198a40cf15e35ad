//! CAN bit-timing calculation.
//!
//! Given the hardware limits of a controller ([`BitTimingConst`]) this module
//! either searches the prescaler and segment lengths for a bitrate and sample
//! point ([`calc_bittiming`]), or checks and completes a timing chosen by hand
//! ([`fixup_bittiming`]). [`BitTimingBuilder`] wraps both behind one entry point.
//!
//! Everything in here is pure integer arithmetic. Nothing logs, allocates or panics.

pub mod algorithm;
pub mod builder;
pub mod calc;
pub mod constants;
pub mod error;
pub mod fixup;
mod math;
pub mod sample_point;
pub mod sjw;
pub mod types;

pub use algorithm::Algorithm;
pub use builder::BitTimingBuilder;
pub use calc::calc_bittiming;
pub use constants::{cia_sample_point, BitTimingConst, BitTimingLimits, CAN_CALC_MAX_ERROR, CAN_SYNC_SEG};
pub use error::{BitrateError, Error};
pub use fixup::{bittiming_from_registers, fixup_bittiming};
pub use types::{BitTiming, BitTimingRequest, ManualBitTiming, Solution};
