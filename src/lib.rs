//! # CAN Bit Timing
//! The purpose of this crate is to find the bit-timing parameters of a CAN controller: bit-rate prescaler, propagation and phase segments, and synchronization jump width. It reproduces the calculation of the Linux kernel, including a couple of historical variants, and ships a table of known controllers.
//!
//! ## Calculation Example
//!
//! The limits of the controller are paired with its input clock, then the bit-timing for a bitrate is calculated. The sample point defaults to the CiA recommendation.
//!
//! ```rust
//! use can_bit_timing::bittiming::{calc_bittiming, BitTimingRequest, Algorithm};
//!
//! let sja1000 = can_bit_timing::controller::find("sja1000").unwrap();
//! let btc = sja1000.bittiming_const.at_clock(8_000_000);
//!
//! let solution = calc_bittiming(&btc, &BitTimingRequest::new(500_000), Algorithm::default()).unwrap();
//! assert_eq!(solution.timing.brp, 1);
//! assert_eq!(solution.timing.sample_point, 875);
//! assert!(solution.warning.is_none());
//!
//! let registers = sja1000.encoder.unwrap().encode(&solution.timing);
//! println!("BTR0/BTR1: {}", registers);
//! ```
//!
//! ## Builder Example
//!
//! The builder takes a bitrate, hand-picked segments with a time quantum, or raw register values.
//!
//! ```rust
//! use can_bit_timing::bittiming::BitTimingBuilder;
//!
//! let mcan = can_bit_timing::controller::find("mcan-v3.1+").unwrap();
//! let btc = mcan.bittiming_const.at_clock(40_000_000);
//!
//! let solution = BitTimingBuilder::new(btc)
//!     .tq(25)
//!     .prop_seg(1)
//!     .phase_seg1(31)
//!     .phase_seg2(8)
//!     .build()
//!     .unwrap();
//! assert_eq!(solution.timing.bitrate, 975_609);
//! ```
//!

pub mod bittiming;
pub mod controller;
pub mod encoder;
mod error;
pub mod report;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
