//! Historical variants of the Linux kernel bit-timing calculation.
//!
//! The variants only differ in a handful of decisions, captured by [`Quirks`].
//! [`Algorithm::V5_19`] is the current behaviour and the default.

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// How the sample point refiner breaks a tie between its two candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    /// Keep the first candidate (`tseg2` rounded up).
    First,
    /// Prefer the second candidate (`tseg2` one quantum shorter).
    Last,
}

/// Whether a candidate with the same sample point error as the current best
/// replaces it during the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Only a strictly smaller sample point error is taken. Since the search
    /// walks from long to short bit times, this prefers small prescalers.
    Strict,
    /// Equal sample point errors are taken as well.
    NonStrict,
}

/// What happens with a synchronization jump width that doesn't fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SjwPolicy {
    /// Default to `max(1, min(phase_seg1, phase_seg2 / 2))` and reject values
    /// above `sjw_max`, `phase_seg1` or `phase_seg2`.
    Validate,
    /// Default to `1` and silently clamp to `min(sjw_max, phase_seg2)`.
    Clamp,
}

/// How `tseg1` is divided into `prop_seg` and `phase_seg1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentSplit {
    /// `prop_seg = tseg1 / 2`, `phase_seg1` gets the remainder.
    Half,
    /// As [`SegmentSplit::Half`], except that `phase_seg1 = tseg1 / 2` when
    /// `tseg2 > tseg1`. Kept for compatibility with 2.6.31 results.
    Legacy,
}

/// The observable differences between algorithm variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    pub tie_break: TieBreak,
    pub acceptance: Acceptance,
    pub sjw: SjwPolicy,
    pub split: SegmentSplit,
}

/// Bit-timing algorithm, named after the kernel release it was taken from.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    #[default]
    #[strum(serialize = "v5.19")]
    V5_19,
    #[strum(serialize = "v5.16")]
    V5_16,
    #[strum(serialize = "v4.8")]
    V4_8,
    #[strum(serialize = "v3.18")]
    V3_18,
    #[strum(serialize = "v2.6.31")]
    V2_6_31,
}

impl Algorithm {
    pub fn quirks(self) -> Quirks {
        match self {
            Algorithm::V5_19 => Quirks {
                tie_break: TieBreak::First,
                acceptance: Acceptance::Strict,
                sjw: SjwPolicy::Validate,
                split: SegmentSplit::Half,
            },
            Algorithm::V5_16 => Quirks {
                tie_break: TieBreak::First,
                acceptance: Acceptance::Strict,
                sjw: SjwPolicy::Clamp,
                split: SegmentSplit::Half,
            },
            Algorithm::V4_8 => Quirks {
                tie_break: TieBreak::First,
                acceptance: Acceptance::NonStrict,
                sjw: SjwPolicy::Clamp,
                split: SegmentSplit::Half,
            },
            Algorithm::V3_18 => Quirks {
                tie_break: TieBreak::Last,
                acceptance: Acceptance::NonStrict,
                sjw: SjwPolicy::Clamp,
                split: SegmentSplit::Half,
            },
            Algorithm::V2_6_31 => Quirks {
                tie_break: TieBreak::Last,
                acceptance: Acceptance::NonStrict,
                sjw: SjwPolicy::Clamp,
                split: SegmentSplit::Legacy,
            },
        }
    }
}

impl SegmentSplit {
    /// Splits `tseg1` into `(prop_seg, phase_seg1)`.
    pub fn split(self, tseg1: u32, tseg2: u32) -> (u32, u32) {
        match self {
            SegmentSplit::Legacy if tseg2 > tseg1 => {
                let phase_seg1 = tseg1 / 2;
                (tseg1 - phase_seg1, phase_seg1)
            }
            _ => {
                let prop_seg = tseg1 / 2;
                (prop_seg, tseg1 - prop_seg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn names_round_trip() {
        for alg in Algorithm::iter() {
            assert_eq!(Algorithm::from_str(&alg.to_string()), Ok(alg));
        }
        assert_eq!(Algorithm::from_str("v2.6.31"), Ok(Algorithm::V2_6_31));
        assert!(Algorithm::from_str("v6.1").is_err());
    }

    #[test]
    fn default_is_first_listed() {
        assert_eq!(Algorithm::iter().next(), Some(Algorithm::default()));
        assert_eq!(Algorithm::default().quirks().sjw, SjwPolicy::Validate);
    }

    #[test]
    fn half_split() {
        assert_eq!(SegmentSplit::Half.split(13, 2), (6, 7));
        assert_eq!(SegmentSplit::Half.split(1, 8), (0, 1));
        assert_eq!(SegmentSplit::Half.split(15, 4), (7, 8));
    }

    #[test]
    fn legacy_split_only_differs_for_long_tseg2() {
        assert_eq!(SegmentSplit::Legacy.split(13, 2), (6, 7));
        assert_eq!(SegmentSplit::Legacy.split(3, 4), (2, 1));
        assert_eq!(SegmentSplit::Half.split(3, 4), (1, 2));
    }
}
