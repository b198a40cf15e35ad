//! Integer helpers shared by the search and fixup paths.
//!
//! All inputs are unsigned. Products that may exceed 32 bits are computed by
//! the callers in `u64` before being handed to [`div_round_closest`].

/// `|a - b|` without underflow.
#[inline]
pub fn abs_diff(a: u32, b: u32) -> u32 {
    a.abs_diff(b)
}

/// `min(max(v, lo), hi)`. The caller guarantees `lo <= hi`.
#[inline]
pub fn clamp(v: u32, lo: u32, hi: u32) -> u32 {
    v.max(lo).min(hi)
}

/// `(n + d / 2) / d`: unsigned 64 by 32 bit division rounded to the closest integer.
///
/// Returns `0` for `d == 0` instead of trapping.
#[inline]
pub fn div_round_closest(n: u64, d: u32) -> u64 {
    if d == 0 {
        return 0;
    }
    let d = d as u64;
    (n + d / 2) / d
}

/// Whether `n` is an exact integer multiple of `d`.
#[inline]
pub fn is_multiple_of(n: u32, d: u32) -> bool {
    d != 0 && n % d == 0
}
