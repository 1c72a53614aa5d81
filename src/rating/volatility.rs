//! Player volatility coefficient (the EGF "con" parameter)
//!
//! Weaker players swing harder: a 100-rated beginner moves up to 116 points
//! per game while a 2700+ player moves at most 10. The table values are
//! fixed by the historical EGF formula; reproducing old rating deltas
//! depends on using exactly these numbers and exactly this interpolation.

/// Volatility per 100-point band, indexed by `floor(rating / 100) - 1`.
const CON_TABLE: [i64; 28] = [
    116, 110, 105, 100, 95, 90, 85, 80, 75, 70, 65, 60, 55, 51, 47, 43, 39, 35, 31, 27, 24, 21,
    18, 15, 13, 11, 10, 10,
];

/// Volatility coefficient for a rating, interpolated within its band.
///
/// The interpolation step is the truncated integer quotient `100 / diff`
/// between neighboring table entries, matching the historical computation
/// rather than an exact linear fit. Bands where both entries are equal are
/// flat.
pub fn con(rating: f64) -> f64 {
    let index = ((rating as i64) / 100).clamp(1, 27) as usize;
    let current = CON_TABLE[index - 1];
    let next = CON_TABLE[index];
    let diff = current - next;
    if diff == 0 {
        return current as f64;
    }
    let step = 100 / diff;
    current as f64 - (rating - (index as f64) * 100.0) / step as f64
}
