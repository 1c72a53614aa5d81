//! EGF rating computation
//!
//! This module holds the rating calculator interface, the EGF formula
//! implementation, and the volatility coefficient table it depends on.

pub mod engine;
pub mod volatility;

// Re-export commonly used types
pub use engine::{EgfRatingCalculator, MockRatingCalculator, RatingCalculator};
pub use volatility::con;
