//! Common types used throughout the rating service

use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for players (three-digit numeric string in the club records)
pub type PlayerId = String;

/// Lowest rating a player can hold; updates below this are clamped up
pub const RATING_FLOOR: f64 = 100.0;

/// Exclusive upper bound of the valid rating range
pub const RATING_LIMIT: f64 = 2800.0;

/// Highest rating an update may produce; gains beyond this are clamped down
pub const RATING_CEILING: f64 = 2799.0;

/// Check that a rating lies in the valid [100, 2800) range.
///
/// NaN fails both comparisons and is rejected like any out-of-range value.
pub fn validate_rating(rating: f64) -> Result<()> {
    if rating >= RATING_FLOOR && rating < RATING_LIMIT {
        Ok(())
    } else {
        Err(RatingError::RatingOutOfRange { rating }.into())
    }
}

/// Clamp an updated rating into the representable [100, 2799] range.
pub fn clamp_rating(rating: f64) -> f64 {
    rating.clamp(RATING_FLOOR, RATING_CEILING)
}

/// Which side of a match won
///
/// The engine identifies the winner by side rather than by rating value,
/// so two players holding identical ratings are never ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    FirstPlayer,
    SecondPlayer,
}

/// Tournament class, weighting how strongly a game counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TournamentClass {
    A,
    B,
    C,
}

impl TournamentClass {
    /// Multiplier applied to the rating increment
    pub fn weight(&self) -> f64 {
        match self {
            TournamentClass::A => 1.0,
            TournamentClass::B => 0.75,
            TournamentClass::C => 0.5,
        }
    }

    /// Resolve a raw weight value to a class.
    pub fn from_weight(weight: f64) -> Result<Self> {
        if weight == 1.0 {
            Ok(TournamentClass::A)
        } else if weight == 0.75 {
            Ok(TournamentClass::B)
        } else if weight == 0.5 {
            Ok(TournamentClass::C)
        } else {
            Err(RatingError::InvalidTournamentClass { weight }.into())
        }
    }

    /// Letter used in the game-notation column
    pub fn letter(&self) -> char {
        match self {
            TournamentClass::A => 'a',
            TournamentClass::B => 'b',
            TournamentClass::C => 'c',
        }
    }
}

impl FromStr for TournamentClass {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "a" | "A" => Ok(TournamentClass::A),
            "b" | "B" => Ok(TournamentClass::B),
            "c" | "C" => Ok(TournamentClass::C),
            other => Err(RatingError::MalformedGameNotation {
                notation: other.to_string(),
            }
            .into()),
        }
    }
}

impl fmt::Display for TournamentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Kyu/dan grade derived from a rating, for display only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Grade {
    Kyu(u8),
    Dan(u8),
}

impl Grade {
    /// Derive the grade from a rating.
    ///
    /// Each 100-point band maps to one grade: 100..200 is 20k, 2000..2100
    /// is 1k, 2100..2200 is 1d and so on up to 7d. Ratings below 100 fall
    /// into the weakest kyu band.
    pub fn from_rating(rating: f64) -> Self {
        let band = (rating as i64 / 100) * 100;
        if band < 200 {
            Grade::Kyu(20)
        } else if band <= 2000 {
            Grade::Kyu((20 - (band - 100) / 100) as u8)
        } else {
            Grade::Dan(((band - 2000) / 100).min(7) as u8)
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Kyu(n) => write!(f, "{}k", n),
            Grade::Dan(n) => write!(f, "{}d", n),
        }
    }
}

impl FromStr for Grade {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (digits, kind) = s.split_at(s.len().saturating_sub(1));
        let n: u8 = digits.parse().map_err(|_| RatingError::StorageError {
            message: format!("unparseable grade: {s}"),
        })?;
        match kind {
            "k" => Ok(Grade::Kyu(n)),
            "d" => Ok(Grade::Dan(n)),
            _ => Err(RatingError::StorageError {
                message: format!("unparseable grade: {s}"),
            }
            .into()),
        }
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.to_string()
    }
}

impl TryFrom<String> for Grade {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse().map_err(|e: anyhow::Error| e.to_string())
    }
}

/// One finished game, ready for rating
///
/// Ephemeral value: built per match, consumed immediately by the
/// calculator, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub rating_a: f64,
    pub rating_b: f64,
    pub winner: Winner,
    pub handicap: u8,
    pub class: TournamentClass,
}

impl MatchResult {
    /// Build a validated match result.
    pub fn new(
        rating_a: f64,
        rating_b: f64,
        winner: Winner,
        handicap: u8,
        class: TournamentClass,
    ) -> Result<Self> {
        let result = Self {
            rating_a,
            rating_b,
            winner,
            handicap,
            class,
        };
        result.validate()?;
        Ok(result)
    }

    /// Build a match result from the legacy convention where the winner is
    /// named by rating value rather than by side.
    ///
    /// The value must equal one of the two ratings; when both players hold
    /// the same rating the first side is taken as the winner.
    pub fn with_winner_rating(
        rating_a: f64,
        rating_b: f64,
        winner_rating: f64,
        handicap: u8,
        class: TournamentClass,
    ) -> Result<Self> {
        let winner = if winner_rating == rating_a {
            Winner::FirstPlayer
        } else if winner_rating == rating_b {
            Winner::SecondPlayer
        } else {
            return Err(RatingError::WinnerMismatch {
                winner: winner_rating,
            }
            .into());
        };
        Self::new(rating_a, rating_b, winner, handicap, class)
    }

    /// Check all preconditions of the rating formula.
    pub fn validate(&self) -> Result<()> {
        validate_rating(self.rating_a)?;
        validate_rating(self.rating_b)?;
        if self.handicap > 9 {
            return Err(RatingError::InvalidHandicap {
                handicap: self.handicap,
            }
            .into());
        }
        Ok(())
    }
}

/// Signed rating increments produced by one match, ordered positionally
/// to match the two input ratings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingDeltas {
    pub first: f64,
    pub second: f64,
}
