use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Normalized image position; both axes are relative to the image size.
///
/// `(0, 0)` doubles as the "not placed" marker, matching the persisted format.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoordinateParseError {
    #[error("expected a parenthesised pair, got {raw:?}")]
    NotATuple { raw: String },

    #[error("expected exactly 2 values, got {count} in {raw:?}")]
    Arity { raw: String, count: usize },

    #[error("invalid number {value:?} in {raw:?}")]
    InvalidNumber { raw: String, value: String },
}

impl Coordinate {
    pub const UNSET: Coordinate = Coordinate { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Build a coordinate with both axes clamped to `[0, 1]`.
    #[must_use]
    pub fn clamped(x: f64, y: f64) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    /// Normalize a pixel position against the displayed image size.
    #[must_use]
    pub fn from_pixels(px: f64, py: f64, width: f64, height: f64) -> Self {
        Self::clamped(px / width, py / height)
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        *self != Self::UNSET
    }

    /// True when both axes differ from `target` by strictly less than `margin`.
    #[must_use]
    pub fn within_margin(&self, target: &Coordinate, margin: f64) -> bool {
        (self.x - target.x).abs() < margin && (self.y - target.y).abs() < margin
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

impl fmt::Display for Coordinate {
    // `{:?}` keeps a trailing `.0` and prints the shortest round-tripping digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| CoordinateParseError::NotATuple { raw: s.to_owned() })?;

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(CoordinateParseError::Arity {
                raw: s.to_owned(),
                count: parts.len(),
            });
        }

        // Only finite literals; `NaN` and `inf` are not tuple values.
        let parse = |value: &str| {
            value
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| CoordinateParseError::InvalidNumber {
                    raw: s.to_owned(),
                    value: value.to_owned(),
                })
        };

        Ok(Self {
            x: parse(parts[0])?,
            y: parse(parts[1])?,
        })
    }
}
