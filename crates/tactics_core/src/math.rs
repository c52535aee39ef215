//! Grid coordinates and fixed-point utilities.
//!
//! Heuristics are computed in fixed-point so that two agents fed the same
//! snapshots always take the same decisions, independent of the CPU.

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// Fixed-point number type for all heuristic math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Range: approximately -2,147,483,648 to 2,147,483,647
/// Precision: approximately 0.00000000023
pub type Fixed = I32F32;

/// Integer cell coordinates on the board.
///
/// Ordering is `x` first, then `y`, which is the iteration order of every
/// tile index in this crate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Coordinates {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Coordinates {
    /// Create new coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Coordinates shifted by the given deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance, which is also the number of single-cell steps
    /// between two cells.
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Squared Euclidean distance (exact, avoids sqrt for comparisons).
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> u64 {
        let dx = self.x.abs_diff(other.x) as u64;
        let dy = self.y.abs_diff(other.y) as u64;
        dx * dx + dy * dy
    }

    /// Euclidean distance in fixed-point, rounded down to the last bit.
    ///
    /// Saturates at [`Fixed::MAX`] for distances beyond its range (2^31).
    #[must_use]
    pub fn distance(self, other: Self) -> Fixed {
        let bits = integer_sqrt(u128::from(self.distance_squared(other)) << 64);
        Fixed::from_bits(i64::try_from(bits).unwrap_or(i64::MAX))
    }

    /// The neighbouring cell one step closer to `destination`.
    ///
    /// Moves along the axis with the larger remaining delta; on a tie the
    /// horizontal axis wins. Returns `None` when already at the destination.
    #[must_use]
    pub fn step_toward(self, destination: Self) -> Option<Self> {
        let dx = destination.x - self.x;
        let dy = destination.y - self.y;
        if dx == 0 && dy == 0 {
            return None;
        }
        if dx.abs() >= dy.abs() {
            Some(self.offset(dx.signum(), 0))
        } else {
            Some(self.offset(0, dy.signum()))
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Largest integer whose square does not exceed `value`.
fn integer_sqrt(value: u128) -> u128 {
    if value < 2 {
        return value;
    }
    let mut low = 1u128;
    let mut high = value.min(u128::from(u64::MAX));
    while low < high {
        let mid = low + (high - low + 1) / 2;
        match mid.checked_mul(mid) {
            Some(square) if square <= value => low = mid,
            _ => high = mid - 1,
        }
    }
    low
}

/// Square root of a fixed-point number, rounded down to the last bit.
///
/// Negative inputs yield zero.
#[must_use]
pub fn fixed_sqrt(value: Fixed) -> Fixed {
    if value <= Fixed::ZERO {
        return Fixed::ZERO;
    }
    // sqrt(b / 2^32) * 2^32 == sqrt(b * 2^32)
    let bits = integer_sqrt((value.to_bits() as u128) << 32);
    Fixed::from_bits(i64::try_from(bits).unwrap_or(i64::MAX))
}
