//! # Coordinate Codec
//!
//! Maps a bounded signed 2-D coordinate onto a compact unsigned local index
//! and back.
//!
//! ## Layout
//!
//! Each axis has its own symmetric bound, `x ∈ [-Bx, Bx]` and
//! `y ∈ [-By, By]`. Both components are shifted into `[0, 2B]` and combined
//! positionally:
//!
//! ```text
//! index = (x + Bx) * (2By + 1) + (y + By)
//! ```
//!
//! The mapping is a bijection between the bounded rectangle and
//! `[0, (2Bx + 1)(2By + 1))`. Decoding inverts it with a single divmod.
//!
//! ## Invariants
//!
//! - Range checks happen before any arithmetic. `|x| > Bx` is rejected with
//!   `OutOfRange`, never wrapped.
//! - The boundary values `±B` are valid and round-trip.
//! - An index at or above `capacity()` is rejected with `InvalidIndex`.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Coordinate axis, used in range errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
        })
    }
}

/// A signed position on the land grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Horizontal component.
    pub x: i32,
    /// Vertical component.
    pub y: i32,
}

impl Coordinate {
    /// Construct a coordinate.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Bidirectional coordinate ↔ local index codec for one pair of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateCodec {
    x_bound: u32,
    y_bound: u32,
}

impl CoordinateCodec {
    /// Largest bound either axis may use.
    pub const MAX_BOUND: u32 = i32::MAX as u32;

    /// Build a codec with independent bounds for each axis.
    ///
    /// Both bounds must lie in `1..=i32::MAX`.
    pub fn new(x_bound: u32, y_bound: u32) -> Result<Self, CodecError> {
        for (axis, bound) in [(Axis::X, x_bound), (Axis::Y, y_bound)] {
            if bound == 0 || bound > Self::MAX_BOUND {
                return Err(CodecError::InvalidParameters(format!(
                    "{axis} bound must be in 1..={}, got {bound}",
                    Self::MAX_BOUND
                )));
            }
        }
        Ok(Self { x_bound, y_bound })
    }

    /// Build a codec with the same bound on both axes.
    pub fn symmetric(bound: u32) -> Result<Self, CodecError> {
        Self::new(bound, bound)
    }

    /// Configured x bound.
    pub fn x_bound(&self) -> u32 {
        self.x_bound
    }

    /// Configured y bound.
    pub fn y_bound(&self) -> u32 {
        self.y_bound
    }

    fn x_span(&self) -> u64 {
        2 * u64::from(self.x_bound) + 1
    }

    fn y_span(&self) -> u64 {
        2 * u64::from(self.y_bound) + 1
    }

    /// Number of distinct local indices this codec can produce.
    ///
    /// With both bounds at most `i32::MAX` each span is below `2^32`, so the
    /// product always fits in a `u64`.
    pub fn capacity(&self) -> u64 {
        self.x_span() * self.y_span()
    }

    /// Whether `(x, y)` lies inside the bounds.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x.unsigned_abs() <= self.x_bound && y.unsigned_abs() <= self.y_bound
    }

    /// Encode `(x, y)` into a local index.
    pub fn encode(&self, x: i32, y: i32) -> Result<u64, CodecError> {
        check_axis(Axis::X, x, self.x_bound)?;
        check_axis(Axis::Y, y, self.y_bound)?;
        let shifted_x = shift(x, self.x_bound);
        let shifted_y = shift(y, self.y_bound);
        Ok(shifted_x * self.y_span() + shifted_y)
    }

    /// Encode a [`Coordinate`] into a local index.
    pub fn encode_coordinate(&self, coordinate: Coordinate) -> Result<u64, CodecError> {
        self.encode(coordinate.x, coordinate.y)
    }

    /// Decode a local index back into its coordinate.
    pub fn decode(&self, index: u64) -> Result<Coordinate, CodecError> {
        let capacity = self.capacity();
        if index >= capacity {
            return Err(CodecError::InvalidIndex { index, capacity });
        }
        let shifted_x = index / self.y_span();
        let shifted_y = index % self.y_span();
        Ok(Coordinate {
            x: unshift(shifted_x, self.x_bound),
            y: unshift(shifted_y, self.y_bound),
        })
    }
}

fn check_axis(axis: Axis, value: i32, bound: u32) -> Result<(), CodecError> {
    if value.unsigned_abs() > bound {
        return Err(CodecError::OutOfRange { axis, value, bound });
    }
    Ok(())
}

// Callers have range-checked `value`, so the sum lies in [0, 2 * bound].
fn shift(value: i32, bound: u32) -> u64 {
    (i64::from(value) + i64::from(bound)) as u64
}

// `shifted` is at most 2 * bound <= 2 * i32::MAX, so the result fits in i32.
fn unshift(shifted: u64, bound: u32) -> i32 {
    (shifted as i64 - i64::from(bound)) as i32
}
