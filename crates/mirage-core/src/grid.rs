//! Checkerboard grid geometry.
//!
//! A [`GridSpec`] splits the image plane into `cell_size x cell_size` cells.
//! Cell `(gx, gy)` has parity `(gx + gy) mod 2`; the grid's own [`Parity`]
//! says which class of cells carries layer A (the carrier). Layer B (the
//! hidden image) occupies the complementary class.
//!
//! ```text
//! cell_size = 2, parity = Even
//!
//!   x: 0 1 2 3 4 5
//! y 0  A A B B A A
//!   1  A A B B A A
//!   2  B B A A B B
//!   3  B B A A B B
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Parity class of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    /// `(gx + gy) mod 2 == 0`
    #[default]
    Even,
    /// `(gx + gy) mod 2 == 1`
    Odd,
}

impl Parity {
    /// Parity of the cell at grid coordinates `(gx, gy)`.
    #[inline]
    pub fn of_cell(gx: u32, gy: u32) -> Self {
        // Parity of a sum is the xor of the low bits; no overflow for huge cells.
        if (gx & 1) ^ (gy & 1) == 0 {
            Self::Even
        } else {
            Self::Odd
        }
    }

    /// The other parity class.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Self::Even => Self::Odd,
            Self::Odd => Self::Even,
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Even => "even",
            Self::Odd => "odd",
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Parity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "even" | "e" | "0" => Ok(Self::Even),
            "odd" | "o" | "1" => Ok(Self::Odd),
            other => Err(format!("unknown parity '{other}' (expected even or odd)")),
        }
    }
}

/// Checkerboard layout shared by the compositor and the decompositor.
///
/// Callers must use the same `cell_size` for compose and decompose to get a
/// meaningful reconstruction; nothing enforces this across calls.
///
/// # Example
///
/// ```rust
/// use mirage_core::{GridSpec, Parity};
///
/// let grid = GridSpec::new(2, Parity::Even).unwrap();
/// assert!(grid.is_layer_a(0, 0));
/// assert!(grid.is_layer_a(1, 1));
/// assert!(!grid.is_layer_a(2, 0));
/// assert_eq!(grid.layer_b_parity(), Parity::Odd);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Cell edge length in pixels (>= 1).
    pub cell_size: u32,
    /// Parity class of the cells that carry layer A.
    pub parity: Parity,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            cell_size: 1,
            parity: Parity::Even,
        }
    }
}

impl GridSpec {
    /// Creates a validated grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrid`] if `cell_size` is zero.
    pub fn new(cell_size: u32, parity: Parity) -> Result<Self> {
        let grid = Self { cell_size, parity };
        grid.validate()?;
        Ok(grid)
    }

    /// Checks the invariant `cell_size >= 1`.
    ///
    /// Grids built from struct literals or deserialized presets skip
    /// [`GridSpec::new`], so every operation calls this first.
    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(Error::InvalidGrid {
                cell_size: self.cell_size,
            });
        }
        Ok(())
    }

    /// Grid cell containing pixel `(x, y)`.
    #[inline]
    pub fn cell_of(&self, x: u32, y: u32) -> (u32, u32) {
        debug_assert!(self.cell_size > 0, "grid not validated");
        (x / self.cell_size, y / self.cell_size)
    }

    /// Parity class of the cell containing pixel `(x, y)`.
    #[inline]
    pub fn parity_at(&self, x: u32, y: u32) -> Parity {
        let (gx, gy) = self.cell_of(x, y);
        Parity::of_cell(gx, gy)
    }

    /// Returns `true` if pixel `(x, y)` is taken from layer A.
    #[inline]
    pub fn is_layer_a(&self, x: u32, y: u32) -> bool {
        self.parity_at(x, y) == self.parity
    }

    /// Parity class occupied by layer B.
    #[inline]
    pub fn layer_b_parity(&self) -> Parity {
        self.parity.opposite()
    }
}
