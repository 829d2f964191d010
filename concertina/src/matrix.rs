//! Switch matrix storage and the meaning of its rows.
//!
//! The instrument's keys are wired as an 8 column by 6 row matrix. For every
//! column, rows 0, 1 and 2 are the top, middle and bottom keys of the left
//! hand side, rows 3, 4 and 5 the top, middle and bottom keys of the right
//! hand side.

/// Number of row input lines.
pub const ROWS: usize = 6;
/// Number of addressable columns.
pub const COLS: usize = 8;
/// Rows belonging to one hand.
pub const ROWS_PER_HAND: usize = 3;

/// Key state matrix of the instrument.
pub type KeyMatrix = SwitchMatrix<ROWS, COLS>;

/// Fixed-size grid of switch states, indexed by `[row][col]`.
///
/// `true` always means the switch is closed (key held).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchMatrix<const ROW: usize, const COL: usize> {
    cells: [[bool; COL]; ROW],
}

impl<const ROW: usize, const COL: usize> Default for SwitchMatrix<ROW, COL> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROW: usize, const COL: usize> SwitchMatrix<ROW, COL> {
    /// A matrix with every switch open.
    pub const fn new() -> Self {
        Self {
            cells: [[false; COL]; ROW],
        }
    }

    pub const fn from_cells(cells: [[bool; COL]; ROW]) -> Self {
        Self { cells }
    }

    pub const fn rows(&self) -> usize {
        ROW
    }

    pub const fn cols(&self) -> usize {
        COL
    }

    /// Read one cell, `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Write one cell. Returns `false` if the position is out of range.
    pub fn set(&mut self, row: usize, col: usize, closed: bool) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = closed;
                true
            }
            None => false,
        }
    }

    pub fn row(&self, row: usize) -> Option<&[bool; COL]> {
        self.cells.get(row)
    }

    pub fn cells(&self) -> &[[bool; COL]; ROW] {
        &self.cells
    }

    /// Number of closed switches.
    pub fn closed_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| **c).count()
    }

    /// Iterate over every `(row, col, closed)` in column-major order, the
    /// order in which the scanner walks the matrix.
    pub fn iter_column_major(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        (0..COL).flat_map(move |col| (0..ROW).map(move |row| (row, col, self.cells[row][col])))
    }

    /// Row rendered as `0`/`1` digits, used for the matrix dump in logs.
    pub(crate) fn row_bits(&self, row: usize) -> [u8; COL] {
        let mut bits = [0u8; COL];
        if let Some(r) = self.cells.get(row) {
            for (bit, closed) in bits.iter_mut().zip(r.iter()) {
                *bit = *closed as u8;
            }
        }
        bits
    }
}

/// Which side of the instrument a row belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hand {
    Left,
    Right,
}

/// Position of a key inside its hand's column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tier {
    Top,
    Middle,
    Bottom,
}

impl Tier {
    fn index(self) -> u8 {
        match self {
            Tier::Top => 0,
            Tier::Middle => 1,
            Tier::Bottom => 2,
        }
    }
}

/// Position of a key switch in the matrix, always inside the 6x8 grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPos {
    pub(crate) row: u8,
    pub(crate) col: u8,
}

impl KeyPos {
    /// Create a position, `None` when it's outside the 6x8 matrix.
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < ROWS && (col as usize) < COLS {
            Some(Self { row, col })
        } else {
            None
        }
    }

    pub fn from_hand_tier(hand: Hand, tier: Tier, col: u8) -> Option<Self> {
        let base = match hand {
            Hand::Left => 0,
            Hand::Right => ROWS_PER_HAND as u8,
        };
        Self::new(base + tier.index(), col)
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    pub fn hand(&self) -> Hand {
        if (self.row as usize) < ROWS_PER_HAND {
            Hand::Left
        } else {
            Hand::Right
        }
    }

    pub fn tier(&self) -> Tier {
        match self.row as usize % ROWS_PER_HAND {
            0 => Tier::Top,
            1 => Tier::Middle,
            _ => Tier::Bottom,
        }
    }
}
