//! Column addressing.
//!
//! A column is selected by putting its 3 bit number on the address lines
//! feeding the column decoder. Line A carries bit 0, line B bit 1 and line C
//! bit 2, so the most significant bit lives on the last line.

use crate::matrix::COLS;

/// Number of address lines driving the column decoder.
pub const ADDRESS_LINES: usize = 3;

/// A validated column address in `0..8`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColumnAddress(u8);

impl ColumnAddress {
    pub fn new(col: u8) -> Option<Self> {
        if (col as usize) < COLS { Some(Self(col)) } else { None }
    }

    pub fn col(&self) -> u8 {
        self.0
    }

    /// Level of one address line, `line` 0 is line A.
    pub fn bit(&self, line: usize) -> bool {
        line < ADDRESS_LINES && (self.0 >> line) & 1 == 1
    }

    /// Levels of all address lines, indexed like the address pin array.
    pub fn line_levels(&self) -> [bool; ADDRESS_LINES] {
        core::array::from_fn(|line| self.bit(line))
    }

    /// Levels listed from the most significant line (C) down to line A.
    pub fn msb_first(&self) -> [bool; ADDRESS_LINES] {
        let mut levels = self.line_levels();
        levels.reverse();
        levels
    }

    /// Every column in scan order.
    pub fn all() -> impl Iterator<Item = ColumnAddress> {
        (0..COLS as u8).map(ColumnAddress)
    }
}
