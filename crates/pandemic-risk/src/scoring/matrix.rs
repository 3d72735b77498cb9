use serde::Serialize;

use super::error::RiskError;
use super::level::OrdinalLevel;

/// Immutable 4x4 lookup combining two ordinal levels into one.
///
/// The first argument of [`combine`](Self::combine) indexes rows, the second
/// indexes columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombinationMatrix {
    cells: [[OrdinalLevel; 4]; 4],
}

const fn row(levels: [u8; 4]) -> [OrdinalLevel; 4] {
    [
        OrdinalLevel::from_table(levels[0]),
        OrdinalLevel::from_table(levels[1]),
        OrdinalLevel::from_table(levels[2]),
        OrdinalLevel::from_table(levels[3]),
    ]
}

impl CombinationMatrix {
    /// Table shared by the health-system and prevalence domains.
    pub const CANONICAL: Self = Self {
        cells: [
            row([1, 2, 2, 3]),
            row([2, 2, 3, 3]),
            row([2, 3, 3, 4]),
            row([3, 3, 4, 4]),
        ],
    };

    pub fn new(cells: [[u8; 4]; 4]) -> Result<Self, RiskError> {
        if cells
            .iter()
            .flatten()
            .any(|cell| !(OrdinalLevel::MIN..=OrdinalLevel::MAX).contains(cell))
        {
            return Err(RiskError::InvalidMatrix("cells must lie in 1..=4"));
        }

        for r in 0..4 {
            for c in 0..4 {
                let cell = cells[r][c];
                let below = r + 1 < 4 && cells[r + 1][c] < cell;
                let right = c + 1 < 4 && cells[r][c + 1] < cell;
                if below || right {
                    return Err(RiskError::InvalidMatrix(
                        "cells must be non-decreasing along rows and columns",
                    ));
                }
            }
        }

        Ok(Self {
            cells: cells.map(row),
        })
    }

    pub fn combine(&self, row: OrdinalLevel, col: OrdinalLevel) -> OrdinalLevel {
        self.cells[row.index()][col.index()]
    }

    /// Lookup from unchecked integers; anything outside `1..=4` is rejected.
    pub fn combine_raw(&self, row: u8, col: u8) -> Result<OrdinalLevel, RiskError> {
        Ok(self.combine(OrdinalLevel::new(row)?, OrdinalLevel::new(col)?))
    }

    pub fn is_symmetric(&self) -> bool {
        (0..4).all(|r| (0..4).all(|c| self.cells[r][c] == self.cells[c][r]))
    }

    pub fn cells(&self) -> [[u8; 4]; 4] {
        self.cells.map(|levels| levels.map(OrdinalLevel::get))
    }
}

impl Default for CombinationMatrix {
    fn default() -> Self {
        Self::CANONICAL
    }
}
