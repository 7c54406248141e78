use crate::{
    classify::{Classification, classify},
    grid::{CellPos, Grid},
};
use std::fmt;
use tracing::trace;
pub const DEFAULT_REACH: u32 = 15;
const NEXT_ROW_LEAD: u32 = 2;
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Right,
    Left,
    NextRow,
    Down,
    Below,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Right { offset: u32 },
    Left { offset: u32 },
    NextRow { col: u32 },
    Down { offset: u32 },
    Below,
}
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightCandidate {
    pub weight: f64,
    pub at: CellPos,
    pub provenance: Provenance,
}
impl Provenance {
    pub const fn tier(self) -> u8 {
        match self {
            Self::Right { .. } => 1,
            Self::NextRow { .. } | Self::Down { .. } | Self::Below => 2,
            Self::Left { .. } => 3,
        }
    }
}
impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Right { offset } => write!(f, "同一行右侧{offset}列"),
            Self::Left { offset } => write!(f, "同一行左侧{offset}列"),
            Self::NextRow { col } => write!(f, "下一行第{col}列"),
            Self::Down { offset } => write!(f, "同一列下方{offset}行"),
            Self::Below => f.write_str("下一行同一列"),
        }
    }
}
impl Strategy {
    pub fn probe(self, grid: &Grid, label: CellPos, reach: u32) -> Vec<WeightCandidate> {
        self.cells(grid, label, reach)
            .into_iter()
            .filter_map(|(at, provenance)| admit(grid, at, provenance))
            .collect()
    }
    pub fn first_hit(self, grid: &Grid, label: CellPos, reach: u32) -> Option<WeightCandidate> {
        self.cells(grid, label, reach)
            .into_iter()
            .find_map(|(at, provenance)| admit(grid, at, provenance))
    }
    fn cells(self, grid: &Grid, label: CellPos, reach: u32) -> Vec<(CellPos, Provenance)> {
        let CellPos { row, col } = label;
        let max_row = grid.max_row();
        let max_col = grid.max_col();
        match self {
            Self::Right => (1..=reach)
                .map_while(|offset| {
                    let c = col.checked_add(offset).filter(|c| *c <= max_col)?;
                    Some((CellPos::new(row, c), Provenance::Right { offset }))
                })
                .collect(),
            Self::Left => (1..=reach)
                .map_while(|offset| {
                    let c = col.checked_sub(offset).filter(|c| *c >= 1)?;
                    Some((CellPos::new(row, c), Provenance::Left { offset }))
                })
                .collect(),
            Self::NextRow => {
                let Some(next) = row.checked_add(1).filter(|r| *r <= max_row) else {
                    return Vec::new();
                };
                let first = col.saturating_sub(NEXT_ROW_LEAD).max(1);
                let last = col.saturating_add(reach).min(max_col);
                (first..=last)
                    .map(|c| (CellPos::new(next, c), Provenance::NextRow { col: c }))
                    .collect()
            }
            Self::Down => (1..=reach)
                .map_while(|offset| {
                    let r = row.checked_add(offset).filter(|r| *r <= max_row)?;
                    Some((CellPos::new(r, col), Provenance::Down { offset }))
                })
                .collect(),
            Self::Below => row
                .checked_add(1)
                .filter(|r| *r <= max_row)
                .map(|r| (CellPos::new(r, col), Provenance::Below))
                .into_iter()
                .collect(),
        }
    }
}
fn admit(grid: &Grid, at: CellPos, provenance: Provenance) -> Option<WeightCandidate> {
    match classify(grid.cell(at.row, at.col)) {
        Classification::Admissible(weight) => Some(WeightCandidate {
            weight,
            at,
            provenance,
        }),
        Classification::Inadmissible(reason) => {
            trace!(row = at.row, col = at.col, %reason, %provenance, "候选值不可用");
            None
        }
    }
}
