use calamine::{Data, Range};
use std::{collections::HashMap, fmt};
static EMPTY: CellValue = CellValue::Empty;
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(f64),
    Error(String),
}
impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.trim()),
            Self::Empty | Self::Number(_) | Self::Bool(_) | Self::DateTime(_) | Self::Error(_) => {
                None
            }
        }
    }
    #[allow(
        clippy::cast_precision_loss,
        clippy::as_conversions,
        reason = "cell integers are far below 2^52 in practice"
    )]
    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => Self::Empty,
            Data::String(v) => {
                if v.trim().is_empty() {
                    Self::Empty
                } else {
                    Self::Text(v.clone())
                }
            }
            Data::Float(v) => Self::Number(*v),
            Data::Int(v) => Self::Number(*v as f64),
            Data::Bool(v) => Self::Bool(*v),
            Data::DateTime(v) => Self::DateTime(v.as_f64()),
            Data::DateTimeIso(v) | Data::DurationIso(v) => Self::Text(v.clone()),
            Data::Error(e) => Self::Error(e.to_string()),
        }
    }
}
#[derive(Debug, Clone, Default)]
pub struct Grid {
    cells: HashMap<(u32, u32), CellValue>,
    max_row: u32,
    max_col: u32,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellPos {
    pub row: u32,
    pub col: u32,
}
impl CellPos {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}
impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = Vec::new();
        let mut col = self.col;
        while col > 0 {
            let rem = u8::try_from((col - 1) % 26).unwrap_or(0);
            letters.push(char::from(b'A' + rem));
            col = (col - 1) / 26;
        }
        let name: String = letters.into_iter().rev().collect();
        write!(f, "{name}{}", self.row)
    }
}
impl Grid {
    pub fn from_range(range: &Range<Data>) -> Self {
        let mut grid = Self::default();
        let Some((start_row, start_col)) = range.start() else {
            return grid;
        };
        for (rel_row, rel_col, data) in range.used_cells() {
            let (Ok(rel_row), Ok(rel_col)) = (u32::try_from(rel_row), u32::try_from(rel_col))
            else {
                continue;
            };
            let value = CellValue::from_data(data);
            grid.set(start_row + rel_row + 1, start_col + rel_col + 1, value);
        }
        grid
    }
    pub fn set(&mut self, row: u32, col: u32, value: CellValue) {
        if row == 0 || col == 0 || matches!(value, CellValue::Empty) {
            return;
        }
        self.max_row = self.max_row.max(row);
        self.max_col = self.max_col.max(col);
        self.cells.insert((row, col), value);
    }
    pub fn cell(&self, row: u32, col: u32) -> &CellValue {
        self.cells.get(&(row, col)).unwrap_or(&EMPTY)
    }
    pub fn text_at(&self, row: u32, col: u32) -> Option<&str> {
        self.cell(row, col).as_text()
    }
    pub const fn max_row(&self) -> u32 {
        self.max_row
    }
    pub const fn max_col(&self) -> u32 {
        self.max_col
    }
}
#[cfg(test)]
impl Grid {
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let mut grid = Self::default();
        for (r, row) in (1u32..).zip(rows) {
            for (c, value) in (1u32..).zip(row) {
                grid.set(r, c, value);
            }
        }
        grid
    }
}
#[cfg(test)]
mod tests {
    use super::{CellPos, CellValue, Grid};
    use calamine::{Data, Range};
    #[test]
    fn positions_display_in_a1_form() {
        assert_eq!(CellPos::new(3, 2).to_string(), "B3", "single letter");
        assert_eq!(CellPos::new(10, 27).to_string(), "AA10", "column rollover");
    }
    #[test]
    fn range_keeps_absolute_coordinates() {
        let mut range: Range<Data> = Range::new((2, 1), (3, 4));
        range.set_value((2, 1), Data::String("总产出重量".to_string()));
        range.set_value((3, 4), Data::Int(1200));
        let grid = Grid::from_range(&range);
        assert_eq!(grid.text_at(3, 2), Some("总产出重量"), "B3 holds the label");
        assert_eq!(grid.cell(4, 5), &CellValue::Number(1200.0), "E4 holds the number");
        assert_eq!(grid.max_row(), 4, "max row counts from A1");
        assert_eq!(grid.max_col(), 5, "max column counts from A1");
    }
    #[test]
    fn out_of_range_reads_are_empty() {
        let grid = Grid::from_rows(vec![vec![CellValue::Number(1.0)]]);
        assert_eq!(grid.cell(9, 9), &CellValue::Empty, "outside the sheet");
        assert_eq!(grid.cell(0, 1), &CellValue::Empty, "row 0 does not exist");
        assert_eq!(CellPos::new(1, 2).col, 2, "column accessor");
    }
    #[test]
    fn blank_strings_are_empty() {
        let mut range: Range<Data> = Range::new((0, 0), (0, 1));
        range.set_value((0, 0), Data::String("   ".to_string()));
        range.set_value((0, 1), Data::Bool(true));
        let grid = Grid::from_range(&range);
        assert_eq!(grid.cell(1, 1), &CellValue::Empty, "whitespace-only text");
        assert_eq!(grid.cell(1, 2), &CellValue::Bool(true), "booleans are kept typed");
        assert_eq!(grid.max_col(), 2, "only non-empty cells extend the grid");
    }
}
