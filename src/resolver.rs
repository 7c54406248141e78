//! Finds the total-output-weight label on a sheet and picks the value next to it.
//!
//! The two container formats run different pipelines. xlsx sheets are scanned in
//! their first 200 rows, every strategy contributes candidates, and the best tier
//! wins. xls sheets are scanned whole with three strategies and the first hit wins.
//! `GRAINSUM_PIPELINE=tiered|first-hit` forces one pipeline for both formats.
use crate::{
    grid::{CellPos, Grid},
    probe::{DEFAULT_REACH, Provenance, Strategy, WeightCandidate},
    source::SourceFormat,
};
use std::env;
use tracing::debug;
const LABEL: &str = "总产出重量";
const LABEL_HEAD: &str = "总产出";
const LABEL_TAIL: &str = "重量";
const DEFAULT_LABEL_SCAN_ROWS: u32 = 200;
const SPARSE_STRATEGIES: &[Strategy] = &[
    Strategy::Right,
    Strategy::Left,
    Strategy::NextRow,
    Strategy::Down,
    Strategy::Below,
];
const GRID_STRATEGIES: &[Strategy] = &[Strategy::Right, Strategy::NextRow, Strategy::Down];
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMatch {
    Exact,
    Fragments,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Tiered,
    FirstHit,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineMode {
    #[default]
    ByFormat,
    Tiered,
    FirstHit,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipeline {
    pub strategies: &'static [Strategy],
    pub selection: Selection,
    pub label_scan_rows: Option<u32>,
    pub reach: u32,
}
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub weight: f64,
    pub label: CellPos,
    pub label_match: LabelMatch,
    pub value_at: CellPos,
    pub provenance: Provenance,
}
impl PipelineMode {
    pub fn from_env() -> Self {
        env::var("GRAINSUM_PIPELINE")
            .ok()
            .and_then(|v| Self::parse(&v))
            .unwrap_or_default()
    }
    fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Some(Self::ByFormat),
            "tiered" => Some(Self::Tiered),
            "first-hit" | "first_hit" => Some(Self::FirstHit),
            _ => None,
        }
    }
}
impl Pipeline {
    pub const fn sparse(label_scan_rows: u32, reach: u32) -> Self {
        Self {
            strategies: SPARSE_STRATEGIES,
            selection: Selection::Tiered,
            label_scan_rows: Some(label_scan_rows),
            reach,
        }
    }
    pub const fn grid(reach: u32) -> Self {
        Self {
            strategies: GRID_STRATEGIES,
            selection: Selection::FirstHit,
            label_scan_rows: None,
            reach,
        }
    }
    pub fn for_format(format: SourceFormat, mode: PipelineMode) -> Self {
        let reach = search_reach();
        match (mode, format) {
            (PipelineMode::Tiered, _) | (PipelineMode::ByFormat, SourceFormat::Xlsx) => {
                Self::sparse(label_scan_rows(), reach)
            }
            (PipelineMode::FirstHit, _) | (PipelineMode::ByFormat, SourceFormat::Xls) => {
                Self::grid(reach)
            }
        }
    }
    fn select(&self, grid: &Grid, label: CellPos) -> Option<WeightCandidate> {
        match self.selection {
            Selection::FirstHit => self
                .strategies
                .iter()
                .find_map(|s| s.first_hit(grid, label, self.reach)),
            Selection::Tiered => {
                let candidates: Vec<WeightCandidate> = self
                    .strategies
                    .iter()
                    .flat_map(|s| s.probe(grid, label, self.reach))
                    .collect();
                let best_tier = candidates.iter().map(|c| c.provenance.tier()).min()?;
                candidates
                    .into_iter()
                    .find(|c| c.provenance.tier() == best_tier)
            }
        }
    }
}
pub fn match_label(text: &str) -> Option<LabelMatch> {
    if text.contains(LABEL) {
        Some(LabelMatch::Exact)
    } else if text.contains(LABEL_HEAD) && text.contains(LABEL_TAIL) {
        Some(LabelMatch::Fragments)
    } else {
        None
    }
}
pub fn resolve_sheet(grid: &Grid, pipeline: &Pipeline) -> Option<Resolution> {
    let last_row = pipeline
        .label_scan_rows
        .map_or(grid.max_row(), |limit| limit.min(grid.max_row()));
    for row in 1..=last_row {
        for col in 1..=grid.max_col() {
            let Some(label_match) = grid.text_at(row, col).and_then(match_label) else {
                continue;
            };
            let label = CellPos::new(row, col);
            match pipeline.select(grid, label) {
                Some(candidate) => {
                    debug!(row, col, provenance = %candidate.provenance, weight = candidate.weight, "标签附近找到数值");
                    return Some(Resolution {
                        weight: candidate.weight,
                        label,
                        label_match,
                        value_at: candidate.at,
                        provenance: candidate.provenance,
                    });
                }
                None => debug!(row, col, "标签附近没有有效数值，继续查找"),
            }
        }
    }
    None
}
fn label_scan_rows() -> u32 {
    env::var("GRAINSUM_LABEL_SCAN_ROWS")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .map_or(DEFAULT_LABEL_SCAN_ROWS, |v| v.min(10_000))
}
fn search_reach() -> u32 {
    env::var("GRAINSUM_SEARCH_RANGE")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .map_or(DEFAULT_REACH, |v| v.min(1_000))
}
