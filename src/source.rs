use crate::{
    Error, Result,
    grid::Grid,
    resolver::{Pipeline, PipelineMode, Resolution, resolve_sheet},
};
use calamine::{Reader, open_workbook_auto};
use std::path::Path;
use tracing::debug;
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Xls,
    Xlsx,
}
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentResolution {
    pub sheet: String,
    pub resolution: Resolution,
}
impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|s| s.to_str())?;
        if ext.eq_ignore_ascii_case("xlsx") {
            Some(Self::Xlsx)
        } else if ext.eq_ignore_ascii_case("xls") {
            Some(Self::Xls)
        } else {
            None
        }
    }
}
pub fn resolve_document(path: &Path, mode: PipelineMode) -> Result<Option<DocumentResolution>> {
    let format =
        SourceFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))?;
    let pipeline = Pipeline::for_format(format, mode);
    let mut workbook = open_workbook_auto(path)?;
    for sheet in workbook.sheet_names() {
        let range = workbook.worksheet_range(&sheet)?;
        let grid = Grid::from_range(&range);
        debug!(
            sheet = %sheet,
            max_row = grid.max_row(),
            max_col = grid.max_col(),
            "扫描工作表"
        );
        if let Some(resolution) = resolve_sheet(&grid, &pipeline) {
            return Ok(Some(DocumentResolution { sheet, resolution }));
        }
    }
    Ok(None)
}
