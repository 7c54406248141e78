use crate::{Error, Result, cli::SaveMode, file_key::FileKey};
use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};
use tracing::{debug, info};
use umya_spreadsheet::{Spreadsheet, Worksheet};
pub const SUMMARY_FILE_NAME: &str = "汇总.xlsx";
const HEADER_LABEL: &str = "中心名词";
const QUANTITY_LABEL: &str = "数量";
const HEADER_ROW: u32 = 1;
const LABEL_COL: u32 = 1;
const NEW_QUANTITY_ROW: u32 = 2;
pub type ExtractionResult = BTreeMap<FileKey, f64>;
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Created,
    Overwritten,
    Appended,
}
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnWrite {
    pub key: FileKey,
    pub row: u32,
    pub col: u32,
    pub weight: f64,
    pub kind: WriteKind,
}
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergeReport {
    pub created: bool,
    pub saved: bool,
    pub quantity_row: u32,
    pub writes: Vec<ColumnWrite>,
}
impl MergeReport {
    pub fn count(&self, kind: WriteKind) -> usize {
        self.writes.iter().filter(|w| w.kind == kind).count()
    }
}
#[derive(Debug, Clone, Default)]
pub struct HeaderLayout {
    columns: Vec<(FileKey, u32)>,
    index: HashMap<FileKey, u32>,
    last_col: u32,
}
impl HeaderLayout {
    pub fn scan(ws: &Worksheet) -> Self {
        let mut layout = Self {
            last_col: LABEL_COL,
            ..Self::default()
        };
        for col in 1..=ws.get_highest_column() {
            let text = cell_text(ws, HEADER_ROW, col);
            if text.is_empty() {
                continue;
            }
            layout.last_col = col;
            if let Some(key) = FileKey::parse(&text) {
                layout.index.insert(key.clone(), col);
                layout.columns.push((key, col));
            }
        }
        layout
    }
    pub fn column_of(&self, key: &FileKey) -> Option<u32> {
        self.index.get(key).copied()
    }
    pub fn columns(&self) -> &[(FileKey, u32)] {
        &self.columns
    }
    pub const fn last_col(&self) -> u32 {
        self.last_col
    }
}
pub fn find_quantity_row(ws: &Worksheet) -> Option<u32> {
    (1..=ws.get_highest_row())
        .rev()
        .find(|row| cell_text(ws, *row, LABEL_COL).contains(QUANTITY_LABEL))
}
pub fn merge(path: &Path, results: &ExtractionResult, save_mode: SaveMode) -> Result<MergeReport> {
    let (mut book, created) = if path.exists() {
        let book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| Error::Store(format!("{} ({e})", path.display())))?;
        (book, false)
    } else {
        (umya_spreadsheet::new_file(), true)
    };
    let ws = book.get_active_sheet_mut();
    let (quantity_row, writes) = if created {
        (NEW_QUANTITY_ROW, write_new_store(ws, results))
    } else {
        let quantity_row =
            find_quantity_row(ws).ok_or_else(|| Error::MissingQuantityRow(path.to_path_buf()))?;
        info!(row = quantity_row, "找到'数量'行");
        (quantity_row, merge_into_existing(ws, quantity_row, results))
    };
    let saved = !save_mode.is_dry_run();
    if saved {
        save_atomically(&book, path)?;
    }
    Ok(MergeReport {
        created,
        saved,
        quantity_row,
        writes,
    })
}
fn write_new_store(ws: &mut Worksheet, results: &ExtractionResult) -> Vec<ColumnWrite> {
    ws.get_cell_mut((LABEL_COL, HEADER_ROW))
        .set_value_string(HEADER_LABEL);
    ws.get_cell_mut((LABEL_COL, NEW_QUANTITY_ROW))
        .set_value_string(QUANTITY_LABEL);
    let mut writes = Vec::with_capacity(results.len());
    for ((key, weight), col) in results.iter().zip(LABEL_COL + 1..) {
        write_column(ws, key, NEW_QUANTITY_ROW, col, *weight);
        writes.push(logged(ColumnWrite {
            key: key.clone(),
            row: NEW_QUANTITY_ROW,
            col,
            weight: *weight,
            kind: WriteKind::Created,
        }));
    }
    writes
}
fn merge_into_existing(
    ws: &mut Worksheet,
    quantity_row: u32,
    results: &ExtractionResult,
) -> Vec<ColumnWrite> {
    let layout = HeaderLayout::scan(ws);
    info!(
        existing = layout.columns().len(),
        last_col = layout.last_col(),
        "读取汇总表头"
    );
    let mut next_col = layout.last_col() + 1;
    let mut writes = Vec::with_capacity(results.len());
    for (key, weight) in results {
        let write = if let Some(col) = layout.column_of(key) {
            debug!(key = %key, col, "找到已存在的列");
            ws.get_cell_mut((col, quantity_row))
                .set_value_number(*weight);
            ColumnWrite {
                key: key.clone(),
                row: quantity_row,
                col,
                weight: *weight,
                kind: WriteKind::Overwritten,
            }
        } else {
            let col = next_col;
            next_col += 1;
            write_column(ws, key, quantity_row, col, *weight);
            ColumnWrite {
                key: key.clone(),
                row: quantity_row,
                col,
                weight: *weight,
                kind: WriteKind::Appended,
            }
        };
        writes.push(logged(write));
    }
    writes
}
fn write_column(ws: &mut Worksheet, key: &FileKey, row: u32, col: u32, weight: f64) {
    ws.get_cell_mut((col, HEADER_ROW))
        .set_value_string(key.as_str());
    ws.get_cell_mut((col, row)).set_value_number(weight);
}
fn logged(write: ColumnWrite) -> ColumnWrite {
    let action = match write.kind {
        WriteKind::Created | WriteKind::Overwritten => "已写入",
        WriteKind::Appended => "已添加新列",
    };
    info!(
        key = %write.key,
        row = write.row,
        col = write.col,
        weight = write.weight,
        "{action}"
    );
    write
}
fn cell_text(ws: &Worksheet, row: u32, col: u32) -> String {
    ws.get_value((col, row)).trim().to_string()
}
fn save_atomically(book: &Spreadsheet, path: &Path) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let tmp = tempfile::Builder::new()
        .prefix(".grainsum-")
        .suffix(".xlsx")
        .tempfile_in(parent)
        .map_err(|e| Error::Store(format!("创建临时文件失败: {} ({e})", parent.display())))?
        .into_temp_path();
    umya_spreadsheet::writer::xlsx::write(book, &tmp)
        .map_err(|e| Error::Store(format!("{} ({e})", path.display())))?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
