use crate::{
    Result, err,
    file_key::{FileKey, extract_key},
    resolver::PipelineMode,
    source::{DocumentResolution, SourceFormat, resolve_document},
    summary_store::ExtractionResult,
};
use std::{
    collections::btree_map::Entry,
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};
pub const SOURCE_MARKER: &str = "转粮数据";
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub file_name: String,
    pub key: FileKey,
}
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub files: Vec<SourceFile>,
    pub skipped: Vec<String>,
}
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Found(DocumentResolution),
    NotFound,
    Failed(String),
}
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub weights: ExtractionResult,
    pub outcomes: Vec<(SourceFile, FileOutcome)>,
    pub duplicate_keys: Vec<FileKey>,
}
impl Discovery {
    pub fn key_range(&self) -> Option<(&FileKey, &FileKey)> {
        Some((&self.files.first()?.key, &self.files.last()?.key))
    }
}
impl ExtractionReport {
    pub fn count_found(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, FileOutcome::Found(_)))
            .count()
    }
}
pub fn find_source_files(dir: &Path, marker: &str) -> Result<Discovery> {
    let mut discovery = Discovery::default();
    for entry in
        fs::read_dir(dir).map_err(|e| err(format!("读取文件夹失败: {} ({e})", dir.display())))?
    {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if !file_name.contains(marker) || SourceFormat::from_path(&path).is_none() {
            continue;
        }
        let name = file_name.to_string();
        match extract_key(&name) {
            Some(key) => discovery.files.push(SourceFile {
                path,
                file_name: name,
                key,
            }),
            None => {
                warn!(file = %name, "无法从文件名中提取文件编号，将跳过");
                discovery.skipped.push(name);
            }
        }
    }
    discovery
        .files
        .sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.path.cmp(&b.path)));
    discovery.skipped.sort();
    Ok(discovery)
}
pub fn extract_weights(files: &[SourceFile], mode: PipelineMode) -> ExtractionReport {
    let mut report = ExtractionReport::default();
    for file in files {
        info!(file = %file.file_name, "正在处理");
        let outcome = match resolve_document(&file.path, mode) {
            Ok(Some(found)) => {
                info!(
                    key = %file.key,
                    sheet = %found.sheet,
                    weight = found.resolution.weight,
                    label = %found.resolution.label,
                    value = %found.resolution.value_at,
                    matched = ?found.resolution.label_match,
                    provenance = %found.resolution.provenance,
                    "找到总产出重量"
                );
                match report.weights.entry(file.key.clone()) {
                    Entry::Vacant(vacant) => {
                        vacant.insert(found.resolution.weight);
                    }
                    Entry::Occupied(mut occupied) => {
                        warn!(
                            key = %file.key,
                            previous = *occupied.get(),
                            current = found.resolution.weight,
                            "文件编号重复，后处理的文件覆盖之前的值"
                        );
                        occupied.insert(found.resolution.weight);
                        report.duplicate_keys.push(file.key.clone());
                    }
                }
                FileOutcome::Found(found)
            }
            Ok(None) => {
                warn!(file = %file.file_name, "未找到总产出重量");
                FileOutcome::NotFound
            }
            Err(e) => {
                warn!(file = %file.file_name, error = %e, "读取文件时出错");
                FileOutcome::Failed(e.to_string())
            }
        };
        report.outcomes.push((file.clone(), outcome));
    }
    report
}
#[cfg(test)]
mod tests {
    use super::{FileOutcome, SOURCE_MARKER, extract_weights, find_source_files};
    use crate::{file_key::FileKey, resolver::PipelineMode};
    use std::{fs, path::Path};
    use tempfile::TempDir;
    fn write_weight_book(path: &Path, weight: f64) {
        let mut book = umya_spreadsheet::new_file();
        let ws = book.get_active_sheet_mut();
        ws.get_cell_mut((1, 4)).set_value_string("总产出重量");
        ws.get_cell_mut((2, 4)).set_value_number(weight);
        umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
    }
    fn names(dir: &TempDir) -> Vec<String> {
        find_source_files(dir.path(), SOURCE_MARKER)
            .unwrap()
            .files
            .into_iter()
            .map(|f| f.file_name)
            .collect()
    }
    #[test]
    fn discovery_filters_and_sorts_numerically() {
        let dir = TempDir::new().unwrap();
        for name in [
            "100转粮数据.xlsx",
            "20转粮数据.xls",
            "9转粮数据.xlsx",
            "9转粮数据.csv",
            "汇总.xlsx",
            "转粮数据.xlsx",
            "30其他数据.xlsx",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("40转粮数据.xlsx")).unwrap();
        assert_eq!(
            names(&dir),
            vec!["9转粮数据.xlsx", "20转粮数据.xls", "100转粮数据.xlsx"],
            "marker, extension and integer order"
        );
        let discovery = find_source_files(dir.path(), SOURCE_MARKER).unwrap();
        assert_eq!(discovery.skipped, vec!["转粮数据.xlsx"], "keyless name reported");
        let (first, last) = discovery.key_range().unwrap();
        assert_eq!((first.as_str(), last.as_str()), ("9", "100"), "key range");
    }
    #[test]
    fn extraction_collects_found_and_reports_failures() {
        let dir = TempDir::new().unwrap();
        write_weight_book(&dir.path().join("709转粮数据.xlsx"), 1000.5);
        write_weight_book(&dir.path().join("910转粮数据.xlsx"), 2500.0);
        fs::write(dir.path().join("800转粮数据.xlsx"), b"broken").unwrap();
        let mut book = umya_spreadsheet::new_file();
        book.get_active_sheet_mut()
            .get_cell_mut((1, 1))
            .set_value_string("无关内容");
        umya_spreadsheet::writer::xlsx::write(&book, dir.path().join("850转粮数据.xlsx")).unwrap();
        let discovery = find_source_files(dir.path(), SOURCE_MARKER).unwrap();
        let report = extract_weights(&discovery.files, PipelineMode::ByFormat);
        let weights: Vec<(&str, f64)> = report
            .weights
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(weights, vec![("709", 1000.5), ("910", 2500.0)], "extracted mapping");
        assert_eq!(report.count_found(), 2, "two files resolved");
        let kinds: Vec<&str> = report
            .outcomes
            .iter()
            .map(|(_, o)| match o {
                FileOutcome::Found(_) => "found",
                FileOutcome::NotFound => "not-found",
                FileOutcome::Failed(_) => "failed",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["found", "failed", "not-found", "found"],
            "outcomes follow key order"
        );
    }
    #[test]
    fn duplicate_keys_keep_the_last_processed_value() {
        let dir = TempDir::new().unwrap();
        write_weight_book(&dir.path().join("709转粮数据a.xlsx"), 1.0);
        write_weight_book(&dir.path().join("709转粮数据b.xlsx"), 2.0);
        let discovery = find_source_files(dir.path(), SOURCE_MARKER).unwrap();
        let report = extract_weights(&discovery.files, PipelineMode::ByFormat);
        let key = FileKey::parse("709").unwrap();
        assert_eq!(report.weights.get(&key), Some(&2.0), "later path wins");
        assert_eq!(report.duplicate_keys, vec![key], "duplicate recorded");
    }
}
