use crate::{
    source_sync::{Discovery, ExtractionReport, FileOutcome},
    summary_store::{MergeReport, WriteKind},
};
use std::path::Path;
const MAX_LISTED: usize = 20;
pub fn print_summary(
    base_dir: &Path,
    store_path: &Path,
    discovery: &Discovery,
    extraction: &ExtractionReport,
    merge: Option<&MergeReport>,
) {
    println!("\n==== 汇总结果 ====");
    println!("- 数据文件夹: {}", base_dir.display());
    println!("- 转粮数据文件数: {}", discovery.files.len());
    if let Some((first, last)) = discovery.key_range() {
        println!("- 文件编号范围: {first} - {last}");
    }
    if !discovery.skipped.is_empty() {
        println!("- 无法提取编号而跳过: {}", discovery.skipped.len());
    }
    println!("- 找到总产出重量: {}", extraction.count_found());
    if !extraction.duplicate_keys.is_empty() {
        let keys: Vec<String> = extraction
            .duplicate_keys
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("- 重复的文件编号(后者覆盖): {}", keys.join(", "));
    }
    match merge {
        None => println!("- 汇总文件: 未找到任何总产出重量数据, 未修改"),
        Some(report) => {
            let action = if report.created { "新建" } else { "更新" };
            if report.saved {
                println!("- 汇总文件({action}): {}", store_path.display());
            } else {
                println!("- 汇总文件({action}): (dry-run) 未保存 {}", store_path.display());
            }
            println!("- 数量行: 第{}行", report.quantity_row);
            println!(
                "- 写入值: {} (新增列 {})",
                report.writes.len(),
                report.count(WriteKind::Appended)
            );
        }
    }
    let missing: Vec<(&str, &FileOutcome)> = extraction
        .outcomes
        .iter()
        .filter(|(_, o)| !matches!(o, FileOutcome::Found(_)))
        .map(|(f, o)| (f.file_name.as_str(), o))
        .collect();
    if !missing.is_empty() {
        println!("\n[未找到总产出重量的文件(前{MAX_LISTED}个)]");
        for (i, (name, outcome)) in missing.iter().take(MAX_LISTED).enumerate() {
            match outcome {
                FileOutcome::Failed(reason) => println!("  {}. {name} (读取出错: {reason})", i + 1),
                FileOutcome::NotFound | FileOutcome::Found(_) => println!("  {}. {name}", i + 1),
            }
        }
        if missing.len() > MAX_LISTED {
            println!("  ... (共{}个, 仅显示{MAX_LISTED}个)", missing.len());
        }
    }
    println!("==================\n");
}
