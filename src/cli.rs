use crate::{Result, err, summary_store::SUMMARY_FILE_NAME};
use std::{
    env,
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
};
use tracing::warn;
const APP_NAME: &str = "grainsum";
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAction {
    Run(Args),
    Help(String),
    Version(String),
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Write,
    DryRun,
}
impl SaveMode {
    pub const fn is_dry_run(self) -> bool {
        matches!(self, Self::DryRun)
    }
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub dir: Option<PathBuf>,
    pub summary: PathBuf,
    pub save_mode: SaveMode,
}
impl Default for Args {
    fn default() -> Self {
        Self {
            dir: None,
            summary: PathBuf::from(SUMMARY_FILE_NAME),
            save_mode: SaveMode::Write,
        }
    }
}
impl Args {
    pub fn parse_action() -> Result<ParseAction> {
        let raw_args: Vec<OsString> = env::args_os().skip(1).collect();
        parse_args(&raw_args)
    }
    pub fn base_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.dir {
            return Ok(dir.clone());
        }
        let exe = env::current_exe().map_err(|e| err(format!("无法确定程序所在目录: {e}")))?;
        exe.parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| err(format!("无法确定程序所在目录: {}", exe.display())))
    }
    pub fn summary_path(&self, base_dir: &Path) -> PathBuf {
        if self.summary.is_absolute() {
            self.summary.clone()
        } else {
            base_dir.join(&self.summary)
        }
    }
}
fn parse_args(raw_args: &[OsString]) -> Result<ParseAction> {
    let mut args = Args::default();
    let mut i = 0usize;
    while let Some(raw_token) = raw_args.get(i) {
        let token = raw_token.as_os_str();
        if token == OsStr::new("-h") || token == OsStr::new("--help") {
            return Ok(ParseAction::Help(usage_text()));
        } else if token == OsStr::new("--version") {
            return Ok(ParseAction::Version(format!("{APP_NAME} {APP_VERSION}")));
        } else if token == OsStr::new("--dry-run") {
            args.save_mode = SaveMode::DryRun;
        } else if token == OsStr::new("--dir") {
            let value = take_option_value(raw_args, &mut i, "--dir")?;
            args.dir = Some(PathBuf::from(value));
        } else if token == OsStr::new("--summary") {
            let value = take_option_value(raw_args, &mut i, "--summary")?;
            args.summary = PathBuf::from(value);
        } else if let Some(token_str) = token.to_str() {
            if let Some(v) = token_str.strip_prefix("--dir=") {
                args.dir = Some(PathBuf::from(v));
            } else if let Some(v) = token_str.strip_prefix("--summary=") {
                args.summary = PathBuf::from(v);
            } else {
                warn!(arg = %token_str, "忽略无法识别的参数");
            }
        } else {
            warn!(arg = %token.to_string_lossy(), "忽略无法识别的参数");
        }
        i += 1;
    }
    Ok(ParseAction::Run(args))
}
fn take_option_value(raw_args: &[OsString], i: &mut usize, opt_name: &str) -> Result<OsString> {
    *i += 1;
    let Some(value) = raw_args.get(*i) else {
        return Err(err(format!("{opt_name} 选项需要一个值。")));
    };
    if is_long_option_token(value.as_os_str()) {
        return Err(err(format!(
            "{opt_name} 选项需要一个值。(下一个参数: {})",
            value.to_string_lossy()
        )));
    }
    Ok(value.clone())
}
fn is_long_option_token(value: &OsStr) -> bool {
    value.to_str().is_some_and(|s| s.starts_with("--"))
}
fn usage_text() -> String {
    let mut out = format!(
        "{APP_NAME} {APP_VERSION}\n转粮数据汇总工具: 读取各转粮数据文件中的总产出重量并汇总到 {SUMMARY_FILE_NAME}\n\n\
用法:\n  {APP_NAME} [OPTIONS]\n\n\
选项:\n  --dir <PATH>       数据文件夹 (默认: 程序所在文件夹)\n  --summary <PATH>   汇总文件路径, 相对于数据文件夹 (默认: {SUMMARY_FILE_NAME})\n  --dry-run          只读取和计算, 不保存汇总文件\n  -h, --help         帮助\n  --version          版本"
    );
    out.push_str(
        "\n\n环境变量(可选):\n  GRAINSUM_LABEL_SCAN_ROWS  xlsx 标签查找行数 (默认 200)\n  GRAINSUM_SEARCH_RANGE     标签附近查找范围 (默认 15)\n  GRAINSUM_PIPELINE         auto | tiered | first-hit\n  RUST_LOG                  日志级别 (默认 info)",
    );
    out
}
