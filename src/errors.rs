use std::{io, path::PathBuf};
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Message(String),
    #[error("文件读写错误: {0}")]
    Io(#[from] io::Error),
    #[error("表格读取失败: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("汇总文件读写失败: {0}")]
    Store(String),
    #[error("未找到'数量'行，请检查汇总文件格式: {}", .0.display())]
    MissingQuantityRow(PathBuf),
    #[error("不支持的文件格式: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}
pub type Result<T> = std::result::Result<T, Error>;
pub fn err(msg: impl Into<String>) -> Error {
    Error::Message(msg.into())
}
