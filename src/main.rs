mod classify;
mod cli;
mod errors;
mod file_key;
mod grid;
mod probe;
mod resolver;
mod source;
mod source_sync;
mod summary;
mod summary_store;
use cli::{Args, ParseAction};
use errors::{Error, Result, err};
use resolver::PipelineMode;
use source_sync::{SOURCE_MARKER, extract_weights, find_source_files};
use std::{io, process::ExitCode};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
fn main() -> ExitCode {
    init_tracing();
    let args = match Args::parse_action() {
        Ok(ParseAction::Run(args)) => args,
        Ok(ParseAction::Help(text) | ParseAction::Version(text)) => {
            println!("{text}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "汇总失败: {e}");
            ExitCode::FAILURE
        }
    }
}
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
fn run(args: &Args) -> Result<()> {
    let base_dir = args.base_dir()?;
    let store_path = args.summary_path(&base_dir);
    let discovery = find_source_files(&base_dir, SOURCE_MARKER)?;
    info!(count = discovery.files.len(), "找到转粮数据文件");
    if let Some((first, last)) = discovery.key_range() {
        info!("文件编号范围: {first} - {last}");
    }
    let extraction = extract_weights(&discovery.files, PipelineMode::from_env());
    if extraction.weights.is_empty() {
        warn!("未找到任何总产出重量数据");
        summary::print_summary(&base_dir, &store_path, &discovery, &extraction, None);
        return Ok(());
    }
    if store_path.exists() {
        info!(path = %store_path.display(), "正在更新汇总文件");
    } else {
        info!(path = %store_path.display(), "汇总文件不存在，正在创建新文件");
    }
    let report = summary_store::merge(&store_path, &extraction.weights, args.save_mode)?;
    summary::print_summary(
        &base_dir,
        &store_path,
        &discovery,
        &extraction,
        Some(&report),
    );
    Ok(())
}
