//! # 命令处理逻辑模块
//!
//! 包含处理 `encode` 和 `decode` 子命令的高级业务逻辑。
//! 本模块负责校验参数、打开和创建文件、调用核心隐写算法，
//! 以及在失败时清理已经创建的结果文件。

use crate::cli::{DecodeArgs, EncodeArgs, merge};
use crate::constants::{DEFAULT_DECODE_RESULT, DEFAULT_RESULT_PREFIX};
use crate::error::StegError;
use crate::steganography::{multi_carrier_decode, multi_carrier_encode};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// 编码操作的完整配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    pub carriers: Vec<PathBuf>,
    pub data: PathBuf,
    pub results: Vec<PathBuf>,
}

/// 解码操作的完整配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    pub carriers: Vec<PathBuf>,
    pub result: PathBuf,
}

impl TryFrom<EncodeArgs> for EncodeOptions {
    type Error = StegError;

    /// 未指定结果文件时依次使用 `result0`, `result1`, ...
    fn try_from(args: EncodeArgs) -> Result<Self, Self::Error> {
        let carriers = merge(&args.carrier, &args.carriers);
        if carriers.is_empty() {
            return Err(StegError::MissingInput);
        }

        let mut results = merge(&args.result, &args.results);
        if results.is_empty() {
            results = (0..carriers.len())
                .map(|i| PathBuf::from(format!("{DEFAULT_RESULT_PREFIX}{i}")))
                .collect();
        }
        if results.len() != carriers.len() {
            return Err(StegError::CountMismatch {
                carriers: carriers.len(),
                results: results.len(),
            });
        }

        Ok(Self {
            carriers,
            data: args.data,
            results,
        })
    }
}

impl TryFrom<DecodeArgs> for DecodeOptions {
    type Error = StegError;

    /// 结果文件只能有一个，未指定时使用 `result`。
    fn try_from(args: DecodeArgs) -> Result<Self, Self::Error> {
        let carriers = merge(&args.carrier, &args.carriers);
        if carriers.is_empty() {
            return Err(StegError::MissingInput);
        }

        let mut results = merge(&args.result, &args.results);
        if results.len() > 1 {
            return Err(StegError::CountMismatch {
                carriers: carriers.len(),
                results: results.len(),
            });
        }
        let result = results
            .pop()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DECODE_RESULT));

        Ok(Self { carriers, result })
    }
}

/// 将数据文件拆分隐藏到各个载体中，并写出结果图像。
///
/// 任一步骤失败时会删除本次创建的结果文件；在创建之前就失败时，
/// 结果路径上已有的文件保持不变。
///
/// # Errors
///
/// * 无法打开载体或数据文件，或无法创建结果文件。
/// * 载体不是 PNG/JPEG，或已损坏。
/// * 数据超出了某个载体的容量。
pub fn encode_files(options: &EncodeOptions) -> Result<()> {
    let carriers = open_all(&options.carriers)?;

    let data = File::open(&options.data).with_context(|| {
        format!(
            "Unable to open data file: {}",
            options.data.to_string_lossy().red().bold()
        )
    })?;

    let mut created = Vec::with_capacity(options.results.len());
    let outcome = write_encoded(options, carriers, data, &mut created);
    if outcome.is_err() {
        remove_all(&created);
    }
    outcome
}

/// `created` 记录已经成功创建的结果文件，供失败时清理。
fn write_encoded(
    options: &EncodeOptions,
    carriers: Vec<BufReader<File>>,
    data: File,
    created: &mut Vec<PathBuf>,
) -> Result<()> {
    let mut writers = Vec::with_capacity(options.results.len());
    for path in &options.results {
        writers.push(BufWriter::new(create(path)?));
        created.push(path.clone());
    }

    multi_carrier_encode(carriers, BufReader::new(data), writers.iter_mut().collect())
        .context("Failed to hide the data in the carriers")?;

    for (writer, path) in writers.iter_mut().zip(&options.results) {
        writer.flush().with_context(|| {
            format!(
                "Unable to write to result file: {}",
                path.to_string_lossy().red().bold()
            )
        })?;
    }
    Ok(())
}

/// 从各个载体中恢复数据，按顺序拼接后写入结果文件。
///
/// 结果文件创建之后的失败会将其删除。
pub fn decode_files(options: &DecodeOptions) -> Result<()> {
    let carriers = open_all(&options.carriers)?;
    let mut writer = BufWriter::new(create(&options.result)?);

    let outcome = multi_carrier_decode(carriers, &mut writer)
        .context("Failed to recover the data from the carriers")
        .and_then(|()| {
            writer.flush().with_context(|| {
                format!(
                    "Unable to write to result file: {}",
                    options.result.to_string_lossy().red().bold()
                )
            })
        });

    if outcome.is_err() {
        drop(writer);
        remove_all(std::slice::from_ref(&options.result));
    }
    outcome
}

/// 处理 'Encode' 命令的执行逻辑。
pub fn handle_encode(args: EncodeArgs) -> Result<()> {
    let options = EncodeOptions::try_from(args).context("Invalid encode arguments")?;
    encode_files(&options)?;

    for path in &options.results {
        println!(
            "The data has been successfully hidden and saved: {}",
            path.to_string_lossy().green().bold()
        );
    }
    Ok(())
}

/// 处理 'Decode' 命令的执行逻辑。
pub fn handle_decode(args: DecodeArgs) -> Result<()> {
    let options = DecodeOptions::try_from(args).context("Invalid decode arguments")?;
    decode_files(&options)?;

    println!(
        "The data has been successfully recovered and saved: {}",
        options.result.to_string_lossy().green().bold()
    );
    Ok(())
}

fn open_all(paths: &[PathBuf]) -> Result<Vec<BufReader<File>>> {
    paths
        .iter()
        .map(|path| {
            File::open(path).map(BufReader::new).with_context(|| {
                format!(
                    "Unable to open carrier file: {}",
                    path.to_string_lossy().red().bold()
                )
            })
        })
        .collect()
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| {
        format!(
            "Unable to create result file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

fn remove_all(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            log::debug!("could not remove {}: {e}", path.display());
        }
    }
}
