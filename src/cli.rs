//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 载体和结果文件既可以用可重复的 `--carrier` / `--result` 逐个给出，
//! 也可以用 `--carriers` / `--results` 以空格分隔一次给出；
//! 两者同时出现时，前者排在前面。

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 一款基于 LSB 隐写术的命令行工具，可将任意文件隐藏在一张或多张 PNG/JPEG 图像中，并从中恢复。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB 隐写术的命令行工具。每个像素的 R、G、B 通道各隐藏 2 bit，\
                  数据可以平均拆分到多张载体图像中，结果总是保存为 PNG。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：encode (隐藏) 和 decode (恢复)。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 将数据文件隐藏到一张或多张载体图像中。
    Encode(EncodeArgs),

    /// 从一张或多张载体图像中恢复隐藏的数据。
    Decode(DecodeArgs),
}

/// 'encode' 命令所需的参数。
#[derive(Parser, Debug, Clone)]
pub struct EncodeArgs {
    /// 载体图像文件，可重复指定。
    #[arg(short, long)]
    pub carrier: Vec<PathBuf>,

    /// 以空格分隔的载体图像文件列表。
    #[arg(long, value_delimiter = ' ')]
    pub carriers: Vec<PathBuf>,

    /// 要隐藏的数据文件。
    #[arg(short, long)]
    pub data: PathBuf,

    /// 结果图像文件，可重复指定，数量须与载体一致。默认为 result0, result1, ...
    #[arg(short, long)]
    pub result: Vec<PathBuf>,

    /// 以空格分隔的结果图像文件列表。
    #[arg(long, value_delimiter = ' ')]
    pub results: Vec<PathBuf>,
}

/// 'decode' 命令所需的参数。
#[derive(Parser, Debug, Clone)]
pub struct DecodeArgs {
    /// 载体图像文件，可重复指定，顺序须与编码时一致。
    #[arg(short, long)]
    pub carrier: Vec<PathBuf>,

    /// 以空格分隔的载体图像文件列表。
    #[arg(long, value_delimiter = ' ')]
    pub carriers: Vec<PathBuf>,

    /// 保存恢复数据的文件，只能指定一个。默认为 result。
    #[arg(short, long)]
    pub result: Vec<PathBuf>,

    /// 以空格分隔的结果文件列表。
    #[arg(long, value_delimiter = ' ')]
    pub results: Vec<PathBuf>,
}

/// 合并单个与列表形式的参数，单个形式在前。
pub(crate) fn merge(single: &[PathBuf], list: &[PathBuf]) -> Vec<PathBuf> {
    single
        .iter()
        .chain(list.iter().filter(|p| !p.as_os_str().is_empty()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_flags_take_priority_over_lists() {
        let cli = Cli::try_parse_from([
            "quartet_steg",
            "encode",
            "--carriers",
            "a.png b.png",
            "--carrier",
            "c.jpeg",
            "--data",
            "secret.bin",
            "--results",
            "r1.png",
            "-r",
            "r0.png",
        ])
        .unwrap();

        let Commands::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(
            merge(&args.carrier, &args.carriers),
            vec![PathBuf::from("c.jpeg"), "a.png".into(), "b.png".into()]
        );
        assert_eq!(
            merge(&args.result, &args.results),
            vec![PathBuf::from("r0.png"), "r1.png".into()]
        );
    }

    #[test]
    fn encode_requires_data() {
        assert!(Cli::try_parse_from(["quartet_steg", "encode", "-c", "a.png"]).is_err());
    }

    #[test]
    fn decode_without_result_is_parsed() {
        let cli = Cli::try_parse_from(["quartet_steg", "decode", "-c", "a.png", "-c", "b.png"]).unwrap();
        let Commands::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        assert_eq!(args.carrier.len(), 2);
        assert!(args.result.is_empty());
    }
}
