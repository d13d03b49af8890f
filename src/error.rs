//! # 错误类型
//!
//! 核心隐写逻辑返回的所有错误都汇总在 [`StegError`] 中，
//! 命令行层再用 `anyhow` 为其附加上下文。

use std::io;

/// 隐写编码或解码过程中可能出现的错误。
#[derive(Debug, thiserror::Error)]
pub enum StegError {
    /// 载体无法解析为图像，或图像数据已损坏。
    #[error("unsupported or corrupt image")]
    Decode(#[source] image::ImageError),

    /// 载体不是 PNG 或 JPEG。
    #[error("unsupported carrier format: {0}")]
    UnsupportedFormat(String),

    /// 读取待隐藏数据时发生 I/O 错误。
    #[error("error reading data")]
    PayloadRead(#[source] io::Error),

    /// 数据超出了载体的容量。
    #[error("data file too large for this carrier")]
    PayloadTooLarge,

    /// 载体数量与结果数量不一致。
    #[error("different number of carriers ({carriers}) and results ({results})")]
    CountMismatch { carriers: usize, results: usize },

    /// 没有提供任何载体。
    #[error("missing carriers names")]
    MissingInput,

    /// 无法将修改后的载体编码为 PNG。
    #[error("error encoding result image")]
    Encode(#[source] image::ImageError),

    /// 无法写入结果。
    #[error("error writing result")]
    ResultWrite(#[source] io::Error),

    /// 多载体操作中第 `index` 个载体失败。
    #[error("error processing chunk with index {index}")]
    Chunk {
        index: usize,
        #[source]
        source: Box<StegError>,
    },
}

impl StegError {
    /// 将错误包装为第 `index` 个载体的失败。
    pub fn at_chunk(self, index: usize) -> Self {
        Self::Chunk {
            index,
            source: Box::new(self),
        }
    }

    /// 剥去 [`StegError::Chunk`] 包装，返回最内层的错误。
    pub fn root(&self) -> &StegError {
        match self {
            Self::Chunk { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, StegError>;
