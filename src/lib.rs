//! # quartet_steg 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：将任意字节流隐藏在 PNG/JPEG
//! 图像每个像素 R、G、B 通道的最低 2 bit 中，并可将数据拆分到多张图像。

// 声明库包含的所有模块。

pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod steganography;

pub use error::{Result, StegError};
