//! # 多载体拆分与拼接
//!
//! 数据被切成与载体数量相同的连续块，每块独立隐藏在对应的载体中，
//! 并带有各自的长度头部。载体中不记录块序号，
//! 解码时必须按编码时的顺序提供载体，否则拼接出的数据是错的且无法察觉。

use super::codec::{decode, encode};
use crate::error::{Result, StegError};
use std::io::{Read, Write};

/// 将 `data` 切成 `parts` 个连续块。前 `parts - 1` 块长度均为
/// `len / parts`，最后一块包含剩余的全部字节。
///
/// `parts` 为 0 时返回空列表。
pub fn split_chunks(data: &[u8], parts: usize) -> Vec<&[u8]> {
    if parts == 0 {
        return Vec::new();
    }
    let chunk_size = data.len() / parts;
    let mut chunks: Vec<&[u8]> = (0..parts - 1)
        .map(|i| &data[i * chunk_size..(i + 1) * chunk_size])
        .collect();
    chunks.push(&data[(parts - 1) * chunk_size..]);
    chunks
}

/// 将 `data` 平均分配到各个载体中，第 `i` 块写入 `results[i]`。
///
/// 任一载体失败即中止，并通过 [`StegError::Chunk`] 报告其序号。
/// 已经写入的结果不会被回滚，由调用方负责清理。
pub fn multi_carrier_encode<C, D, W>(carriers: Vec<C>, mut data: D, results: Vec<W>) -> Result<()>
where
    C: Read,
    D: Read,
    W: Write,
{
    if carriers.is_empty() {
        return Err(StegError::MissingInput);
    }
    if carriers.len() != results.len() {
        return Err(StegError::CountMismatch {
            carriers: carriers.len(),
            results: results.len(),
        });
    }

    let mut payload = Vec::new();
    data.read_to_end(&mut payload).map_err(StegError::PayloadRead)?;

    let chunks = split_chunks(&payload, carriers.len());
    let jobs = carriers.into_iter().zip(chunks).zip(results);
    for (index, ((carrier, chunk), result)) in jobs.enumerate() {
        log::debug!("encoding chunk {index} ({} bytes)", chunk.len());
        encode(carrier, chunk, result).map_err(|e| e.at_chunk(index))?;
    }
    Ok(())
}

/// 依次解码每个载体，按给定顺序将结果拼接写入 `result`。
pub fn multi_carrier_decode<C, W>(carriers: Vec<C>, mut result: W) -> Result<()>
where
    C: Read,
    W: Write,
{
    if carriers.is_empty() {
        return Err(StegError::MissingInput);
    }

    for (index, carrier) in carriers.into_iter().enumerate() {
        log::debug!("decoding chunk {index}");
        decode(carrier, &mut result).map_err(|e| e.at_chunk(index))?;
    }
    Ok(())
}
