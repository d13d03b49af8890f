/// 为数据长度头部保留的"字节"数。
/// 每个像素按 4 个字节 (R, G, B, A) 计，因此 20 字节对应 5 个像素。
pub const RESERVED_BYTES: usize = 20;

/// 头部区域占用的像素数，位于扫描顺序的最前面。
pub const HEADER_PIXELS: usize = RESERVED_BYTES / 4;

/// 每个像素中承载数据的通道数 (R, G, B)，Alpha 通道从不修改。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 头部区域实际能容纳的 2 bit 单元数。
/// 长度是 `u32`，需要 16 个单元，但只写入前 15 个，第 16 个 (bit 24-25) 恒为 0。
pub const HEADER_QUARTETS: usize = HEADER_PIXELS * CHANNELS_PER_PIXEL;

/// 一个字节拆分出的 2 bit 单元数。
pub const QUARTETS_PER_BYTE: usize = 4;

/// 头部无法保存的计数位：小端序第 4 个字节的低 2 bit，即 bit 24-25。
/// 计数小于 2^24 时不受影响。
pub const LOST_HEADER_BITS: u32 = 0x0300_0000;

/// 生产者与消费者之间缓冲的 2 bit 单元数。
pub const STREAM_CAPACITY: usize = 128;

/// 编码时默认结果文件名的前缀，依次为 `result0`, `result1`, ...
pub const DEFAULT_RESULT_PREFIX: &str = "result";

/// 解码时默认的结果文件名。
pub const DEFAULT_DECODE_RESULT: &str = "result";
