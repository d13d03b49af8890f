//! # 数据长度头部
//!
//! 光栅顺序的前 [`HEADER_PIXELS`] 个像素保留给一个 `u32` 计数，
//! 表示该载体中写入了多少个 quartet。计数按小端序拆成 16 个 quartet，
//! 但头部只有 15 个通道，最后一个永远不写入，读取时补 0。
//! 字节内是高位在前，所以丢失的是第 4 个字节的低 2 bit，即计数的 bit 24-25
//! ([`LOST_HEADER_BITS`])。计数小于 2^24 (约 4 MiB 数据) 时能完整保存；
//! 更大的计数若设置了这两位，读回时会被清零。
//! 保持这一行为是为了与已有的隐写图像兼容。

use super::carrier::Carrier;
use super::quartet::{self, Quartet};
use crate::constants::{CHANNELS_PER_PIXEL, HEADER_PIXELS, HEADER_QUARTETS, LOST_HEADER_BITS};
use std::ops::ControlFlow;

/// 计数写入头部后能否原样读回。
pub fn fits_header(count: u32) -> bool {
    count & LOST_HEADER_BITS == 0
}

/// 将计数写入头部区域。
pub fn write_header(carrier: &mut Carrier, count: u32) {
    if !fits_header(count) {
        log::warn!(
            "unit count {count:#x} sets bits 24-25, header will read back {:#x}",
            count & !LOST_HEADER_BITS
        );
    }

    let quartets = quartets_of(count);
    let mut header = quartets[..HEADER_QUARTETS].chunks_exact(CHANNELS_PER_PIXEL);

    let _ = carrier.for_each_pixel_mut(0, |pixel| match header.next() {
        Some(trio) => {
            for (channel, &value) in pixel.0.iter_mut().zip(trio) {
                *channel = quartet::set_low2(*channel, value);
            }
            ControlFlow::Continue(())
        }
        None => ControlFlow::Break(()),
    });
}

/// 从头部区域读出计数，是 [`write_header`] 的逆运算。
pub fn read_header(carrier: &Carrier) -> u32 {
    let mut quartets: Vec<Quartet> = Vec::with_capacity(HEADER_QUARTETS + 1);
    let mut remaining = HEADER_PIXELS;

    let _ = carrier.for_each_pixel(0, |pixel| {
        if remaining == 0 {
            return ControlFlow::Break(());
        }
        remaining -= 1;
        quartets.extend(pixel.0[..CHANNELS_PER_PIXEL].iter().map(|&c| quartet::get_low2(c)));
        ControlFlow::Continue(())
    });

    // 图像小于头部区域时缺失的通道按 0 处理，再补上从不写入的第 16 个
    quartets.resize(HEADER_QUARTETS + 1, 0);

    let mut bytes = [0u8; 4];
    for (byte, group) in bytes.iter_mut().zip(quartets.chunks_exact(4)) {
        *byte = quartet::join([group[0], group[1], group[2], group[3]]);
    }
    u32::from_le_bytes(bytes)
}

fn quartets_of(count: u32) -> [Quartet; 16] {
    let mut quartets = [0; 16];
    for (slot, byte) in quartets.chunks_exact_mut(4).zip(count.to_le_bytes()) {
        slot.copy_from_slice(&quartet::split(byte));
    }
    quartets
}
