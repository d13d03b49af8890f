//! 字节与 2 bit 单元 (quartet) 之间的转换。
//!
//! 一个字节按从高到低的顺序拆成四个 quartet：
//! 第 0 个为 bit 7-6，第 3 个为 bit 1-0。

/// 取值范围为 `0..=3` 的 2 bit 单元。
pub type Quartet = u8;

const LOW_TWO_BITS: u8 = 0b0000_0011;

/// 将字节拆分为四个 quartet，最高位在前。
pub fn split(byte: u8) -> [Quartet; 4] {
    [
        (byte & 0b1100_0000) >> 6,
        (byte & 0b0011_0000) >> 4,
        (byte & 0b0000_1100) >> 2,
        byte & LOW_TWO_BITS,
    ]
}

/// [`split`] 的逆运算。
pub fn join(quartets: [Quartet; 4]) -> u8 {
    let [q0, q1, q2, q3] = quartets;
    (q0 << 6) | (q1 << 4) | (q2 << 2) | q3
}

/// 用 `value` 的低 2 bit 替换 `byte` 的低 2 bit。
pub fn set_low2(byte: u8, value: Quartet) -> u8 {
    (byte & !LOW_TWO_BITS) | (value & LOW_TWO_BITS)
}

pub fn get_low2(byte: u8) -> Quartet {
    byte & LOW_TWO_BITS
}
