//! # 隐写核心
//!
//! 每个像素的 R、G、B 通道各承载 2 bit，Alpha 通道不变。
//! 光栅顺序的前几个像素保留给数据长度头部，其后依次存放数据。

pub mod carrier;
pub mod codec;
pub mod header;
pub mod multi;
pub mod quartet;
pub mod stream;

pub use carrier::Carrier;
pub use codec::{capacity, decode, decode_carrier, encode, encode_carrier};
pub use multi::{multi_carrier_decode, multi_carrier_encode, split_chunks};
