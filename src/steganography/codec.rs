//! # 单载体编解码
//!
//! 编码：跳过头部像素，依次把 quartet 写入每个像素的 R、G、B 低 2 bit，
//! 数据写完即停止，最后把写入的 quartet 数写入头部并输出 PNG。
//!
//! 解码：读出头部计数，按同样的顺序取出相应数量的 quartet，
//! 每 4 个重新组合为一个字节。

use super::carrier::Carrier;
use super::header::{read_header, write_header};
use super::quartet::{self, Quartet};
use super::stream::PayloadStream;
use crate::constants::{CHANNELS_PER_PIXEL, HEADER_PIXELS, QUARTETS_PER_BYTE};
use crate::error::{Result, StegError};
use std::io::{Read, Write};
use std::ops::ControlFlow;
use std::thread;

/// 载体最多能隐藏的数据字节数。
pub fn capacity(carrier: &Carrier) -> usize {
    carrier.usable_pixels() * CHANNELS_PER_PIXEL / QUARTETS_PER_BYTE
}

/// 将 `payload` 隐藏到 `carrier` 中，返回写入的 quartet 数。
///
/// # Errors
///
/// * [`StegError::PayloadTooLarge`] - 像素用完时数据仍有剩余。
/// * [`StegError::PayloadRead`] - 读取数据失败。
///
/// 出错时 `carrier` 已被部分修改，调用方应丢弃它。
pub fn encode_carrier<R>(carrier: &mut Carrier, payload: R) -> Result<u32>
where
    R: Read + Send,
{
    let count = thread::scope(|s| -> Result<u32> {
        let mut stream = PayloadStream::spawn(s, payload);
        let mut count: u32 = 0;

        let flow = carrier.for_each_pixel_mut(HEADER_PIXELS, |pixel| {
            for channel in &mut pixel.0[..CHANNELS_PER_PIXEL] {
                match stream.next() {
                    Some(Ok(q)) => {
                        *channel = quartet::set_low2(*channel, q);
                        count += 1;
                    }
                    Some(Err(e)) => return ControlFlow::Break(Err(e)),
                    None => return ControlFlow::Break(Ok(())),
                }
            }
            ControlFlow::Continue(())
        });

        match flow {
            ControlFlow::Break(result) => result?,
            // 像素已用完，数据流必须恰好结束
            ControlFlow::Continue(()) => match stream.next() {
                Some(Ok(_)) => return Err(StegError::PayloadTooLarge),
                Some(Err(e)) => return Err(e),
                None => {}
            },
        }

        Ok(count)
    })?;

    write_header(carrier, count);
    log::debug!(
        "embedded {count} quartets into {}x{} carrier",
        carrier.width(),
        carrier.height()
    );
    Ok(count)
}

/// 按头部计数从 `carrier` 中取出隐藏的数据。
pub fn decode_carrier(carrier: &Carrier) -> Vec<u8> {
    let expected = read_header(carrier);
    let available = carrier.usable_pixels() * CHANNELS_PER_PIXEL;
    let mut quartets: Vec<Quartet> = Vec::with_capacity(available.min(expected as usize));
    let mut remaining = i64::from(expected);

    let _ = carrier.for_each_pixel(HEADER_PIXELS, |pixel| {
        if remaining <= 0 {
            return ControlFlow::Break(());
        }
        quartets.extend(pixel.0[..CHANNELS_PER_PIXEL].iter().map(|&c| quartet::get_low2(c)));
        remaining -= CHANNELS_PER_PIXEL as i64;
        ControlFlow::Continue(())
    });

    if remaining < 0 {
        // 最后一个像素多读了 |remaining| 个
        quartets.truncate(quartets.len() - remaining.unsigned_abs() as usize);
    } else if remaining > 0 {
        log::warn!("header claims {expected} quartets but the carrier only holds {available}");
    }

    if quartets.len() % QUARTETS_PER_BYTE != 0 {
        log::warn!(
            "quartet count {} is not a whole number of bytes, padding with zeros",
            quartets.len()
        );
        quartets.resize(quartets.len().next_multiple_of(QUARTETS_PER_BYTE), 0);
    }

    quartets
        .chunks_exact(QUARTETS_PER_BYTE)
        .map(|g| quartet::join([g[0], g[1], g[2], g[3]]))
        .collect()
}

/// 读取 PNG/JPEG 载体，隐藏 `data`，并将结果以 PNG 写入 `result`。
pub fn encode<C, D, W>(carrier: C, data: D, result: W) -> Result<()>
where
    C: Read,
    D: Read + Send,
    W: Write,
{
    let mut carrier = Carrier::from_reader(carrier)?;
    encode_carrier(&mut carrier, data)?;
    carrier.write_png(result)
}

/// 从 `carrier` 中恢复数据并写入 `result`。
pub fn decode<C, W>(carrier: C, mut result: W) -> Result<()>
where
    C: Read,
    W: Write,
{
    let carrier = Carrier::from_reader(carrier)?;
    let data = decode_carrier(&carrier);
    log::debug!("recovered {} bytes", data.len());
    result.write_all(&data).map_err(StegError::ResultWrite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::{self, Cursor};

    fn solid(width: u32, height: u32) -> Carrier {
        Carrier::from(RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255])))
    }

    #[test]
    fn single_byte_round_trip() {
        // 头部 5 个像素 + 2 个数据像素
        let mut carrier = solid(1, 7);
        let count = encode_carrier(&mut carrier, &[0xA5u8][..]).unwrap();
        assert_eq!(count, 4);
        assert_eq!(read_header(&carrier), 4);
        assert_eq!(decode_carrier(&carrier), vec![0xA5]);
    }

    #[test]
    fn stops_writing_when_data_ends() {
        let mut carrier = solid(1, 10);
        encode_carrier(&mut carrier, &[0xFFu8][..]).unwrap();
        let image = carrier.into_image();

        // 第 6 个像素写满 R G B，第 7 个只写 R
        assert_eq!(*image.get_pixel(0, 5), Rgba([203, 103, 51, 255]));
        assert_eq!(*image.get_pixel(0, 6), Rgba([203, 100, 50, 255]));
        for y in 7..10 {
            assert_eq!(*image.get_pixel(0, y), Rgba([200, 100, 50, 255]));
        }
    }

    #[test]
    fn header_only_carrier_is_too_small() {
        let mut carrier = solid(1, 5);
        let err = encode_carrier(&mut carrier, &[0xA5u8][..]).unwrap_err();
        assert!(matches!(err, StegError::PayloadTooLarge));
    }

    #[test]
    fn empty_carrier_is_too_small() {
        let mut carrier = solid(0, 0);
        let err = encode_carrier(&mut carrier, &[0xA5u8][..]).unwrap_err();
        assert!(matches!(err, StegError::PayloadTooLarge));
    }

    #[test]
    fn exact_fit_is_accepted() {
        // 4 个数据像素 = 12 个 quartet = 3 字节
        let mut carrier = solid(3, 3);
        assert_eq!(capacity(&carrier), 3);
        encode_carrier(&mut carrier, &[1u8, 2, 3][..]).unwrap();
        assert_eq!(decode_carrier(&carrier), vec![1, 2, 3]);

        let mut carrier = solid(3, 3);
        let err = encode_carrier(&mut carrier, &[1u8, 2, 3, 4][..]).unwrap_err();
        assert!(matches!(err, StegError::PayloadTooLarge));
    }

    #[test]
    fn empty_payload_decodes_to_nothing() {
        let mut carrier = solid(4, 4);
        assert_eq!(encode_carrier(&mut carrier, io::empty()).unwrap(), 0);
        assert!(decode_carrier(&carrier).is_empty());
    }

    #[test]
    fn read_error_is_propagated() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "nope"))
            }
        }

        let mut carrier = solid(10, 10);
        let err = encode_carrier(&mut carrier, Broken).unwrap_err();
        assert!(matches!(err, StegError::PayloadRead(_)));
    }

    #[test]
    fn unaligned_header_count_is_padded() {
        let mut carrier = solid(1, 8);
        encode_carrier(&mut carrier, &[0xFFu8][..]).unwrap();
        // 只声明 2 个 quartet，剩下的补 0
        write_header(&mut carrier, 2);
        assert_eq!(decode_carrier(&carrier), vec![0xF0]);
    }

    #[test]
    fn header_count_with_bit_24_set_decodes_low_bits_only() {
        let mut carrier = solid(1, 10);
        encode_carrier(&mut carrier, &[0xC3u8, 0x3C][..]).unwrap();
        // bit 24 无法保存，读回的计数只剩 4
        write_header(&mut carrier, (1 << 24) | 4);
        assert_eq!(read_header(&carrier), 4);
        assert_eq!(decode_carrier(&carrier), vec![0xC3]);
    }

    #[test]
    fn oversized_header_count_reads_what_is_there() {
        let mut carrier = solid(1, 7);
        encode_carrier(&mut carrier, &[0x5Au8][..]).unwrap();
        write_header(&mut carrier, 1_000);
        // 2 个数据像素 = 6 个 quartet，补齐到 8
        let data = decode_carrier(&carrier);
        assert_eq!(data.len(), 2);
        assert_eq!(data[0], 0x5A);
    }

    #[test]
    fn encode_outputs_png_from_jpeg_carrier() {
        let mut jpeg = Cursor::new(Vec::new());
        RgbImage::from_pixel(16, 16, Rgb([90, 120, 150]))
            .write_to(&mut jpeg, image::ImageFormat::Jpeg)
            .unwrap();

        let mut png = Vec::new();
        encode(Cursor::new(jpeg.into_inner()), &b"hello"[..], &mut png).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), image::ImageFormat::Png);

        let mut recovered = Vec::new();
        decode(Cursor::new(png), &mut recovered).unwrap();
        assert_eq!(recovered, b"hello");
    }
}
