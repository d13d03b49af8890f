//! # 像素载体
//!
//! 将解码后的图像统一展开为 RGBA8 像素网格，并按固定的光栅顺序遍历：
//! 外层循环 x，内层循环 y (先走完 x = 0 的整列，再到 x = 1)。
//! 编码与解码必须使用同一顺序，否则恢复出的数据是错乱的。

use crate::constants::HEADER_PIXELS;
use crate::error::{Result, StegError};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, Rgba, RgbaImage};
use std::io::{Read, Write};
use std::ops::ControlFlow;

/// 一张用于隐写的图像，只在一次编码或解码中使用。
#[derive(Debug)]
pub struct Carrier {
    image: RgbaImage,
    format: ImageFormat,
}

impl Carrier {
    /// 从读取器中读出全部字节并解码为载体。
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| StegError::Decode(image::ImageError::IoError(e)))?;
        Self::from_bytes(&bytes)
    }

    /// 解码 PNG 或 JPEG 图像。其他能识别的格式返回
    /// [`StegError::UnsupportedFormat`]，无法识别或已损坏的数据返回 [`StegError::Decode`]。
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes).map_err(StegError::Decode)?;
        if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
            return Err(StegError::UnsupportedFormat(
                format!("{format:?}").to_lowercase(),
            ));
        }

        let image = image::load_from_memory_with_format(bytes, format)
            .map_err(StegError::Decode)?
            .into_rgba8();

        log::debug!(
            "decoded {:?} carrier of {}x{} pixels",
            format,
            image.width(),
            image.height()
        );

        Ok(Self { image, format })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// 源图像的格式。输出始终是 PNG，与此无关。
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn pixel_count(&self) -> usize {
        self.image.width() as usize * self.image.height() as usize
    }

    /// 头部区域之后可用于承载数据的像素数。
    pub fn usable_pixels(&self) -> usize {
        self.pixel_count().saturating_sub(HEADER_PIXELS)
    }

    /// 按光栅顺序跳过前 `skip` 个像素，依次把可变像素交给 `f`。
    /// `f` 返回 [`ControlFlow::Break`] 时立即停止并返回该值。
    pub fn for_each_pixel_mut<B, F>(&mut self, skip: usize, mut f: F) -> ControlFlow<B>
    where
        F: FnMut(&mut Rgba<u8>) -> ControlFlow<B>,
    {
        let (width, height) = self.image.dimensions();
        for (x, y) in raster_order(width, height).skip(skip) {
            f(self.image.get_pixel_mut(x, y))?;
        }
        ControlFlow::Continue(())
    }

    /// [`Carrier::for_each_pixel_mut`] 的只读版本。
    pub fn for_each_pixel<B, F>(&self, skip: usize, mut f: F) -> ControlFlow<B>
    where
        F: FnMut(&Rgba<u8>) -> ControlFlow<B>,
    {
        let (width, height) = self.image.dimensions();
        for (x, y) in raster_order(width, height).skip(skip) {
            f(self.image.get_pixel(x, y))?;
        }
        ControlFlow::Continue(())
    }

    /// 将载体编码为 PNG 写入 `writer`，无论原始格式是什么。
    pub fn write_png<W: Write>(&self, writer: W) -> Result<()> {
        PngEncoder::new(writer)
            .write_image(
                self.image.as_raw(),
                self.image.width(),
                self.image.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(StegError::Encode)
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl From<RgbaImage> for Carrier {
    fn from(image: RgbaImage) -> Self {
        Self {
            image,
            format: ImageFormat::Png,
        }
    }
}

/// 外层 x，内层 y 的坐标序列。
fn raster_order(width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..width).flat_map(move |x| (0..height).map(move |y| (x, y)))
}
