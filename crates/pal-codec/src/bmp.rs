// Windows bitmap access through the `image` BMP decoder.

use std::io::Cursor;

use image::codecs::bmp::BmpDecoder;
use image::{DynamicImage, ImageDecoder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BmpError {
    #[error("bitmap has no color table")]
    MissingPalette,
    #[error("bitmap decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb,
    Rgba,
}

#[derive(Debug, Clone)]
pub struct BmpImage<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    palette: Option<Vec<[u8; 3]>>,
}

impl<'a> BmpImage<'a> {
    /// Reads the bitmap headers and color table; pixels are decoded on demand.
    pub fn from_bytes(data: &'a [u8]) -> Result<Self, BmpError> {
        let mut decoder = BmpDecoder::new(Cursor::new(data))?;
        decoder.set_indexed_color(true);
        let (width, height) = decoder.dimensions();
        let palette = decoder.get_palette().map(|table| table.to_vec());

        Ok(Self {
            data,
            width,
            height,
            palette,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn has_palette(&self) -> bool {
        self.palette.is_some()
    }

    /// Color table as RGB triples, in table order.
    pub fn load_palette(&self) -> Result<Vec<u8>, BmpError> {
        let table = self.palette.as_ref().ok_or(BmpError::MissingPalette)?;
        Ok(table.iter().flatten().copied().collect())
    }

    /// Decoded pixels in top-down row order.
    pub fn load_pixels(&self, format: PixelFormat) -> Result<Vec<u8>, BmpError> {
        let decoder = BmpDecoder::new(Cursor::new(self.data))?;
        let image = DynamicImage::from_decoder(decoder)?;
        let pixels = match format {
            PixelFormat::Rgb => image.to_rgb8().into_raw(),
            PixelFormat::Rgba => image.to_rgba8().into_raw(),
        };
        Ok(pixels)
    }
}
