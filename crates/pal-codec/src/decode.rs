// Indexed pixel expansion with per-image statistics.

use log::trace;
use pal_fs::Reader;

use crate::color::Color;
use crate::palette::{PALETTE_RGBA_BYTES, Palette, PaletteTransparency};

/// Statistics gathered while expanding an indexed image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoded {
    /// Set only for `Index255Transparent` images that reference index 255.
    pub has_transparency: bool,
    /// Mean RGB of the expanded pixels, alpha fixed at 1.0. Black when empty.
    pub average_color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub rgba: Vec<u8>,
    pub has_transparency: bool,
    pub average_color: Color,
}

impl Palette {
    /// Expands `pixel_count` index bytes from `reader` into `dest` as RGBA.
    ///
    /// The reader advances by exactly `pixel_count` bytes. Only the first
    /// `4 * pixel_count` bytes of `dest` are written.
    ///
    /// # Panics
    ///
    /// Panics if `reader` has fewer than `pixel_count` bytes left or `dest` is
    /// shorter than `4 * pixel_count`. Both are caller bugs.
    pub fn indexed_to_rgba(
        &self,
        reader: &mut Reader<'_>,
        pixel_count: usize,
        dest: &mut [u8],
        transparency: PaletteTransparency,
    ) -> Decoded {
        let rgba_len = pixel_count
            .checked_mul(4)
            .unwrap_or_else(|| panic!("pixel count {pixel_count} overflows the RGBA buffer size"));
        assert!(
            dest.len() >= rgba_len,
            "RGBA buffer holds {} bytes, {} pixels need {}",
            dest.len(),
            pixel_count,
            rgba_len
        );
        let indices = match reader.read_bytes(pixel_count) {
            Ok(indices) => indices,
            Err(err) => panic!("indexed image overruns its source: {err}"),
        };

        expand_into(
            self.data(transparency),
            indices,
            &mut dest[..rgba_len],
            transparency,
        )
    }

    pub fn expand_indices(&self, indices: &[u8], transparency: PaletteTransparency) -> DecodedImage {
        let mut rgba = vec![0u8; indices.len() * 4];
        let decoded = expand_into(self.data(transparency), indices, &mut rgba, transparency);
        DecodedImage {
            rgba,
            has_transparency: decoded.has_transparency,
            average_color: decoded.average_color,
        }
    }
}

fn expand_into(
    table: &[u8; PALETTE_RGBA_BYTES],
    indices: &[u8],
    dest: &mut [u8],
    transparency: PaletteTransparency,
) -> Decoded {
    debug_assert_eq!(dest.len(), indices.len() * 4);

    let mut sum = [0u64; 3];
    let mut and_alpha = 0xffu8;
    for (&index, out) in indices.iter().zip(dest.chunks_exact_mut(4)) {
        let base = index as usize * 4;
        let rgba = &table[base..base + 4];
        out.copy_from_slice(rgba);

        sum[0] += rgba[0] as u64;
        sum[1] += rgba[1] as u64;
        sum[2] += rgba[2] as u64;
        and_alpha &= rgba[3];
    }

    let has_transparency =
        transparency == PaletteTransparency::Index255Transparent && and_alpha != 0xff;

    let average_color = if indices.is_empty() {
        Color::BLACK
    } else {
        let scale = 255.0 * indices.len() as f32;
        Color::new(
            sum[0] as f32 / scale,
            sum[1] as f32 / scale,
            sum[2] as f32 / scale,
            1.0,
        )
    };

    trace!(
        "expanded {} pixels ({:?}), transparent: {}",
        indices.len(),
        transparency,
        has_transparency
    );

    Decoded {
        has_transparency,
        average_color,
    }
}
