// Quake palette storage and expansion to RGBA lookup tables.

use std::sync::Arc;

use crate::error::PaletteError;

pub const PALETTE_COLORS: usize = 256;
pub const PALETTE_RGB_BYTES: usize = PALETTE_COLORS * 3;
pub const PALETTE_RGBA_BYTES: usize = PALETTE_COLORS * 4;

pub const TRANSPARENT_INDEX: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Which lookup table an indexed image is expanded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteTransparency {
    #[default]
    Opaque,
    Index255Transparent,
}

impl PaletteTransparency {
    /// Fence textures (`{name`) reserve index 255 for see-through texels.
    pub fn for_texture_name(name: &str) -> Self {
        if name.starts_with('{') {
            PaletteTransparency::Index255Transparent
        } else {
            PaletteTransparency::Opaque
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct PaletteData {
    opaque: [u8; PALETTE_RGBA_BYTES],
    index255_transparent: [u8; PALETTE_RGBA_BYTES],
}

/// Immutable 256 color palette, cheap to clone and share between threads.
///
/// Both tables hold the same RGBA entries with alpha 255, except that entry
/// 255 of the index-255-transparent table has alpha 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    data: Arc<PaletteData>,
}

impl Palette {
    /// Builds a palette from exactly 256 RGB triples.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PaletteError> {
        if data.len() != PALETTE_RGB_BYTES {
            return Err(PaletteError::InvalidLength(data.len()));
        }

        let mut opaque = [0u8; PALETTE_RGBA_BYTES];
        for (rgb, rgba) in data.chunks_exact(3).zip(opaque.chunks_exact_mut(4)) {
            rgba[..3].copy_from_slice(rgb);
            rgba[3] = 0xff;
        }

        let mut index255_transparent = opaque;
        index255_transparent[PALETTE_RGBA_BYTES - 1] = 0;

        Ok(Self {
            data: Arc::new(PaletteData {
                opaque,
                index255_transparent,
            }),
        })
    }

    pub fn opaque_data(&self) -> &[u8; PALETTE_RGBA_BYTES] {
        &self.data.opaque
    }

    pub fn index255_transparent_data(&self) -> &[u8; PALETTE_RGBA_BYTES] {
        &self.data.index255_transparent
    }

    pub fn data(&self, transparency: PaletteTransparency) -> &[u8; PALETTE_RGBA_BYTES] {
        match transparency {
            PaletteTransparency::Opaque => self.opaque_data(),
            PaletteTransparency::Index255Transparent => self.index255_transparent_data(),
        }
    }

    pub fn rgba_for(&self, index: u8, transparency: PaletteTransparency) -> [u8; 4] {
        let base = index as usize * 4;
        let table = self.data(transparency);
        [table[base], table[base + 1], table[base + 2], table[base + 3]]
    }

    pub fn rgb(&self, index: u8) -> Rgb {
        let [r, g, b, _] = self.rgba_for(index, PaletteTransparency::Opaque);
        Rgb(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::gradient_palette_bytes;

    #[test]
    fn loads_palette_bytes() {
        let bytes = gradient_palette_bytes();
        let palette = Palette::from_bytes(&bytes).unwrap();

        for index in 0..=255u8 {
            let i = index as usize;
            assert_eq!(
                palette.rgba_for(index, PaletteTransparency::Opaque),
                [bytes[i * 3], bytes[i * 3 + 1], bytes[i * 3 + 2], 255]
            );
        }
        assert_eq!(palette.rgb(0), Rgb(0, 0, 255));
        assert_eq!(palette.rgb(255), Rgb(255, 0, 0));
    }

    #[test]
    fn transparent_table_differs_only_in_last_alpha() {
        let palette = Palette::from_bytes(&gradient_palette_bytes()).unwrap();
        let opaque = palette.opaque_data();
        let transparent = palette.index255_transparent_data();

        assert_eq!(opaque[..PALETTE_RGBA_BYTES - 1], transparent[..PALETTE_RGBA_BYTES - 1]);
        assert_eq!(opaque[PALETTE_RGBA_BYTES - 1], 255);
        assert_eq!(transparent[PALETTE_RGBA_BYTES - 1], 0);
        assert_eq!(
            palette.rgba_for(TRANSPARENT_INDEX, PaletteTransparency::Index255Transparent),
            [255, 0, 0, 0]
        );
    }

    #[test]
    fn rejects_wrong_length() {
        for len in [0, 767, 769, 1024] {
            match Palette::from_bytes(&vec![0u8; len]) {
                Err(PaletteError::InvalidLength(got)) => assert_eq!(got, len),
                other => panic!("unexpected result for {len} bytes: {:?}", other),
            }
        }
    }

    #[test]
    fn single_red_entry_scenario() {
        let mut bytes = vec![0u8; PALETTE_RGB_BYTES];
        bytes[0] = 255;
        let palette = Palette::from_bytes(&bytes).unwrap();

        assert_eq!(palette.rgba_for(0, PaletteTransparency::Opaque), [255, 0, 0, 255]);
        assert_eq!(
            palette.rgba_for(0, PaletteTransparency::Index255Transparent),
            [255, 0, 0, 255]
        );
        assert_eq!(
            palette.rgba_for(255, PaletteTransparency::Index255Transparent),
            [0, 0, 0, 0]
        );
    }

    #[test]
    fn clones_share_tables() {
        let palette = Palette::from_bytes(&gradient_palette_bytes()).unwrap();
        let clone = palette.clone();
        assert!(std::ptr::eq(palette.opaque_data(), clone.opaque_data()));
    }

    #[test]
    fn selects_transparency_from_texture_name() {
        assert_eq!(
            PaletteTransparency::for_texture_name("{grate1_1"),
            PaletteTransparency::Index255Transparent
        );
        assert_eq!(
            PaletteTransparency::for_texture_name("*water0"),
            PaletteTransparency::Opaque
        );
        assert_eq!(PaletteTransparency::default(), PaletteTransparency::Opaque);
    }
}
