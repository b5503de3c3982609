// Palette loading from LMP, PCX and BMP sources.

use log::{debug, warn};
use pal_fs::{FileSystem, Reader};

use crate::bmp::{BmpImage, PixelFormat};
use crate::error::{PaletteError, PaletteLoadError};
use crate::palette::{PALETTE_RGB_BYTES, Palette};

const PCX_PALETTE_MARKER: u8 = 0x0c;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteFormat {
    Lmp,
    Pcx,
    Bmp,
    Unknown(String),
}

impl PaletteFormat {
    /// Picks the format from the lower-cased extension of the file name.
    pub fn from_path(path: &str) -> Self {
        let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "lmp" => PaletteFormat::Lmp,
            "pcx" => PaletteFormat::Pcx,
            "bmp" => PaletteFormat::Bmp,
            _ => PaletteFormat::Unknown(extension),
        }
    }
}

pub fn load_file<F>(fs: &F, path: &str) -> Result<Palette, PaletteLoadError>
where
    F: FileSystem + ?Sized,
{
    load_file_inner(fs, path).map_err(|source| PaletteLoadError::new(path, source))
}

fn load_file_inner<F>(fs: &F, path: &str) -> Result<Palette, PaletteError>
where
    F: FileSystem + ?Sized,
{
    let format = PaletteFormat::from_path(path);
    if let PaletteFormat::Unknown(extension) = &format {
        return Err(PaletteError::UnknownFormat(extension.clone()));
    }

    let file = fs.open_file(path)?;
    let mut reader = file.reader();
    debug!("loading {:?} palette from {} ({} bytes)", format, path, file.size());

    match format {
        PaletteFormat::Lmp => load_lmp(&mut reader),
        PaletteFormat::Pcx => load_pcx(&mut reader),
        PaletteFormat::Bmp => load_bmp(&mut reader),
        PaletteFormat::Unknown(extension) => Err(PaletteError::UnknownFormat(extension)),
    }
}

/// Headerless 256 RGB triples.
pub fn load_lmp(reader: &mut Reader<'_>) -> Result<Palette, PaletteError> {
    load_raw(reader)
}

/// Palette stored in the last 768 bytes of a PCX file.
///
/// The `0x0C` marker byte in front of the palette is not consumed; a file
/// without it still loads but is reported.
pub fn load_pcx(reader: &mut Reader<'_>) -> Result<Palette, PaletteError> {
    if reader.size() > PALETTE_RGB_BYTES {
        reader.seek_from_end(PALETTE_RGB_BYTES + 1)?;
        let marker = reader.read_u8()?;
        if marker != PCX_PALETTE_MARKER {
            warn!("pcx palette marker is 0x{:02x}, expected 0x0c", marker);
        }
    }

    reader.seek_from_end(PALETTE_RGB_BYTES)?;
    let mut data = [0u8; PALETTE_RGB_BYTES];
    reader.read(&mut data)?;
    Palette::from_bytes(&data)
}

/// Uses the bitmap's color table, or its RGB pixels when it has none.
pub fn load_bmp(reader: &mut Reader<'_>) -> Result<Palette, PaletteError> {
    let bytes = reader.read_to_vec();
    let image = BmpImage::from_bytes(&bytes)?;
    let data = if image.has_palette() {
        image.load_palette()?
    } else {
        image.load_pixels(PixelFormat::Rgb)?
    };
    Palette::from_bytes(&data)
}

/// All remaining bytes of `reader` as 256 RGB triples.
pub fn load_raw(reader: &mut Reader<'_>) -> Result<Palette, PaletteError> {
    let data = reader.read_to_vec();
    Palette::from_bytes(&data)
}
