// 256 color palette loading and indexed image expansion.

pub mod bmp;
pub mod color;
pub mod config;
pub mod decode;
pub mod error;
pub mod loader;
pub mod palette;

pub use bmp::{BmpError, BmpImage, PixelFormat};
pub use color::Color;
pub use config::PaletteConfig;
pub use decode::{Decoded, DecodedImage};
pub use error::{PaletteError, PaletteLoadError};
pub use loader::{PaletteFormat, load_bmp, load_file, load_lmp, load_pcx, load_raw};
pub use palette::{Palette, PaletteTransparency, Rgb};
