// Where the game palette lives inside a Quake install.

use std::path::Path;

use log::debug;
use pal_fs::data_paths::DEFAULT_GAME_DIR;
use pal_fs::{FileSystem, FsError, QuakeFs, find_game_dir, locate_data_dir};

use crate::error::PaletteLoadError;
use crate::loader::load_file;
use crate::palette::Palette;

pub const DEFAULT_PALETTE_PATH: &str = "gfx/palette.lmp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteConfig {
    pub game_dir: String,
    pub palette_path: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            game_dir: DEFAULT_GAME_DIR.to_string(),
            palette_path: DEFAULT_PALETTE_PATH.to_string(),
        }
    }
}

impl PaletteConfig {
    pub fn with_game_dir(mut self, game_dir: impl Into<String>) -> Self {
        self.game_dir = game_dir.into();
        self
    }

    pub fn with_palette_path(mut self, path: impl Into<String>) -> Self {
        self.palette_path = path.into();
        self
    }

    /// Search paths for the configured game directory under `data_dir`.
    pub fn open_fs(&self, data_dir: &Path) -> Result<QuakeFs, FsError> {
        let game_dir = find_game_dir(data_dir, &self.game_dir)
            .ok_or_else(|| FsError::InvalidDir(data_dir.join(&self.game_dir)))?;
        debug!("palette game dir: {}", game_dir.display());

        let mut fs = QuakeFs::new();
        fs.add_game_dir(game_dir)?;
        Ok(fs)
    }

    /// Like [`open_fs`](Self::open_fs) for the install found by [`locate_data_dir`].
    pub fn open_default_fs(&self) -> Result<QuakeFs, FsError> {
        let data_dir = locate_data_dir()?;
        self.open_fs(&data_dir)
    }

    pub fn load_palette<F>(&self, fs: &F) -> Result<Palette, PaletteLoadError>
    where
        F: FileSystem + ?Sized,
    {
        load_file(fs, &self.palette_path)
    }
}
