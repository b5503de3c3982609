// Quake-style search paths over directories and PAK files.

use std::fs;
use std::path::{Component, Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::data_paths::DataPathError;
use crate::pak::{Pak, PakError};
use crate::reader::Reader;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("'{}' is not a directory", .0.display())]
    InvalidDir(PathBuf),
    #[error("unsafe path '{0}'")]
    InvalidPath(String),
    #[error("file '{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    Pak(#[from] PakError),
    #[error(transparent)]
    DataPath(#[from] DataPathError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of asset files addressed by game-relative paths.
pub trait FileSystem {
    fn open_file(&self, path: &str) -> Result<File, FsError>;
}

/// Contents of an opened asset file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: String,
    data: Vec<u8>,
}

impl File {
    pub fn new(path: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn reader(&self) -> Reader<'_> {
        Reader::new(&self.data)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[derive(Debug)]
enum SearchPath {
    Pack(Pak),
    Dir(PathBuf),
}

#[derive(Debug, Default)]
pub struct QuakeFs {
    search_paths: Vec<SearchPath>,
}

impl QuakeFs {
    pub fn new() -> Self {
        Self {
            search_paths: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search_paths.is_empty()
    }

    /// Adds `dir` and its `pakN.pak` archives ahead of everything already searched.
    pub fn add_game_dir(&mut self, dir: impl AsRef<Path>) -> Result<(), FsError> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(FsError::InvalidDir(dir));
        }

        let mut packs = Vec::new();
        for index in 0.. {
            let pak_path = dir.join(format!("pak{}.pak", index));
            if !pak_path.exists() {
                break;
            }
            packs.push(Pak::open(pak_path)?);
        }
        debug!("adding game dir {} with {} paks", dir.display(), packs.len());

        let mut new_paths = Vec::new();
        for pack in packs.into_iter().rev() {
            new_paths.push(SearchPath::Pack(pack));
        }
        new_paths.push(SearchPath::Dir(dir));

        self.search_paths.splice(0..0, new_paths);
        Ok(())
    }

    pub fn add_pak(&mut self, path: impl AsRef<Path>) -> Result<(), FsError> {
        let pack = Pak::open(path)?;
        self.search_paths.insert(0, SearchPath::Pack(pack));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        if !is_safe_relative_path(name) {
            return false;
        }

        self.search_paths.iter().any(|search| match search {
            SearchPath::Pack(pack) => pack.find(name).is_some(),
            SearchPath::Dir(dir) => dir.join(name).is_file(),
        })
    }

    pub fn read(&self, name: &str) -> Result<Vec<u8>, FsError> {
        if !is_safe_relative_path(name) {
            return Err(FsError::InvalidPath(name.to_string()));
        }

        for search in &self.search_paths {
            match search {
                SearchPath::Pack(pack) => {
                    if let Some(entry) = pack.find(name) {
                        return Ok(pack.read(entry)?);
                    }
                }
                SearchPath::Dir(dir) => {
                    let path = dir.join(name);
                    if path.is_file() {
                        return Ok(fs::read(path)?);
                    }
                }
            }
        }

        Err(FsError::NotFound(name.to_string()))
    }
}

impl FileSystem for QuakeFs {
    fn open_file(&self, path: &str) -> Result<File, FsError> {
        let data = self.read(path)?;
        Ok(File::new(path, data))
    }
}

fn is_safe_relative_path(name: &str) -> bool {
    if name.is_empty() || name.contains(':') || name.contains('\0') {
        return false;
    }

    let path = Path::new(name);
    if path.is_absolute() {
        return false;
    }

    path.components().all(|component| {
        !matches!(
            component,
            Component::ParentDir | Component::Prefix(_) | Component::RootDir
        )
    })
}
