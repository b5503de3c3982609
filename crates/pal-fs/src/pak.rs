// PACK archive reader (id Tech 1 format).

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

const HEADER_LEN: usize = 12;
const DIR_ENTRY_LEN: usize = 64;
const NAME_LEN: usize = 56;

#[derive(Debug, Error)]
pub enum PakError {
    #[error("pak I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing PACK identifier")]
    InvalidHeader,
    #[error("directory length {0} is not a multiple of 64")]
    InvalidDirectory(u64),
    #[error("no entry named '{0}'")]
    EntryNotFound(String),
    #[error("range {offset}+{length} runs past the end of a {file_len} byte pak")]
    OutOfBounds { offset: u64, length: u64, file_len: u64 },
}

#[derive(Debug, Clone)]
pub struct PakEntry {
    pub name: String,
    pub offset: u32,
    pub length: u32,
}

#[derive(Debug)]
pub struct Pak {
    path: PathBuf,
    entries: Vec<PakEntry>,
}

impl Pak {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PakError> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;
        let file_len = file.metadata()?.len();

        let mut header = [0u8; HEADER_LEN];
        file.read_exact(&mut header)?;
        if &header[0..4] != b"PACK" {
            return Err(PakError::InvalidHeader);
        }

        let dir_offset = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as u64;
        let dir_length = u32::from_le_bytes([header[8], header[9], header[10], header[11]]) as u64;
        if dir_length % DIR_ENTRY_LEN as u64 != 0 {
            return Err(PakError::InvalidDirectory(dir_length));
        }

        check_range(dir_offset, dir_length, file_len)?;
        file.seek(SeekFrom::Start(dir_offset))?;
        let mut dir_data = vec![0u8; dir_length as usize];
        file.read_exact(&mut dir_data)?;

        let entries: Vec<PakEntry> = dir_data.chunks_exact(DIR_ENTRY_LEN).map(parse_entry).collect();
        debug!("opened {} with {} entries", path.display(), entries.len());

        Ok(Pak { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[PakEntry] {
        &self.entries
    }

    pub fn find(&self, name: &str) -> Option<&PakEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn find_case_insensitive(&self, name: &str) -> Option<&PakEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    pub fn read(&self, entry: &PakEntry) -> Result<Vec<u8>, PakError> {
        let mut file = File::open(&self.path)?;
        check_range(entry.offset as u64, entry.length as u64, file.metadata()?.len())?;
        file.seek(SeekFrom::Start(entry.offset as u64))?;

        let mut data = vec![0u8; entry.length as usize];
        file.read_exact(&mut data)?;
        Ok(data)
    }

    pub fn read_by_name(&self, name: &str) -> Result<Vec<u8>, PakError> {
        let entry = self
            .find(name)
            .ok_or_else(|| PakError::EntryNotFound(name.to_string()))?;
        self.read(entry)
    }
}

fn check_range(offset: u64, length: u64, file_len: u64) -> Result<(), PakError> {
    if offset + length > file_len {
        return Err(PakError::OutOfBounds {
            offset,
            length,
            file_len,
        });
    }
    Ok(())
}

fn parse_entry(raw: &[u8]) -> PakEntry {
    let name_buf = &raw[..NAME_LEN];
    let name_len = name_buf.iter().position(|b| *b == 0).unwrap_or(NAME_LEN);
    let name = String::from_utf8_lossy(&name_buf[..name_len]).to_string();
    let offset = u32::from_le_bytes([raw[56], raw[57], raw[58], raw[59]]);
    let length = u32::from_le_bytes([raw[60], raw[61], raw[62], raw[63]]);
    PakEntry {
        name,
        offset,
        length,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tests::{init, temp_dir};
    use std::fs;
    use std::io::Write;

    pub(crate) fn write_pak(path: &Path, entries: &[(&str, &[u8])]) -> std::io::Result<()> {
        let mut data = vec![0u8; HEADER_LEN];

        let mut offsets = Vec::new();
        for (_, bytes) in entries {
            let offset = data.len() as u32;
            data.extend_from_slice(bytes);
            offsets.push((offset, bytes.len() as u32));
        }

        let dir_offset = data.len() as u32;
        let dir_len = (entries.len() * DIR_ENTRY_LEN) as u32;

        for ((name, _), (offset, length)) in entries.iter().zip(offsets.iter()) {
            let mut name_buf = [0u8; NAME_LEN];
            let name_bytes = name.as_bytes();
            let copy_len = name_bytes.len().min(NAME_LEN - 1);
            name_buf[..copy_len].copy_from_slice(&name_bytes[..copy_len]);
            data.extend_from_slice(&name_buf);
            data.extend_from_slice(&offset.to_le_bytes());
            data.extend_from_slice(&length.to_le_bytes());
        }

        data[0..4].copy_from_slice(b"PACK");
        data[4..8].copy_from_slice(&dir_offset.to_le_bytes());
        data[8..12].copy_from_slice(&dir_len.to_le_bytes());

        let mut file = File::create(path)?;
        file.write_all(&data)?;
        Ok(())
    }

    #[test]
    fn reads_entry() {
        init();
        let dir = temp_dir();
        let pak_path = dir.join("pak0.pak");
        write_pak(pak_path.as_path(), &[("gfx/palette.lmp", b"hello")]).unwrap();

        let pak = Pak::open(&pak_path).unwrap();
        assert_eq!(pak.entries().len(), 1);
        let data = pak.read_by_name("gfx/palette.lmp").unwrap();
        assert_eq!(data, b"hello");

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn rejects_invalid_header() {
        init();
        let dir = temp_dir();
        let pak_path = dir.join("pak0.pak");
        fs::write(&pak_path, b"BAD!00000000").unwrap();

        let err = Pak::open(&pak_path).unwrap_err();
        match err {
            PakError::InvalidHeader => {}
            other => panic!("unexpected error: {:?}", other),
        }

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn finds_entries_case_insensitively() {
        init();
        let dir = temp_dir();
        let pak_path = dir.join("pak0.pak");
        write_pak(pak_path.as_path(), &[("GFX/PALETTE.LMP", b"data")]).unwrap();

        let pak = Pak::open(&pak_path).unwrap();
        assert!(pak.find("gfx/palette.lmp").is_none());
        assert!(pak.find_case_insensitive("gfx/palette.lmp").is_some());
        assert!(matches!(
            pak.read_by_name("gfx/palette.lmp"),
            Err(PakError::EntryNotFound(_))
        ));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn rejects_directory_past_end_of_file() {
        init();
        let dir = temp_dir();
        let pak_path = dir.join("pak0.pak");
        let mut data = b"PACK".to_vec();
        data.extend_from_slice(&12u32.to_le_bytes());
        data.extend_from_slice(&(DIR_ENTRY_LEN as u32 * 0x0100_0000).to_le_bytes());
        fs::write(&pak_path, &data).unwrap();

        match Pak::open(&pak_path) {
            Err(PakError::OutOfBounds {
                offset: 12,
                file_len: 12,
                ..
            }) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn rejects_entry_past_end_of_file() {
        init();
        let dir = temp_dir();
        let pak_path = dir.join("pak0.pak");
        write_pak(pak_path.as_path(), &[("gfx/palette.lmp", b"hello")]).unwrap();

        let pak = Pak::open(&pak_path).unwrap();
        let mut entry = pak.entries()[0].clone();
        entry.length = u32::MAX;

        assert!(matches!(
            pak.read(&entry),
            Err(PakError::OutOfBounds { offset: 12, length, .. }) if length == u32::MAX as u64
        ));
        assert_eq!(pak.read(&pak.entries()[0]).unwrap(), b"hello");

        fs::remove_dir_all(dir).ok();
    }
}
