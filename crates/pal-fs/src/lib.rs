// Asset file access for palette and texture loading.

pub mod data_paths;
pub mod pak;
pub mod reader;
pub mod vfs;

pub use data_paths::{DataPathError, find_game_dir, locate_data_dir, locate_data_dir_in};
pub use pak::{Pak, PakEntry, PakError};
pub use reader::{ReadError, Reader};
pub use vfs::{File, FileSystem, FsError, QuakeFs};

#[cfg(test)]
pub(crate) mod tests {
    use log::LevelFilter;
    use simplelog::{Config, TestLogger};
    use std::fs;
    use std::path::PathBuf;
    use std::process;
    use std::sync::Once;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static START: Once = Once::new();
    static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

    pub fn init() {
        START.call_once(|| TestLogger::init(LevelFilter::Trace, Config::default()).unwrap());
    }

    pub fn temp_dir() -> PathBuf {
        let serial = NEXT_DIR.fetch_add(1, Ordering::Relaxed);
        let mut path = std::env::temp_dir();
        path.push(format!("pal-fs-test-{}-{}", process::id(), serial));
        fs::remove_dir_all(&path).ok();
        fs::create_dir_all(&path).unwrap();
        path
    }
}
