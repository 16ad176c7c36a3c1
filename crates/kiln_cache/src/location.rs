//! Where the stamp cache lives on disk.

use std::path::{Path, PathBuf};

use crate::error::CacheError;

/// File name of the stamp cache inside the engine's data directory.
pub const CACHE_FILE_NAME: &str = "modifyTimeCache.bin";

/// Returns `<data_dir>/<engine_name>/modifyTimeCache.bin`.
pub fn cache_path_in(data_dir: &Path, engine_name: &str) -> PathBuf {
    data_dir.join(engine_name).join(CACHE_FILE_NAME)
}

/// Returns the default cache path under the platform's per-user application
/// data directory (`%APPDATA%`, `~/Library/Application Support`, or
/// `$XDG_DATA_HOME`).
pub fn default_cache_path(engine_name: &str) -> Result<PathBuf, CacheError> {
    let data_dir = dirs::data_dir().ok_or(CacheError::NoDataDir)?;
    Ok(cache_path_in(&data_dir, engine_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_layout() {
        let path = cache_path_in(Path::new("/home/user/.local/share"), "CatDogEngine");
        assert!(path.ends_with("CatDogEngine/modifyTimeCache.bin"));
    }
}
