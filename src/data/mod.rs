pub mod item_def;
pub mod item_registry;

pub use item_def::{EquipmentSlot, EquipmentStats, ItemCategory, ItemEffects, ItemTemplate};
pub use item_registry::ItemRegistry;

use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// Collect files with the given extension under `dir`, sorted so load order
/// (and therefore which duplicate gets reported) is stable across platforms.
pub(crate) fn collect_files(dir: &Path, extension: &str, recursive: bool) -> Result<Vec<PathBuf>, LoadError> {
    let mut paths = Vec::new();
    collect_into(dir, extension, recursive, &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn collect_into(dir: &Path, extension: &str, recursive: bool, paths: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            if recursive {
                collect_into(&path, extension, recursive, paths)?;
            }
        } else if path.extension().is_some_and(|ext| ext == extension) {
            paths.push(path);
        }
    }

    Ok(())
}

pub(crate) fn read_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_toml<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T, LoadError> {
    toml::from_str(content).map_err(|source| LoadError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}
