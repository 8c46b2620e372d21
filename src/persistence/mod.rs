use std::{
    collections::HashMap,
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    warn,
};

use crate::core::GengoError;

const APP_NAME: &str = "gengo";

pub fn default_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join(APP_NAME)
    } else {
        PathBuf::from(".")
    }
}

pub fn save_json<T: Serialize>(dir: &Path, data: &T, filename: &str) -> Result<(), GengoError> {
    fs::create_dir_all(dir)?;
    let file_path = dir.join(filename);
    let json = serde_json::to_string_pretty(data)?;
    write_atomic(&file_path, &json)?;
    debug!("Data saved to: {}", file_path.display());
    Ok(())
}

pub fn load_json<T: for<'de> Deserialize<'de> + Default>(
    dir: &Path,
    filename: &str,
) -> Result<T, GengoError> {
    let file_path = dir.join(filename);

    if !file_path.exists() {
        return Ok(T::default());
    }

    let json = fs::read_to_string(&file_path)?;
    let data: T = serde_json::from_str(&json)?;
    debug!("Data loaded from: {}", file_path.display());
    Ok(data)
}

pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Default>(
    dir: &Path,
    filename: &str,
) -> T {
    match load_json::<T>(dir, filename) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to load {}: {}. Using defaults.", filename, e);
            T::default()
        }
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), GengoError> {
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Durable key/value substrate holding serialized snapshots.
pub trait SnapshotStore {
    fn read(&self, key: &str) -> Result<Option<String>, GengoError>;

    fn write(&mut self, key: &str, contents: &str) -> Result<(), GengoError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, GengoError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<(), GengoError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        write_atomic(&path, contents)?;
        debug!("Snapshot '{}' written to {}", key, path.display());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, contents: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), contents.to_string());
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, GengoError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<(), GengoError> {
        self.entries.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}
