use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use crate::{Result, Error};
use log::warn;

pub(crate) type NamespaceData = HashMap<String, serde_json::Value>;

/// Handles disk I/O for the [`crate::engine::MemStorage`].
///
/// Persistence uses an atomic "write-then-rename" strategy to ensure data integrity.
/// Each namespace is stored in its own `.json` file.
pub struct Persistence {
    data_dir: PathBuf,
}

impl Persistence {
    /// Initializes a new `Persistence` handler in the specified directory.
    ///
    /// If the directory does not exist, it will be created.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { data_dir: dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Writes a single namespace to a JSON file atomically.
    ///
    /// This method writes to a temporary file first and then renames it to the
    /// final destination, so a crash mid-write never leaves a truncated file.
    pub fn save_namespace(&self, namespace: &str, data: &NamespaceData) -> Result<()> {
        validate_namespace(namespace)?;
        let file_path = self.data_dir.join(format!("{}.json", namespace));
        let temp_path = file_path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(data)?;

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &file_path)?;

        Ok(())
    }

    /// Loads every namespace found in the data directory.
    ///
    /// Unreadable or corrupt files are logged and skipped so that startup
    /// always succeeds with whatever could be recovered.
    pub fn load_all(&self) -> Result<HashMap<String, NamespaceData>> {
        let mut all_data = HashMap::new();

        if !self.data_dir.exists() {
            return Ok(all_data);
        }

        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                let Some(namespace) = path.file_stem().and_then(|s| s.to_str()) else {
                    warn!("Skipping file with invalid name {:?}", path);
                    continue;
                };

                let content = match fs::read(&path) {
                    Ok(c) => c,
                    Err(e) => {
                        warn!("Could not read namespace file {:?}: {}", path, e);
                        continue;
                    }
                };

                let data: NamespaceData = match serde_json::from_slice(&content) {
                    Ok(d) => d,
                    Err(e) => {
                        warn!("Could not parse namespace data from {:?}: {}", path, e);
                        continue;
                    }
                };

                all_data.insert(namespace.to_string(), data);
            }
        }

        Ok(all_data)
    }
}

/// Namespaces become file names, so only a conservative character set is allowed.
pub(crate) fn validate_namespace(namespace: &str) -> Result<()> {
    let valid = !namespace.is_empty()
        && namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::Internal(format!("invalid namespace {:?}", namespace)))
    }
}
