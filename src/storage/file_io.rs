//! File I/O utilities with atomic writes
//!
//! Reads and writes serde documents as JSON or YAML, picked by file
//! extension. Writes go to a temp file first and are renamed into place.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::BalanceError;

/// Document formats understood by the loaders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
    Csv,
}

impl DataFormat {
    /// Pick a format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self, BalanceError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("csv") => Ok(Self::Csv),
            _ => Err(BalanceError::Storage(format!(
                "Unsupported file type: {} (expected .json, .yaml, .yml or .csv)",
                path.display()
            ))),
        }
    }
}

/// Read a JSON or YAML document, returning an error if the file doesn't exist
pub fn read_document<T, P>(path: P) -> Result<T, BalanceError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Err(BalanceError::Storage(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let format = DataFormat::from_path(path)?;
    let file = File::open(path)
        .map_err(|e| BalanceError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;
    let reader = BufReader::new(file);

    match format {
        DataFormat::Json => serde_json::from_reader(reader).map_err(|e| {
            BalanceError::Json(format!("Failed to parse {}: {}", path.display(), e))
        }),
        DataFormat::Yaml => serde_yaml::from_reader(reader).map_err(|e| {
            BalanceError::Yaml(format!("Failed to parse {}: {}", path.display(), e))
        }),
        DataFormat::Csv => Err(BalanceError::Storage(format!(
            "{} is CSV; this document must be JSON or YAML",
            path.display()
        ))),
    }
}

/// Read a JSON document, returning a default value if the file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, BalanceError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| BalanceError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| BalanceError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write a JSON or YAML document atomically (write to temp, then rename)
pub fn write_document_atomic<T, P>(path: P, data: &T) -> Result<(), BalanceError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let format = DataFormat::from_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                BalanceError::Storage(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    // Temp file in the same directory so the rename stays atomic
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = std::path::PathBuf::from(temp_name);

    let file = File::create(&temp_path)
        .map_err(|e| BalanceError::Storage(format!("Failed to create temp file: {}", e)))?;
    let mut writer = BufWriter::new(file);

    match format {
        DataFormat::Json => serde_json::to_writer_pretty(&mut writer, data)
            .map_err(|e| BalanceError::Storage(format!("Failed to serialize data: {}", e)))?,
        DataFormat::Yaml => serde_yaml::to_writer(&mut writer, data)
            .map_err(|e| BalanceError::Storage(format!("Failed to serialize data: {}", e)))?,
        DataFormat::Csv => {
            let _ = fs::remove_file(&temp_path);
            return Err(BalanceError::Storage(format!(
                "Cannot write {} as CSV",
                path.display()
            )));
        }
    }

    writer
        .flush()
        .map_err(|e| BalanceError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| BalanceError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        BalanceError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}
