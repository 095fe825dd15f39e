//! JSON file store

use crate::storage::traits::{Store, StoreError, StoreResult};
use crate::storage::Residence;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::{Path, PathBuf};

/// Serializes records as a JSON array indented with four spaces
///
/// Used both for the store file and for the one-shot stdout dump so the two
/// are byte-identical.
pub fn to_pretty_json(records: &[Residence]) -> StoreResult<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Store for JsonStore {
    fn path(&self) -> &Path {
        &self.path
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn save(&self, records: &[Residence]) -> StoreResult<()> {
        let json = to_pretty_json(records)?;

        // Write then rename so readers never see a half-written snapshot
        let temp = self.temp_path();
        std::fs::write(&temp, json.as_bytes())?;
        std::fs::rename(&temp, &self.path)?;

        tracing::debug!(
            "Wrote {} records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    fn load(&self) -> StoreResult<Vec<Residence>> {
        let raw = self.read_raw()?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn read_raw(&self) -> StoreResult<String> {
        if !self.exists() {
            return Err(StoreError::Missing(self.path.display().to_string()));
        }
        Ok(std::fs::read_to_string(&self.path)?)
    }
}
