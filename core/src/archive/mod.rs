pub mod layout;

use crate::error::{CoreError, CoreResult};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

/// Read-only handle to a zip-format archive.
///
/// The underlying file is closed when the handle is dropped, so every early
/// return inside a validation stage releases it.
pub struct ArchiveHandle {
    path: PathBuf,
    zip: ZipArchive<File>,
    names: BTreeSet<String>,
}

impl ArchiveHandle {
    pub fn open(path: &Path) -> CoreResult<Self> {
        let file = File::open(path)?;
        let zip = ZipArchive::new(file).map_err(|e| CoreError::ArchiveCorrupt {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let names = zip.file_names().map(str::to_string).collect();
        Ok(Self {
            path: path.to_path_buf(),
            zip,
            names,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry names in lexicographic order.
    pub fn list_entries(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Literal, case-sensitive "starts with" match against every entry name.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.names.iter().any(|n| n.starts_with(prefix))
    }

    pub fn open_entry(&mut self, name: &str) -> CoreResult<impl Read + '_> {
        self.zip.by_name(name).map_err(|e| map_entry_error(name, e))
    }

    /// Uncompressed size of an entry in bytes.
    pub fn entry_size(&mut self, name: &str) -> CoreResult<u64> {
        let f = self
            .zip
            .by_name(name)
            .map_err(|e| map_entry_error(name, e))?;
        Ok(f.size())
    }

    pub fn read_entry_bytes(&mut self, name: &str) -> CoreResult<Vec<u8>> {
        let mut f = self.open_entry(name)?;
        let mut out = Vec::new();
        f.read_to_end(&mut out)?;
        Ok(out)
    }

    pub fn read_entry_json(&mut self, name: &str) -> CoreResult<serde_json::Value> {
        let bytes = self.read_entry_bytes(name)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn map_entry_error(name: &str, e: ZipError) -> CoreError {
    match e {
        ZipError::FileNotFound => CoreError::EntryNotFound(name.to_string()),
        other => CoreError::Zip(format!("{}: {}", name, other)),
    }
}
