// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory-backed key-value store
//!
//! Each key is one file under the base directory. Keys are percent-encoded
//! into file names so any string is a legal key. Writes go to a temp file
//! and are renamed into place.

use crate::kv::{validate_key, KvError, KvStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "kv";

#[derive(Clone, Debug)]
pub struct FileKvStore {
    base_path: PathBuf,
    capacity: Option<u64>,
}

impl FileKvStore {
    /// Open a store at the given directory, creating it if needed
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, KvError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            capacity: None,
        })
    }

    /// Bound the total size of stored values to `bytes`
    pub fn with_capacity(mut self, bytes: u64) -> Self {
        self.capacity = Some(bytes);
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// List every stored key
    pub fn keys(&self) -> Result<Vec<String>, KvError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().map(|e| e == EXTENSION).unwrap_or(false) {
                if let Some(key) = path.file_stem().and_then(|s| s.to_str()).and_then(decode_key) {
                    keys.push(key);
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.{}", encode_key(key), EXTENSION))
    }

    fn used_bytes_excluding(&self, skip: &Path) -> Result<u64, KvError> {
        let mut used = 0;
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let path = entry.path();
            if path == skip || path.extension().map(|e| e != EXTENSION).unwrap_or(true) {
                continue;
            }
            used += entry.metadata()?.len();
        }
        Ok(used)
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        validate_key(key)?;
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        validate_key(key)?;
        let path = self.path_for(key);

        if let Some(capacity) = self.capacity {
            let used = self.used_bytes_excluding(&path)?;
            let needed = value.len() as u64;
            if used + needed > capacity {
                tracing::debug!(key, used, needed, capacity, "store capacity exceeded");
                return Err(KvError::QuotaExceeded {
                    key: key.to_string(),
                    needed: value.len(),
                    capacity: capacity.saturating_sub(used) as usize,
                });
            }
        }

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        validate_key(key)?;
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn decode_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = name.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
