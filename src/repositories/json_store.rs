//! JSON file store with atomic replace.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::{AppError, AppResult};
use crate::repositories::KeyValueStore;

/// A mapping persisted as one pretty-printed JSON object.
///
/// Saving writes a sibling temp file, fsyncs it and renames it over the target,
/// so a crash mid-save leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore<V> {
    path: PathBuf,
    _value: PhantomData<fn() -> V>,
}

impl<V> JsonFileStore<V> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _value: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Rewrites JSON floats as strings holding their shortest decimal text.
///
/// Files written by other tools may hold prices as bare numbers; reading those
/// through `f64` would turn `62.49` into a long binary expansion that no longer
/// equals the fetched price.
fn floats_as_text(value: &mut Value) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(floats_as_text),
        Value::Object(fields) => fields.values_mut().for_each(floats_as_text),
        Value::Number(number) if number.is_f64() => {
            let text = number.to_string();
            *value = Value::String(text);
        }
        _ => {}
    }
}

impl<V> KeyValueStore<V> for JsonFileStore<V>
where
    V: Serialize + DeserializeOwned,
{
    fn load(&self) -> AppResult<BTreeMap<String, V>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Store does not exist yet, starting empty");
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(AppError::persistence(&self.path, "read", e)),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let parse = |e: serde_json::Error| AppError::persistence(&self.path, "parse", e);
        let mut document: Value = serde_json::from_str(&content).map_err(parse)?;
        floats_as_text(&mut document);
        serde_json::from_value(document).map_err(parse)
    }

    fn save(&self, entries: &BTreeMap<String, V>) -> AppResult<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir).map_err(|e| AppError::persistence(&self.path, "write", e))?;

        let mut tmp =
            NamedTempFile::new_in(&dir).map_err(|e| AppError::persistence(&self.path, "write", e))?;

        serde_json::to_writer_pretty(&mut tmp, entries)
            .map_err(|e| AppError::persistence(&self.path, "serialize", e))?;
        tmp.write_all(b"\n")
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| AppError::persistence(&self.path, "write", e))?;

        tmp.persist(&self.path)
            .map_err(|e| AppError::persistence(&self.path, "replace", e.error))?;

        tracing::debug!(path = %self.path.display(), entries = entries.len(), "Store saved");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
