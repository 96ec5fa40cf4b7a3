// ABOUTME: File-backed property store in dotenv format.
// ABOUTME: Lives at .springship/<environment>/.env and is saved via temp file + rename.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{PropertyStore, StoreError, service_property_key};
use crate::types::ServiceName;

/// Directory holding all environments of a project.
const STATE_DIR: &str = ".springship";
const ENV_FILENAME: &str = ".env";

/// Path of the environment file for `env_name` under a project root.
pub fn environment_file(project_dir: &Path, env_name: &str) -> Result<PathBuf, StoreError> {
    let valid = !env_name.is_empty()
        && env_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(StoreError::InvalidName(env_name.to_string()));
    }

    Ok(project_dir.join(STATE_DIR).join(env_name).join(ENV_FILENAME))
}

/// A dotenv file loaded into memory.
///
/// Saves are serialized, so concurrent deployments sharing one store never
/// race on the temp file and the last save on disk holds every value set
/// before it started.
#[derive(Debug)]
pub struct DotEnvStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
    save_lock: tokio::sync::Mutex<()>,
}

impl DotEnvStore {
    /// Load the file at `path`. A missing file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => parse(&path, &content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        tracing::debug!("Loaded {} value(s) from {}", values.len(), path.display());
        Ok(Self {
            path,
            values: Mutex::new(values),
            save_lock: tokio::sync::Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .insert(key.to_string(), value.to_string());
    }

    /// Snapshot of all values.
    pub fn values(&self) -> BTreeMap<String, String> {
        self.values.lock().clone()
    }

    fn render(&self) -> String {
        let values = self.values.lock();
        let mut out = String::new();
        for (key, value) in values.iter() {
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push_str("\"\n");
        }
        out
    }
}

#[async_trait]
impl PropertyStore for DotEnvStore {
    fn get_service_property(&self, service: &ServiceName, key: &str) -> Option<String> {
        self.get(&service_property_key(service, key))
    }

    fn set_service_property(&self, service: &ServiceName, key: &str, value: &str) {
        self.set(&service_property_key(service, key), value);
    }

    async fn save(&self) -> Result<(), StoreError> {
        let _guard = self.save_lock.lock().await;
        let content = self.render();
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, content).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(write_err)?;

        tracing::debug!("Saved environment to {}", self.path.display());
        Ok(())
    }
}

fn parse(path: &Path, content: &str) -> Result<BTreeMap<String, String>, StoreError> {
    let mut values = BTreeMap::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let malformed = || StoreError::Malformed {
            path: path.to_path_buf(),
            line: idx + 1,
        };

        let (key, value) = line.split_once('=').ok_or_else(malformed)?;
        let key = key.trim();
        if key.is_empty() {
            return Err(malformed());
        }

        let value = value.trim();
        let value = match value.strip_prefix('"') {
            Some(quoted) => unescape(quoted.strip_suffix('"').ok_or_else(malformed)?),
            None => value.to_string(),
        };

        values.insert(key.to_string(), value);
    }

    Ok(values)
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
