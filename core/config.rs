//! Persistent key-value configuration, JSON-backed and split across two
//! scopes: a per-user global file for credentials shared by every project,
//! and a per-project file for everything else. Keys are `section.key`
//! strings; each section is a top-level object in the JSON document.

use crate::error::{AppError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Project-scoped config file name, created at the project root.
pub const PROJECT_CONFIG_FILE: &str = ".sandworm";

/// Keys stored in the global config file, shared by all projects.
const GLOBAL_KEYS: [&str; 1] = ["claude.session_key"];

type Sections = HashMap<String, HashMap<String, String>>;

#[derive(Debug)]
pub struct ConfigStore {
    global_path: PathBuf,
    project_path: PathBuf,
    global: Sections,
    project: Sections,
}

impl ConfigStore {
    /// Opens the store for `project_dir`. The global file lives under the
    /// platform configuration directory (`sandworm/config.json`); the
    /// project file is `.sandworm` in the project directory. Missing files
    /// simply mean empty scopes.
    pub fn new(project_dir: &Path) -> Result<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            AppError::Config("Could not determine the platform configuration directory".into())
        })?;
        Self::with_paths(
            config_dir.join("sandworm").join("config.json"),
            project_dir.join(PROJECT_CONFIG_FILE),
        )
    }

    /// Opens the store against explicit file paths.
    pub fn with_paths(global_path: PathBuf, project_path: PathBuf) -> Result<Self> {
        let global = load(&global_path)?;
        let project = load(&project_path)?;
        log::trace!(
            "Config store loaded (global: {}, project: {})",
            global_path.display(),
            project_path.display()
        );
        Ok(ConfigStore {
            global_path,
            project_path,
            global,
            project,
        })
    }

    pub fn is_global_key(key: &str) -> bool {
        GLOBAL_KEYS.contains(&key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let (section, sub_key) = split_key(key);
        let scope = if Self::is_global_key(key) {
            &self.global
        } else {
            &self.project
        };
        scope.get(section)?.get(sub_key).map(String::as_str)
    }

    /// Stores a value and persists the owning scope immediately.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let (section, sub_key) = split_key(key);
        if Self::is_global_key(key) {
            self.global
                .entry(section.to_string())
                .or_default()
                .insert(sub_key.to_string(), value.to_string());
            save(&self.global_path, &self.global)
        } else {
            self.project
                .entry(section.to_string())
                .or_default()
                .insert(sub_key.to_string(), value.to_string());
            save(&self.project_path, &self.project)
        }
    }

    /// Removes a value (a no-op when absent) and persists the owning scope.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        let (section, sub_key) = split_key(key);
        if Self::is_global_key(key) {
            if let Some(section_data) = self.global.get_mut(section) {
                section_data.remove(sub_key);
            }
            save(&self.global_path, &self.global)
        } else {
            if let Some(section_data) = self.project.get_mut(section) {
                section_data.remove(sub_key);
            }
            save(&self.project_path, &self.project)
        }
    }

    /// All keys currently present in either scope, as `section.key` strings.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .global
            .iter()
            .chain(self.project.iter())
            .flat_map(|(section, data)| {
                data.keys().map(move |sub_key| format!("{section}.{sub_key}"))
            })
            .collect();
        keys.sort();
        keys
    }
}

fn split_key(key: &str) -> (&str, &str) {
    match key.split_once('.') {
        Some((section, sub_key)) => (section, sub_key),
        None => ("", key),
    }
}

fn load(path: &Path) -> Result<Sections> {
    match fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Sections::new()),
        Err(source) => Err(AppError::FileRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn save(path: &Path, data: &Sections) -> Result<()> {
    let content = serde_json::to_string_pretty(data)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).map_err(|source| AppError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}
