//! Cleanup configuration engine.
//!
//! Reads, validates and rewrites the retention settings in a snapper
//! config file (`/etc/snapper/configs/<name>`):
//! - Parsing keeps every line, so untouched lines survive byte-for-byte
//! - Edits go through the schema before anything is written
//! - The file is replaced atomically and keeps its permissions
//!
//! Assumes a single writer: concurrent edits by other tools are not
//! detected.

pub mod parser;
pub mod schema;
pub mod validate;
pub mod writer;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
pub use parser::{parse, ConfigFile, ConfigWarning, ParsedConfig};
pub use schema::{SettingSpec, ValueType, SCHEMA};
pub use validate::{validate, Accepted, SettingValue, Violation};

pub fn config_path(configs_dir: &Path, name: &str) -> PathBuf {
    configs_dir.join(name)
}

pub fn read(path: &Path) -> Result<ParsedConfig> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path.display().to_string(), e))?;
    Ok(parse(&text))
}

/// Replace `path` with the rendered file via a temp file in the same
/// directory, copying the current permissions over first.
pub fn write(path: &Path, file: &ConfigFile) -> Result<()> {
    let what = path.display().to_string();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(what.clone(), e))?;
    tmp.write_all(file.render().as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| Error::io(what.clone(), e))?;

    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| Error::io(what.clone(), e))?;
    }

    tmp.persist(path).map_err(|e| Error::io(what, e.error))?;
    tracing::info!(path = %path.display(), "config written");
    Ok(())
}

/// One schema key as the renderer sees it.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSetting {
    pub key: &'static str,
    pub value_type: ValueType,
    pub description: &'static str,
    pub default: &'static str,
    /// None when the key is not set in the file
    pub value: Option<String>,
}

pub fn settings(parsed: &ParsedConfig) -> Vec<ConfigSetting> {
    SCHEMA
        .iter()
        .map(|spec| ConfigSetting {
            key: spec.key,
            value_type: spec.value_type,
            description: spec.description,
            default: spec.default,
            value: parsed.values.get(spec.key).cloned(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckFailure {
    pub key: String,
    pub value: String,
    pub violation: Violation,
}

/// Validate every schema value currently in the file.
pub fn check(parsed: &ParsedConfig) -> Vec<CheckFailure> {
    let mut failures = Vec::new();
    for (key, value) in &parsed.values {
        if let Err(Error::ValidationFailed { violation, .. }) = validate(key, value) {
            failures.push(CheckFailure {
                key: key.clone(),
                value: value.clone(),
                violation,
            });
        }
    }
    failures
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// the key must already have exactly one assignment
    Replace,
    /// the key must not be set yet
    Append,
}

#[derive(Debug, Clone, Serialize)]
pub struct Edit {
    pub key: &'static str,
    pub old: Option<String>,
    pub new: SettingValue,
}

/// Validate and apply one change in memory.
pub fn apply(parsed: &ParsedConfig, key: &str, raw: &str, mode: EditMode) -> Result<(ConfigFile, Edit)> {
    let accepted = validate(key, raw)?;
    let file = match mode {
        EditMode::Replace => writer::set(&parsed.file, &accepted)?,
        EditMode::Append => writer::append(&parsed.file, &accepted)?,
    };

    let edit = Edit {
        key: accepted.key(),
        old: parsed.file.get(key).map(str::to_string),
        new: accepted.value,
    };
    Ok((file, edit))
}

/// Read-modify-write for a single key. On any error the file on disk is
/// left as it was.
pub fn edit(path: &Path, key: &str, raw: &str, mode: EditMode) -> Result<Edit> {
    let parsed = read(path)?;
    let (file, edit) = apply(&parsed, key, raw, mode)?;
    write(path, &file)?;
    Ok(edit)
}
