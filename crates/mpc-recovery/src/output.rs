//! Output artifacts: a YAML list of recovered keys, or a JSON report
//! envelope `{success, errMsg, data}`.
//!
//! Files are written atomically; a failed run leaves nothing behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use mpc_recovery_ckd::DeriveResult;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::error::{Lang, RecoveryError};

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Serialize(String),

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryReport {
    pub success: bool,
    #[serde(rename = "errMsg")]
    pub err_msg: String,
    pub data: Vec<DeriveResult>,
}

impl RecoveryReport {
    pub fn success(data: Vec<DeriveResult>) -> Self {
        Self {
            success: true,
            err_msg: String::new(),
            data,
        }
    }

    pub fn failure(err: &RecoveryError, lang: Lang) -> Self {
        Self {
            success: false,
            err_msg: err.user_message(lang),
            data: Vec::new(),
        }
    }
}

pub fn render_yaml(results: &[DeriveResult]) -> Result<Zeroizing<String>, OutputError> {
    serde_yaml::to_string(results)
        .map(Zeroizing::new)
        .map_err(|e| OutputError::Serialize(e.to_string()))
}

pub fn render_report_json(report: &RecoveryReport) -> Result<Zeroizing<String>, OutputError> {
    serde_json::to_string_pretty(report)
        .map(Zeroizing::new)
        .map_err(|e| OutputError::Serialize(e.to_string()))
}

/// Render `results` in `format`.
pub fn render(results: Vec<DeriveResult>, format: OutputFormat) -> Result<Zeroizing<String>, OutputError> {
    match format {
        OutputFormat::Yaml => render_yaml(&results),
        OutputFormat::Json => render_report_json(&RecoveryReport::success(results)),
    }
}

/// Write `contents` to a temp file beside `path`, then rename it into place.
/// On Unix the file is readable by the owner only.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), OutputError> {
    let write_err = |source: io::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(write_err)?;
    }

    tmp.write_all(contents).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    log::debug!("wrote {}", path.display());
    Ok(())
}
