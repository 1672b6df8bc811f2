use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::model::{DeletedItem, VaultExport};

/// Loads a vault export from a JSON file
pub fn load_vault(path: &Path) -> Result<VaultExport> {
    debug!("Loading vault export from {}", path.display());
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read vault export {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse vault export {}", path.display()))
}

/// Writes a vault export as pretty-printed JSON
pub fn write_vault(path: &Path, export: &VaultExport) -> Result<()> {
    let raw = serde_json::to_string_pretty(export).context("Failed to serialize vault export")?;
    fs::write(path, raw)
        .with_context(|| format!("Failed to write vault export {}", path.display()))
}

/// Writes the deleted-items sequence as pretty-printed JSON
pub fn write_deleted(path: &Path, deleted: &[DeletedItem]) -> Result<()> {
    let raw = serde_json::to_string_pretty(deleted).context("Failed to serialize deleted items")?;
    fs::write(path, raw)
        .with_context(|| format!("Failed to write deleted items {}", path.display()))
}

/// Loads a previously written deleted-items file
pub fn load_deleted(path: &Path) -> Result<Vec<DeletedItem>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read deleted items {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse deleted items {}", path.display()))
}

/// Per-item persistence hook.
///
/// The engine calls this after every item so an interrupted run still
/// leaves a usable output pair on disk. Implementations must not
/// influence pipeline decisions; their errors abort the run.
pub trait Checkpoint {
    fn save(&self, export: &VaultExport, deleted: &[DeletedItem]) -> Result<()>;
}

/// Writes the running snapshot pair to the final output paths.
#[derive(Debug, Clone)]
pub struct JsonCheckpoint {
    output: PathBuf,
    deleted: PathBuf,
}

impl JsonCheckpoint {
    /// Creates a checkpoint targeting the given output pair
    pub fn new(output: impl Into<PathBuf>, deleted: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            deleted: deleted.into(),
        }
    }
}

impl Checkpoint for JsonCheckpoint {
    fn save(&self, export: &VaultExport, deleted: &[DeletedItem]) -> Result<()> {
        write_vault(&self.output, export)?;
        write_deleted(&self.deleted, deleted)
    }
}

/// Derives the default `<stem>_output.json` path from an input path
pub fn derive_output_path(input: &Path) -> PathBuf {
    with_suffix(input, "_output.json")
}

/// Derives the default `<stem>_deleted.json` path from an input path
pub fn derive_deleted_path(input: &Path) -> PathBuf {
    with_suffix(input, "_deleted.json")
}

/// Derives the default `<stem>_readable.txt` report path from a
/// deleted-items path
pub fn derive_report_path(deleted: &Path) -> PathBuf {
    with_suffix(deleted, "_readable.txt")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("vault.json");
    let stem = name.strip_suffix(".json").unwrap_or(name);
    path.with_file_name(format!("{}{}", stem, suffix))
}
