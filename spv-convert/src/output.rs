//! Artifact writer
//!
//! The three output files are rendered in memory first, then written as a
//! set: each goes to a `.tmp` sibling, and only when all temp files are on
//! disk are they renamed into place. A file from an earlier run is moved to
//! a `.bak` sibling before its replacement lands. On any failure this run's
//! files are removed and the backups restored, so the folder holds either
//! the previous set or the new one, never a mix.

use crate::crypto::EncryptedPayload;
use crate::error::Result;
use crate::models::AnnotatedRecord;
use spv_common::config::OutputFolderInitializer;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Plain annotated records
pub const ANNOTATED_FILE: &str = "annotated.json";

/// Base64 ciphertext of the thread map
pub const THREADS_FILE: &str = "threads.encrypted";

/// Salt, IV and cipher settings
pub const ENCRYPTION_CONFIG_FILE: &str = "encryption_config.json";

/// File contents ready to be written
#[derive(Debug, Clone)]
pub struct RenderedArtifacts {
    pub annotated_json: String,
    pub threads_encrypted: String,
    pub encryption_config: String,
}

impl RenderedArtifacts {
    /// Pretty-print the records and parameter record; the blob is written as is
    pub fn render(records: &[AnnotatedRecord], payload: &EncryptedPayload) -> Result<Self> {
        Ok(Self {
            annotated_json: serde_json::to_string_pretty(records)?,
            threads_encrypted: payload.ciphertext.clone(),
            encryption_config: serde_json::to_string_pretty(&payload.params)?,
        })
    }

    fn files(&self) -> [(&'static str, &str); 3] {
        [
            (ANNOTATED_FILE, self.annotated_json.as_str()),
            (THREADS_FILE, self.threads_encrypted.as_str()),
            (ENCRYPTION_CONFIG_FILE, self.encryption_config.as_str()),
        ]
    }
}

/// One written file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactInfo {
    pub name: &'static str,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Writes artifact sets into one output folder
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    folder: OutputFolderInitializer,
}

impl ArtifactWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            folder: OutputFolderInitializer::new(output_dir),
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.folder.folder()
    }

    /// Write all three files or none of them
    pub fn write_all(&self, artifacts: &RenderedArtifacts) -> Result<Vec<ArtifactInfo>> {
        self.folder.ensure_directory_exists()?;

        let files = artifacts.files();
        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());

        for (name, contents) in files {
            let target = self.folder.file_path(name);
            let temp = temp_path(&target);
            if let Err(e) = std::fs::write(&temp, contents) {
                remove_quietly(&temp);
                discard(staged.iter().map(|(temp, _)| temp));
                return Err(e.into());
            }
            debug!(file = name, bytes = contents.len(), "Staged artifact");
            staged.push((temp, target));
        }

        let mut committed: Vec<Committed<'_>> = Vec::with_capacity(staged.len());
        for (index, (temp, target)) in staged.iter().enumerate() {
            match commit(temp, target) {
                Ok(backup) => committed.push(Committed { target, backup }),
                Err(e) => {
                    warn!("Replacing {} failed, rolling back: {}", target.display(), e);
                    rollback(&committed);
                    discard(staged[index..].iter().map(|(temp, _)| temp));
                    return Err(e.into());
                }
            }
        }
        discard(committed.iter().filter_map(|c| c.backup.as_deref()));

        files
            .iter()
            .zip(&staged)
            .map(|((name, _), (_, target))| -> Result<ArtifactInfo> {
                Ok(ArtifactInfo {
                    name: *name,
                    path: target.clone(),
                    bytes: std::fs::metadata(target)?.len(),
                })
            })
            .collect()
    }
}

/// A target renamed into place, with the previous file it displaced
struct Committed<'a> {
    target: &'a Path,
    backup: Option<PathBuf>,
}

/// Move any existing target aside, then rename the temp file over it.
/// Returns the backup path when there was a previous file.
fn commit(temp: &Path, target: &Path) -> std::io::Result<Option<PathBuf>> {
    let backup = if target.exists() {
        let backup = sibling_path(target, ".bak");
        std::fs::rename(target, &backup)?;
        Some(backup)
    } else {
        None
    };

    if let Err(e) = std::fs::rename(temp, target) {
        if let Some(backup) = &backup {
            restore(backup, target);
        }
        return Err(e);
    }
    Ok(backup)
}

/// Undo committed renames, newest first
fn rollback(committed: &[Committed<'_>]) {
    for entry in committed.iter().rev() {
        remove_quietly(entry.target);
        if let Some(backup) = &entry.backup {
            restore(backup, entry.target);
        }
    }
}

fn restore(backup: &Path, target: &Path) {
    if let Err(e) = std::fs::rename(backup, target) {
        warn!(
            "Could not restore {} from {}: {}",
            target.display(),
            backup.display(),
            e
        );
    }
}

fn temp_path(target: &Path) -> PathBuf {
    sibling_path(target, ".tmp")
}

fn sibling_path(target: &Path, suffix: &str) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    target.with_file_name(name)
}

fn discard<I, P>(paths: I)
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for path in paths {
        remove_quietly(path.as_ref());
    }
}

fn remove_quietly(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Could not remove {}: {}", path.display(), e);
        }
    }
}
