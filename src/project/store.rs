//! On-disk project store.
//!
//! One JSON file per project under a configurable directory, written
//! atomically (temp file + rename) under an advisory lock, with optional gzip
//! compression for large payloads. Projects embed their base image, so files
//! get big quickly.

use super::snapshot::{ProjectSnapshot, SavedProject};
use crate::model::PhotoPayload;
use anyhow::{Context, Result, bail};
use chrono::Utc;
use flate2::{Compression, bufread::GzDecoder, write::GzEncoder};
use fs2::FileExt;
use log::{debug, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// When to gzip project files on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionMode {
    Off,
    On,
    #[default]
    Auto,
}

/// Store location and tuning.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Directory holding the project files.
    pub base_dir: PathBuf,
    /// Compression policy for saved files.
    pub compression: CompressionMode,
    /// Auto mode compresses payloads at or above this size.
    pub auto_compress_threshold_bytes: u64,
    /// Refuse to load files larger than this.
    pub max_file_size_bytes: u64,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            base_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("planscriber")
                .join("projects"),
            compression: CompressionMode::Auto,
            auto_compress_threshold_bytes: 256 * 1024,
            max_file_size_bytes: 64 * 1024 * 1024,
        }
    }
}

impl StoreOptions {
    fn project_path(&self, id: Uuid) -> PathBuf {
        self.base_dir.join(format!("{id}.json"))
    }

    fn lock_path(&self) -> PathBuf {
        self.base_dir.join("store.lock")
    }
}

/// Summary row for the project listing.
#[derive(Debug, Clone)]
pub struct ProjectMeta {
    pub id: Uuid,
    pub plan_name: String,
    pub floor: String,
    pub image_name: String,
    pub last_modified: i64,
    pub size_bytes: u64,
    pub compressed: bool,
}

/// Saves a project, returning its id.
///
/// Passing an existing id overwrites that project; `None` allocates a fresh
/// id.
pub fn save_project(
    options: &StoreOptions,
    snapshot: ProjectSnapshot,
    image_data: PhotoPayload,
    id: Option<Uuid>,
) -> Result<Uuid> {
    fs::create_dir_all(&options.base_dir).with_context(|| {
        format!(
            "failed to create project directory {}",
            options.base_dir.display()
        )
    })?;

    let lock_file = open_lock(options)?;
    lock_file
        .lock_exclusive()
        .with_context(|| format!("failed to lock project store {}", options.lock_path().display()))?;

    let result = save_project_inner(options, snapshot, image_data, id);

    lock_file.unlock().unwrap_or_else(|err| {
        warn!("failed to unlock project store: {err}");
    });

    result
}

fn save_project_inner(
    options: &StoreOptions,
    snapshot: ProjectSnapshot,
    image_data: PhotoPayload,
    id: Option<Uuid>,
) -> Result<Uuid> {
    let id = id.unwrap_or_else(Uuid::new_v4);
    let saved = SavedProject {
        id,
        last_modified: Utc::now().timestamp_millis(),
        snapshot,
        image_data,
    };

    let mut payload =
        serde_json::to_vec(&saved).context("failed to serialise project payload")?;

    let should_compress = match options.compression {
        CompressionMode::Off => false,
        CompressionMode::On => true,
        CompressionMode::Auto => payload.len() as u64 >= options.auto_compress_threshold_bytes,
    };
    if should_compress {
        payload = compress_bytes(&payload)?;
    }

    let target = options.project_path(id);
    let tmp = temp_path(&target);
    {
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp)
            .with_context(|| format!("failed to open temporary file {}", tmp.display()))?;
        tmp_file
            .write_all(&payload)
            .context("failed to write project payload")?;
        tmp_file
            .sync_all()
            .context("failed to sync temporary project file")?;
    }
    fs::rename(&tmp, &target).with_context(|| {
        format!(
            "failed to move project file {} -> {}",
            tmp.display(),
            target.display()
        )
    })?;

    info!(
        "Project {} saved to {} ({} bytes, compression={})",
        id,
        target.display(),
        payload.len(),
        should_compress
    );
    Ok(id)
}

/// Loads a project by id.
pub fn load_project(options: &StoreOptions, id: Uuid) -> Result<SavedProject> {
    let path = options.project_path(id);
    if !path.exists() {
        bail!("project {id} not found in {}", options.base_dir.display());
    }

    let lock_file = open_lock(options)?;
    lock_file
        .lock_shared()
        .with_context(|| format!("failed to lock project store {}", options.lock_path().display()))?;

    let result = read_project_file(&path, options).map(|(saved, _)| saved);

    lock_file.unlock().unwrap_or_else(|err| {
        warn!("failed to unlock project store: {err}");
    });

    result
}

/// Lists all stored projects, newest first.
pub fn list_projects(options: &StoreOptions) -> Result<Vec<ProjectMeta>> {
    if !options.base_dir.exists() {
        debug!(
            "Project directory {} does not exist yet",
            options.base_dir.display()
        );
        return Ok(Vec::new());
    }

    let lock_file = open_lock(options)?;
    lock_file
        .lock_shared()
        .with_context(|| format!("failed to lock project store {}", options.lock_path().display()))?;

    let result = list_projects_inner(options);

    lock_file.unlock().unwrap_or_else(|err| {
        warn!("failed to unlock project store: {err}");
    });

    result
}

fn list_projects_inner(options: &StoreOptions) -> Result<Vec<ProjectMeta>> {
    let mut projects = Vec::new();

    for entry in fs::read_dir(&options.base_dir)
        .with_context(|| format!("failed to read {}", options.base_dir.display()))?
    {
        let path = entry?.path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        match read_project_file(&path, options) {
            Ok((saved, compressed)) => {
                let size_bytes = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                projects.push(ProjectMeta {
                    id: saved.id,
                    plan_name: saved.snapshot.plan_name,
                    floor: saved.snapshot.floor,
                    image_name: saved.snapshot.image_name,
                    last_modified: saved.last_modified,
                    size_bytes,
                    compressed,
                });
            }
            Err(err) => {
                warn!("Skipping unreadable project file {}: {err}", path.display());
            }
        }
    }

    projects.sort_by_key(|meta| std::cmp::Reverse(meta.last_modified));
    Ok(projects)
}

/// Deletes a stored project.
pub fn delete_project(options: &StoreOptions, id: Uuid) -> Result<bool> {
    let path = options.project_path(id);
    if !path.exists() {
        return Ok(false);
    }

    let lock_file = open_lock(options)?;
    lock_file
        .lock_exclusive()
        .with_context(|| format!("failed to lock project store {}", options.lock_path().display()))?;

    let result =
        fs::remove_file(&path).with_context(|| format!("failed to remove {}", path.display()));

    lock_file.unlock().unwrap_or_else(|err| {
        warn!("failed to unlock project store: {err}");
    });

    result?;
    info!("Project {id} deleted");
    Ok(true)
}

fn read_project_file(path: &Path, options: &StoreOptions) -> Result<(SavedProject, bool)> {
    let metadata =
        fs::metadata(path).with_context(|| format!("failed to stat {}", path.display()))?;
    if metadata.len() > options.max_file_size_bytes {
        bail!(
            "project file {} is {} bytes which exceeds the configured limit ({} bytes)",
            path.display(),
            metadata.len(),
            options.max_file_size_bytes
        );
    }

    let mut bytes = Vec::new();
    File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .read_to_end(&mut bytes)
        .context("failed to read project file")?;

    let compressed = is_gzip(&bytes);
    let decompressed = if compressed {
        let mut decoder = GzDecoder::new(&bytes[..]);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .context("failed to decompress project file")?;
        out
    } else {
        bytes
    };

    let saved: SavedProject =
        serde_json::from_slice(&decompressed).context("failed to parse project json")?;
    Ok((saved, compressed))
}

fn open_lock(options: &StoreOptions) -> Result<File> {
    fs::create_dir_all(&options.base_dir).with_context(|| {
        format!(
            "failed to create project directory {}",
            options.base_dir.display()
        )
    })?;
    let lock_path = options.lock_path();
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .with_context(|| format!("failed to open store lock file {}", lock_path.display()))
}

fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .context("failed to compress project payload")?;
    encoder
        .finish()
        .context("failed to finalise compressed project payload")
}

fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

fn temp_path(target: &Path) -> PathBuf {
    let mut candidate = target.with_extension("json.tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = target.with_extension(format!("json.tmp{counter}"));
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;

    fn test_options(dir: &Path, compression: CompressionMode) -> StoreOptions {
        StoreOptions {
            base_dir: dir.to_path_buf(),
            compression,
            auto_compress_threshold_bytes: 1024,
            max_file_size_bytes: 10 * 1024 * 1024,
        }
    }

    fn sample_snapshot(name: &str) -> ProjectSnapshot {
        let mut doc = Document::with_image_size(100, 100);
        doc.plan_name = name.to_string();
        doc.add_point_at(10.0, 10.0);
        ProjectSnapshot::from_document(&doc, "plan.png")
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let options = test_options(dir.path(), CompressionMode::Off);

        let id = save_project(
            &options,
            sample_snapshot("Magazzino"),
            PhotoPayload::new(vec![1, 2, 3]),
            None,
        )
        .unwrap();

        let loaded = load_project(&options, id).unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.snapshot.plan_name, "Magazzino");
        assert_eq!(loaded.snapshot.points.len(), 1);
        assert_eq!(loaded.image_data.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn save_with_existing_id_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let options = test_options(dir.path(), CompressionMode::Off);

        let id = save_project(
            &options,
            sample_snapshot("Prima"),
            PhotoPayload::new(vec![0]),
            None,
        )
        .unwrap();
        let again = save_project(
            &options,
            sample_snapshot("Dopo"),
            PhotoPayload::new(vec![0]),
            Some(id),
        )
        .unwrap();

        assert_eq!(id, again);
        assert_eq!(list_projects(&options).unwrap().len(), 1);
        assert_eq!(load_project(&options, id).unwrap().snapshot.plan_name, "Dopo");
    }

    #[test]
    fn list_sorts_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let options = test_options(dir.path(), CompressionMode::Off);

        let first = save_project(
            &options,
            sample_snapshot("Vecchio"),
            PhotoPayload::new(vec![0]),
            None,
        )
        .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = save_project(
            &options,
            sample_snapshot("Nuovo"),
            PhotoPayload::new(vec![0]),
            None,
        )
        .unwrap();

        let listed = list_projects(&options).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second);
        assert_eq!(listed[1].id, first);
    }

    #[test]
    fn compressed_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let options = test_options(dir.path(), CompressionMode::On);

        let id = save_project(
            &options,
            sample_snapshot("Compresso"),
            PhotoPayload::new(vec![7; 4096]),
            None,
        )
        .unwrap();

        let raw = fs::read(options.project_path(id)).unwrap();
        assert!(is_gzip(&raw));

        let loaded = load_project(&options, id).unwrap();
        assert_eq!(loaded.image_data.len(), 4096);
        assert!(list_projects(&options).unwrap()[0].compressed);
    }

    #[test]
    fn delete_removes_only_that_project() {
        let dir = tempfile::tempdir().unwrap();
        let options = test_options(dir.path(), CompressionMode::Off);

        let keep = save_project(
            &options,
            sample_snapshot("Tengo"),
            PhotoPayload::new(vec![0]),
            None,
        )
        .unwrap();
        let drop = save_project(
            &options,
            sample_snapshot("Via"),
            PhotoPayload::new(vec![0]),
            None,
        )
        .unwrap();

        assert!(delete_project(&options, drop).unwrap());
        assert!(!delete_project(&options, drop).unwrap());

        let listed = list_projects(&options).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, keep);
    }

    #[test]
    fn load_missing_project_fails() {
        let dir = tempfile::tempdir().unwrap();
        let options = test_options(dir.path(), CompressionMode::Off);
        assert!(load_project(&options, Uuid::new_v4()).is_err());
    }
}
