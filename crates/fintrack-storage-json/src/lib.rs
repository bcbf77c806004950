use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use fintrack_core::{CoreError, SnapshotStorage};
use fintrack_domain::FinanceSnapshot;
use serde_json::Value;
use tracing::{debug, info, warn};

const JSON_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";
const BACKUP_TIMESTAMP_LEN: usize = 17;
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Locations used by [`JsonSnapshotStorage`].
#[derive(Debug, Clone)]
pub struct StoragePaths {
    /// The umbrella snapshot file, e.g. `<data_dir>/finances.json`.
    pub data_file: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    /// `<dir>/<file_name>` with backups under `<dir>/backups`.
    pub fn in_dir(dir: impl AsRef<Path>, file_name: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            data_file: dir.join(file_name),
            backup_root: dir.join("backups"),
        }
    }
}

/// A backup file on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupInfo {
    /// File name, used to address the backup.
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// Filesystem-backed JSON persistence for the finance snapshot and its backups.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStorage {
    data_file: PathBuf,
    backup_root: PathBuf,
    retention: usize,
}

impl JsonSnapshotStorage {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        if let Some(parent) = paths.data_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            data_file: paths.data_file,
            backup_root: paths.backup_root,
            retention: retention.max(1),
        })
    }

    pub fn data_path(&self) -> &Path {
        &self.data_file
    }

    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Copies the current data file into the backup directory and prunes old backups.
    pub fn backup(&self, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        if !self.data_file.exists() {
            return Err(CoreError::Storage(format!(
                "nothing to back up at `{}`",
                self.data_file.display()
            )));
        }
        let data = fs::read_to_string(&self.data_file)?;
        self.write_backup(&data, note)
    }

    /// Writes `snapshot` straight into a new backup, independent of the data file.
    pub fn backup_snapshot(
        &self,
        snapshot: &FinanceSnapshot,
        note: Option<&str>,
    ) -> Result<BackupInfo, CoreError> {
        self.write_backup(&serialize_snapshot(snapshot)?, note)
    }

    /// Backups ordered newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        if !self.backup_root.exists() {
            return Ok(Vec::new());
        }
        let prefix = self.backup_prefix();
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backup_root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(JSON_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(parts) = parse_backup_name(&prefix, file_name) else {
                continue;
            };
            let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
            entries.push(BackupInfo {
                id: file_name.to_string(),
                created_at: parts.created_at,
                note: parts.note,
                size_bytes,
                path,
            });
        }
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(entries)
    }

    /// Replaces the data file with the backup named `id`. The backup must hold valid JSON.
    pub fn restore_backup(&self, id: &str) -> Result<BackupInfo, CoreError> {
        let info = self.find_backup(id)?;
        let data = fs::read_to_string(&info.path)?;
        serde_json::from_str::<Value>(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
        replace_atomic(&self.data_file, &data)?;
        info!(backup = %info.id, "finance data restored from backup");
        Ok(info)
    }

    /// Removes the backup named `id`. Only names returned by [`Self::list_backups`] are accepted.
    pub fn delete_backup(&self, id: &str) -> Result<BackupInfo, CoreError> {
        let info = self.find_backup(id)?;
        fs::remove_file(&info.path)?;
        info!(backup = %info.id, "backup deleted");
        Ok(info)
    }

    fn find_backup(&self, id: &str) -> Result<BackupInfo, CoreError> {
        self.list_backups()?
            .into_iter()
            .find(|info| info.id == id)
            .ok_or_else(|| CoreError::Storage(format!("backup `{id}` not found")))
    }

    fn write_backup(&self, data: &str, note: Option<&str>) -> Result<BackupInfo, CoreError> {
        fs::create_dir_all(&self.backup_root)?;
        let now = Utc::now();
        let timestamp = now.format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let base = format!("{}_{}", self.backup_prefix(), timestamp);
        let note = sanitize_backup_note(note);

        let mut seq = 0u32;
        while self.sequence_taken(&base, seq)? {
            seq += 1;
        }
        let mut stem = format!("{base}_{seq:03}");
        if let Some(label) = &note {
            stem.push('_');
            stem.push_str(label);
        }
        let file_name = format!("{stem}.{JSON_EXTENSION}");
        let path = self.backup_root.join(&file_name);
        replace_atomic(&path, data)?;
        debug!(backup = %file_name, "backup written");
        self.prune_backups()?;

        Ok(BackupInfo {
            id: file_name,
            created_at: parse_timestamp(&timestamp),
            note,
            size_bytes: data.len() as u64,
            path,
        })
    }

    fn sequence_taken(&self, base: &str, seq: u32) -> Result<bool, CoreError> {
        let marker = format!("{base}_{seq:03}");
        for entry in fs::read_dir(&self.backup_root)? {
            let name = entry?.file_name();
            let name = name.to_string_lossy();
            if name == format!("{marker}.{JSON_EXTENSION}") || name.starts_with(&format!("{marker}_"))
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            debug!(backup = %entry.id, "pruning old backup");
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(backup = %entry.id, error = %err, "failed to prune old backup");
            }
        }
        Ok(())
    }

    fn backup_prefix(&self) -> String {
        self.data_file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(canonical_name)
            .unwrap_or_else(|| "finances".into())
    }
}

impl SnapshotStorage for JsonSnapshotStorage {
    fn load(&self) -> Result<Option<Value>, CoreError> {
        if !self.data_file.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.data_file)?;
        let value = serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
        Ok(Some(value))
    }

    fn save(&self, snapshot: &FinanceSnapshot) -> Result<(), CoreError> {
        replace_atomic(&self.data_file, &serialize_snapshot(snapshot)?)
    }

    fn clear(&self) -> Result<(), CoreError> {
        if self.data_file.exists() {
            fs::remove_file(&self.data_file)?;
        }
        Ok(())
    }
}

/// Saves a snapshot to an arbitrary path on disk.
pub fn save_snapshot_to_path(snapshot: &FinanceSnapshot, path: &Path) -> Result<(), CoreError> {
    replace_atomic(path, &serialize_snapshot(snapshot)?)
}

/// Loads a snapshot from `path`, falling back per key like the store does.
pub fn load_snapshot_from_path(path: &Path) -> Result<(FinanceSnapshot, Vec<String>), CoreError> {
    let data = fs::read_to_string(path)?;
    let value = serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
    Ok(FinanceSnapshot::from_value_lenient(value))
}

struct BackupNameParts {
    created_at: Option<DateTime<Utc>>,
    note: Option<String>,
}

/// Splits `<prefix>_<timestamp>_<seq>[_<note>].json`.
fn parse_backup_name(prefix: &str, file_name: &str) -> Option<BackupNameParts> {
    let stem = file_name.strip_suffix(&format!(".{JSON_EXTENSION}"))?;
    let rest = stem.strip_prefix(prefix)?.strip_prefix('_')?;
    let mut segments = rest.splitn(3, '_');
    let timestamp = segments.next()?;
    let seq = segments.next()?;
    if !is_digits(timestamp, BACKUP_TIMESTAMP_LEN) || !is_digits(seq, 3) {
        return None;
    }
    Some(BackupNameParts {
        created_at: parse_timestamp(timestamp),
        note: segments.next().map(str::to_string),
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if !is_digits(raw, BACKUP_TIMESTAMP_LEN) {
        return None;
    }
    let (seconds, millis) = raw.split_at(BACKUP_TIMESTAMP_LEN - 3);
    let naive = NaiveDateTime::parse_from_str(seconds, "%Y%m%d%H%M%S").ok()?;
    let millis: i64 = millis.parse().ok()?;
    Some(DateTime::from_naive_utc_and_offset(
        naive + Duration::milliseconds(millis),
        Utc,
    ))
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '-',
        })
        .collect();
    if sanitized.trim_matches('-').is_empty() {
        "finances".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes to a sibling temp file and renames it over `path`.
fn replace_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn serialize_snapshot(snapshot: &FinanceSnapshot) -> Result<String, CoreError> {
    serde_json::to_string_pretty(snapshot).map_err(|err| CoreError::Serde(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_names_parse_back() {
        let parts = parse_backup_name("finances", "finances_20240115093000123_002_before-reset.json")
            .unwrap();
        let created = parts.created_at.unwrap();
        assert_eq!(created.format("%Y-%m-%d %H:%M:%S%.3f").to_string(), "2024-01-15 09:30:00.123");
        assert_eq!(parts.note.as_deref(), Some("before-reset"));

        assert!(parse_backup_name("finances", "finances_2024_001.json").is_none());
        assert!(parse_backup_name("finances", "other_20240115093000123_000.json").is_none());
    }

    #[test]
    fn notes_are_sanitized() {
        assert_eq!(
            sanitize_backup_note(Some("  Antes de Reset! ")),
            Some("antes-de-reset".into())
        );
        assert_eq!(sanitize_backup_note(Some("???")), None);
        assert_eq!(sanitize_backup_note(None), None);
    }

    #[test]
    fn tmp_path_keeps_original_extension() {
        let tmp = tmp_path(Path::new("/data/finances.json"));
        assert_eq!(tmp, PathBuf::from("/data/finances.json.tmp"));
    }
}
