use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{RotateType, Settings};
use crate::models::group::Group;
use crate::models::theme::Theme;

pub const RECORD_FILE: &str = "session.json";

/// The single persisted record. Both keys may be absent in records
/// written by older builds and default instead of erroring.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct SessionRecord {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub theme: Theme,
}

pub struct SessionStore {
    data_dir: PathBuf,
    settings: Settings,
}

impl SessionStore {
    pub fn new(data_dir: impl Into<PathBuf>, settings: Settings) -> Self {
        SessionStore {
            data_dir: data_dir.into(),
            settings,
        }
    }

    pub fn record_path(&self) -> PathBuf {
        self.data_dir.join(RECORD_FILE)
    }

    fn history_dir(&self) -> PathBuf {
        self.data_dir.join("history")
    }

    pub fn read(&self) -> Result<SessionRecord, std::io::Error> {
        let path = self.record_path();
        if !path.exists() {
            return Ok(SessionRecord::default());
        }
        let mut contents = String::new();
        File::open(&path)?.read_to_string(&mut contents)?;
        let record: SessionRecord = serde_json::from_str(&contents)?;
        Ok(record)
    }

    // The previous record is snapshotted first, then the new one is written
    // to a temp file and renamed over the old, so a failed write cannot
    // leave a partial record behind.
    pub fn write(&self, record: &SessionRecord) -> Result<(), std::io::Error> {
        self.snapshot_to_history()?;
        let json = serde_json::to_string(record)?;
        let tmp_path = self.data_dir.join(format!("{}.tmp", RECORD_FILE));
        let mut file = File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        std::fs::rename(&tmp_path, self.record_path())?;
        Ok(())
    }

    fn snapshot_to_history(&self) -> Result<(), std::io::Error> {
        let path = self.record_path();
        if !path.exists() {
            return Ok(());
        }

        let unix_time = chrono::Utc::now().timestamp();
        let snapshot_dir = self.history_dir().join(unix_time.to_string());
        if !snapshot_dir.exists() {
            std::fs::create_dir_all(&snapshot_dir)?;
            std::fs::copy(&path, snapshot_dir.join(RECORD_FILE))?;
        }

        self.remove_old_snapshots_by_count()?;
        self.remove_old_snapshots_by_size()?;

        Ok(())
    }

    fn sorted_snapshot_dirs(&self) -> Result<Vec<PathBuf>, std::io::Error> {
        let mut dirs = std::fs::read_dir(self.history_dir())?
            .map(|res| res.map(|e| e.path()))
            .collect::<Result<Vec<_>, std::io::Error>>()?;
        dirs.sort();
        Ok(dirs)
    }

    fn remove_old_snapshots_by_count(&self) -> Result<(), std::io::Error> {
        if self.settings.rotate_type != RotateType::HistoryCount {
            return Ok(());
        }
        let mut dirs = self.sorted_snapshot_dirs()?;
        while dirs.len() > self.settings.rotate_count as usize {
            std::fs::remove_dir_all(dirs.remove(0))?;
        }
        Ok(())
    }

    fn remove_old_snapshots_by_size(&self) -> Result<(), std::io::Error> {
        if self.settings.rotate_type != RotateType::TotalSize {
            return Ok(());
        }
        let dirs = self.sorted_snapshot_dirs()?;
        let mut total_size = 0;
        for dir in &dirs {
            total_size += snapshot_size(dir)?;
        }
        for dir in &dirs {
            if total_size <= self.settings.rotate_size {
                return Ok(());
            }
            total_size -= snapshot_size(dir)?;
            std::fs::remove_dir_all(dir)?;
        }
        Ok(())
    }
}

fn snapshot_size(dir: &Path) -> Result<u64, std::io::Error> {
    let mut size = 0;
    for entry in std::fs::read_dir(dir)? {
        size += entry?.metadata()?.len();
    }
    Ok(size)
}
