use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use log::warn;

use crate::model::task::Task;
use crate::repository::traits::BoardRepository;

const DEFAULT_FILE_NAME: &str = "board.json";

#[derive(Clone)]
pub struct FileBoardRepository {
    file_path: PathBuf,
}

impl FileBoardRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => {
                // Default data directory is a dotdir in the home directory.
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| anyhow!("Could not determine home directory"))?;
                home_dir.join(".taskboard")
            }
        };
        fs::create_dir_all(&path)?; // Ensure the directory exists
        path.push(DEFAULT_FILE_NAME);

        Ok(FileBoardRepository { file_path: path })
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.file_path.parent()
    }
}

impl BoardRepository for FileBoardRepository {
    fn load(&self) -> Result<Vec<Task>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        match serde_json::from_reader(reader) {
            Ok(tasks) => Ok(tasks),
            Err(err) => {
                // Fail open: a damaged board file reads as an empty board.
                warn!(
                    "discarding unreadable board file {}: {}",
                    self.file_path.display(),
                    err
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, tasks)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Stage;
    use chrono::{TimeZone, Utc};
    use std::fs;

    fn sample_task() -> Task {
        let mut task = Task::new(
            "Buy milk".to_string(),
            "Whole, two litres".to_string(),
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
        );
        task.stage = Stage::Ongoing;
        task.completed_at = Some(Utc.with_ymd_and_hms(2025, 5, 30, 9, 30, 0).unwrap());
        task
    }

    #[test]
    fn round_trip_preserves_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileBoardRepository::new(Some(dir.path().to_path_buf())).unwrap();

        let task = sample_task();
        repo.save(std::slice::from_ref(&task)).unwrap();
        let loaded = repo.load().unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0], task);
    }

    #[test]
    fn missing_file_loads_as_empty_board() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileBoardRepository::new(Some(dir.path().to_path_buf())).unwrap();

        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn malformed_file_loads_as_empty_board() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileBoardRepository::new(Some(dir.path().to_path_buf())).unwrap();

        fs::write(dir.path().join("board.json"), "{ not json").unwrap();
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn unexpected_shape_loads_as_empty_board() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileBoardRepository::new(Some(dir.path().to_path_buf())).unwrap();

        fs::write(dir.path().join("board.json"), "{\"tasks\": 42}").unwrap();
        assert!(repo.load().unwrap().is_empty());
    }
}
