//! Persistence for taskweave data.
//!
//! The core consumes persistence through the [`TaskStore`] trait; two
//! backends are provided:
//! - `FileStore` - JSONL files under the platform data directory (default)
//! - `MemoryStore` - in-memory store for tests and embedding
//!
//! `save_tasks` returns the persisted rows (timestamps re-stamped by the
//! store); callers must reconcile the result by id, never by array
//! position.

use crate::models::{Project, Task};
use crate::{Error, Result};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory (mainly for tests).
pub const DATA_DIR_ENV: &str = "TW_DATA_DIR";

const PROJECTS_FILE: &str = "projects.jsonl";
const TASKS_FILE: &str = "tasks.jsonl";

/// Trait for task/project persistence backends.
pub trait TaskStore: Send + Sync {
    /// All projects, in creation order.
    fn load_projects(&self) -> Result<Vec<Project>>;

    /// Create a project with a store-assigned id.
    fn create_project(&mut self, name: &str) -> Result<Project>;

    /// Update an existing project; errors with `NotFound` if absent.
    fn update_project(&mut self, project: &Project) -> Result<Project>;

    /// Tasks belonging to a project, in creation order.
    fn load_tasks(&self, project_id: &str) -> Result<Vec<Task>>;

    /// Upsert tasks by id and return the persisted rows.
    fn save_tasks(&mut self, tasks: &[Task]) -> Result<Vec<Task>>;
}

/// Resolve the data directory: `TW_DATA_DIR` overrides the platform
/// default.
pub fn resolve_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let base = dirs::data_dir()
        .ok_or_else(|| Error::Other("could not determine data directory".to_string()))?;
    Ok(base.join("taskweave"))
}

/// Generate a unique ID for an entity.
///
/// Format: `<prefix>-<4 hex chars>`, hashed from the seed plus the current
/// timestamp. Task prefix: "tw".
pub fn generate_id(prefix: &str, seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(
        Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or(0)
            .to_le_bytes(),
    );
    let hash = hasher.finalize();
    let hash_hex = format!("{:x}", hash);
    format!("{}-{}", prefix, &hash_hex[..4])
}

/// Validate that an ID matches the expected format.
pub fn validate_id(id: &str, prefix: &str) -> Result<()> {
    if !id.starts_with(&format!("{}-", prefix)) {
        return Err(Error::InvalidId(format!(
            "ID must start with '{}-', got: {}",
            prefix, id
        )));
    }

    let suffix = &id[prefix.len() + 1..];
    if suffix.len() != 4 || !suffix.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidId(format!(
            "ID suffix must be 4 hex characters, got: {}",
            suffix
        )));
    }

    Ok(())
}

/// JSONL file storage under a data directory.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Initialize storage, creating the directory and empty files.
    ///
    /// Idempotent: re-initializing an existing store leaves its data alone.
    pub fn init(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        for file in [PROJECTS_FILE, TASKS_FILE] {
            let path = data_dir.join(file);
            if !path.exists() {
                fs::write(&path, "")?;
            }
        }
        Ok(Self {
            root: data_dir.to_path_buf(),
        })
    }

    /// Open existing storage; errors with `NotInitialized` if absent.
    pub fn open(data_dir: &Path) -> Result<Self> {
        if !Self::exists(data_dir) {
            return Err(Error::NotInitialized);
        }
        Ok(Self {
            root: data_dir.to_path_buf(),
        })
    }

    /// Check whether storage exists at the given directory.
    pub fn exists(data_dir: &Path) -> bool {
        data_dir.join(PROJECTS_FILE).exists() && data_dir.join(TASKS_FILE).exists()
    }

    /// Get the storage root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_jsonl<T: serde::de::DeserializeOwned>(&self, filename: &str) -> Result<Vec<T>> {
        let path = self.root.join(filename);
        if !path.exists() {
            return Err(Error::NotInitialized);
        }
        let content = fs::read_to_string(path)?;
        let mut items = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            items.push(serde_json::from_str(line)?);
        }
        Ok(items)
    }

    fn write_jsonl<T: serde::Serialize>(&self, filename: &str, items: &[T]) -> Result<()> {
        let mut content = String::new();
        for item in items {
            content.push_str(&serde_json::to_string(item)?);
            content.push('\n');
        }
        fs::write(self.root.join(filename), content)?;
        Ok(())
    }
}

impl TaskStore for FileStore {
    fn load_projects(&self) -> Result<Vec<Project>> {
        self.read_jsonl(PROJECTS_FILE)
    }

    fn create_project(&mut self, name: &str) -> Result<Project> {
        let mut projects: Vec<Project> = self.read_jsonl(PROJECTS_FILE)?;
        let project = Project::new(uuid::Uuid::new_v4().to_string(), name.to_string());
        projects.push(project.clone());
        self.write_jsonl(PROJECTS_FILE, &projects)?;
        Ok(project)
    }

    fn update_project(&mut self, project: &Project) -> Result<Project> {
        let mut projects: Vec<Project> = self.read_jsonl(PROJECTS_FILE)?;
        let slot = projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or_else(|| Error::NotFound(project.id.clone()))?;
        let mut updated = project.clone();
        updated.updated_at = Utc::now();
        *slot = updated.clone();
        self.write_jsonl(PROJECTS_FILE, &projects)?;
        Ok(updated)
    }

    fn load_tasks(&self, project_id: &str) -> Result<Vec<Task>> {
        let tasks: Vec<Task> = self.read_jsonl(TASKS_FILE)?;
        Ok(tasks
            .into_iter()
            .filter(|t| t.project_id == project_id)
            .collect())
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> Result<Vec<Task>> {
        let mut all: Vec<Task> = self.read_jsonl(TASKS_FILE)?;
        let mut saved = Vec::with_capacity(tasks.len());

        for task in tasks {
            let mut row = task.clone();
            row.updated_at = Utc::now();
            match all.iter_mut().find(|t| t.id == row.id) {
                Some(slot) => *slot = row.clone(),
                None => all.push(row.clone()),
            }
            saved.push(row);
        }

        self.write_jsonl(TASKS_FILE, &all)?;
        Ok(saved)
    }
}

/// In-memory store for tests and embedding.
///
/// `fail_saves` makes `save_tasks` error, exercising callers'
/// save-failure fallback paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: Vec<Project>,
    tasks: Vec<Task>,
    pub fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing tasks.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            projects: Vec::new(),
            tasks,
            fail_saves: false,
        }
    }
}

impl TaskStore for MemoryStore {
    fn load_projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.clone())
    }

    fn create_project(&mut self, name: &str) -> Result<Project> {
        let project = Project::new(uuid::Uuid::new_v4().to_string(), name.to_string());
        self.projects.push(project.clone());
        Ok(project)
    }

    fn update_project(&mut self, project: &Project) -> Result<Project> {
        let slot = self
            .projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or_else(|| Error::NotFound(project.id.clone()))?;
        let mut updated = project.clone();
        updated.updated_at = Utc::now();
        *slot = updated.clone();
        Ok(updated)
    }

    fn load_tasks(&self, project_id: &str) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    fn save_tasks(&mut self, tasks: &[Task]) -> Result<Vec<Task>> {
        if self.fail_saves {
            return Err(Error::Other("simulated save failure".to_string()));
        }
        let mut saved = Vec::with_capacity(tasks.len());
        for task in tasks {
            let mut row = task.clone();
            row.updated_at = Utc::now();
            match self.tasks.iter_mut().find(|t| t.id == row.id) {
                Some(slot) => *slot = row.clone(),
                None => self.tasks.push(row.clone()),
            }
            saved.push(row);
        }
        Ok(saved)
    }
}

/// Reconcile a local task list against persisted rows, by id.
///
/// Rows the store returned replace their local counterparts; local tasks
/// the store did not return are kept as-is. Order follows the local list.
pub fn reconcile_by_id(local: &[Task], saved: &[Task]) -> Vec<Task> {
    let saved_by_id: HashMap<&str, &Task> =
        saved.iter().map(|t| (t.id.as_str(), t)).collect();
    local
        .iter()
        .map(|task| {
            saved_by_id
                .get(task.id.as_str())
                .map(|s| (*s).clone())
                .unwrap_or_else(|| task.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_id_format() {
        let id = generate_id("tw", "test seed");
        assert!(id.starts_with("tw-"));
        assert_eq!(id.len(), 7);
        assert!(validate_id(&id, "tw").is_ok());
    }

    #[test]
    fn test_generate_id_uniqueness() {
        let id1 = generate_id("tw", "seed1");
        let id2 = generate_id("tw", "seed2");
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_validate_id_rejects_bad_formats() {
        assert!(validate_id("tw-12g4", "tw").is_err());
        assert!(validate_id("tw-123", "tw").is_err());
        assert!(validate_id("bn-1234", "tw").is_err());
    }

    #[test]
    fn test_file_store_init_and_open() {
        let temp = TempDir::new().unwrap();
        assert!(!FileStore::exists(temp.path()));
        assert!(matches!(
            FileStore::open(temp.path()),
            Err(Error::NotInitialized)
        ));

        FileStore::init(temp.path()).unwrap();
        assert!(FileStore::exists(temp.path()));
        FileStore::open(temp.path()).unwrap();
    }

    #[test]
    fn test_file_store_init_idempotent() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::init(temp.path()).unwrap();
        store.create_project("Keep me").unwrap();

        FileStore::init(temp.path()).unwrap();
        let projects = store.load_projects().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Keep me");
    }

    #[test]
    fn test_file_store_project_roundtrip() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::init(temp.path()).unwrap();

        let project = store.create_project("Demo").unwrap();
        assert!(!project.id.is_empty());

        let mut renamed = project.clone();
        renamed.name = "Renamed".to_string();
        store.update_project(&renamed).unwrap();

        let projects = store.load_projects().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Renamed");
    }

    #[test]
    fn test_file_store_update_missing_project() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::init(temp.path()).unwrap();
        let ghost = Project::new("nope".to_string(), "Ghost".to_string());
        assert!(matches!(
            store.update_project(&ghost),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_file_store_task_upsert_and_filter() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::init(temp.path()).unwrap();

        let a = Task::new("tw-aaaa".into(), "A".into(), "p1".into());
        let b = Task::new("tw-bbbb".into(), "B".into(), "p2".into());
        store.save_tasks(&[a.clone(), b]).unwrap();

        let mut a2 = a.clone();
        a2.title = "A v2".to_string();
        store.save_tasks(&[a2]).unwrap();

        let p1 = store.load_tasks("p1").unwrap();
        assert_eq!(p1.len(), 1);
        assert_eq!(p1[0].title, "A v2");

        let p2 = store.load_tasks("p2").unwrap();
        assert_eq!(p2.len(), 1);
    }

    #[test]
    fn test_memory_store_fail_saves() {
        let mut store = MemoryStore::new();
        store.fail_saves = true;
        let task = Task::new("tw-aaaa".into(), "A".into(), "p1".into());
        assert!(store.save_tasks(&[task]).is_err());
    }

    #[test]
    fn test_reconcile_by_id_not_position() {
        let local = vec![
            Task::new("tw-aaaa".into(), "A local".into(), "p1".into()),
            Task::new("tw-bbbb".into(), "B local".into(), "p1".into()),
        ];
        // Saved rows come back in a different order and only partially.
        let mut b_saved = local[1].clone();
        b_saved.title = "B saved".to_string();
        let saved = vec![b_saved];

        let merged = reconcile_by_id(&local, &saved);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "A local");
        assert_eq!(merged[1].title, "B saved");
    }
}
