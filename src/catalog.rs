use crate::models::{DayLog, TaskState};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one task")]
    Empty,
    #[error("task id must not be empty")]
    EmptyId,
    #[error("duplicate task id `{0}`")]
    DuplicateId(String),
    #[error("task `{0}` must be worth at least one point")]
    ZeroPoints(String),
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub id: String,
    pub title: String,
    pub points: u32,
}

impl TaskDefinition {
    pub fn new(id: impl Into<String>, title: impl Into<String>, points: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            points,
        }
    }
}

/// Ordered, validated list of trackable tasks. Constant for the process
/// lifetime once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    tasks: Vec<TaskDefinition>,
}

impl Catalog {
    pub fn new(tasks: Vec<TaskDefinition>) -> Result<Self, CatalogError> {
        if tasks.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(tasks.len());
        for task in &tasks {
            if task.id.trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if task.points == 0 {
                return Err(CatalogError::ZeroPoints(task.id.clone()));
            }
            if !seen.insert(task.id.as_str()) {
                return Err(CatalogError::DuplicateId(task.id.clone()));
            }
        }

        Ok(Self { tasks })
    }

    /// Reads a JSON array of `{id, title, points}` objects.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let tasks: Vec<TaskDefinition> = serde_json::from_str(&raw)?;
        Self::new(tasks)
    }

    pub fn tasks(&self) -> &[TaskDefinition] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&TaskDefinition> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn max_score(&self) -> u32 {
        self.tasks
            .iter()
            .fold(0u32, |total, task| total.saturating_add(task.points))
    }

    /// Points earned by a day. Entries missing from the day count as not
    /// completed; entries for tasks outside the catalog are ignored.
    pub fn score(&self, log: &DayLog) -> u32 {
        self.tasks
            .iter()
            .filter(|task| log.tasks.get(&task.id).is_some_and(|state| state.completed))
            .fold(0u32, |total, task| total.saturating_add(task.points))
    }

    pub fn default_tasks(&self) -> BTreeMap<String, TaskState> {
        self.tasks
            .iter()
            .map(|task| (task.id.clone(), TaskState::default()))
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            tasks: vec![
                TaskDefinition::new("steps", "10,000 Steps Goal", 4),
                TaskDefinition::new("dsa", "DSA Practice", 3),
                TaskDefinition::new("aiml", "AI/ML Learning", 3),
            ],
        }
    }
}
