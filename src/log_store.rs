//! Owner of the log archive.
//!
//! Every mutation is followed by a save of the whole archive. Storage
//! failures never reach callers: a failed read starts the session empty, a
//! failed write switches the store to in-memory operation and records a
//! warning that the today view surfaces.

use crate::catalog::Catalog;
use crate::errors::LogError;
use crate::models::{DayLog, HistoryEntry, LogArchive, TaskState};
use crate::stats;
use crate::storage::{STORAGE_KEY, StorageBackend};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

pub struct LogStore {
    catalog: Catalog,
    archive: LogArchive,
    backend: Box<dyn StorageBackend>,
    persistence_warning: Option<String>,
}

impl LogStore {
    /// Hydrates the archive from `backend`, falling back to an empty one.
    pub fn open(catalog: Catalog, backend: Box<dyn StorageBackend>) -> Self {
        let mut persistence_warning = None;
        let archive = match load_archive(backend.as_ref()) {
            Ok(archive) => {
                info!(days = archive.logs.len(), "loaded daily log archive");
                archive
            }
            Err(LogError::MalformedPersistedState(reason)) => {
                warn!("discarding malformed log archive: {reason}");
                LogArchive::default()
            }
            Err(err) => {
                warn!("{err}; continuing in memory");
                persistence_warning = Some(unsaved_warning(&err));
                LogArchive::default()
            }
        };

        Self {
            catalog,
            archive,
            backend,
            persistence_warning,
        }
    }

    /// A store with no usable storage at all, e.g. when the data directory
    /// cannot be created.
    pub fn unavailable(catalog: Catalog, backend: Box<dyn StorageBackend>, reason: impl Into<String>) -> Self {
        let err = LogError::PersistenceUnavailable(reason.into());
        warn!("{err}; continuing in memory");
        Self {
            catalog,
            archive: LogArchive::default(),
            backend,
            persistence_warning: Some(unsaved_warning(&err)),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn archive(&self) -> &LogArchive {
        &self.archive
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayLog> {
        self.archive.logs.get(&date)
    }

    pub fn max_score(&self) -> u32 {
        self.catalog.max_score()
    }

    /// Set once a save has failed; later mutations stay in memory only.
    pub fn persistence_warning(&self) -> Option<&str> {
        self.persistence_warning.as_deref()
    }

    /// Returns the day's log, creating it if absent. Existing logs are
    /// never overwritten, but tasks added to the catalog since the log was
    /// created get default entries.
    pub fn ensure_day(&mut self, date: NaiveDate) -> DayLog {
        let changed = match self.archive.logs.get_mut(&date) {
            Some(log) => backfill(&self.catalog, log),
            None => {
                debug!(%date, "creating day log");
                self.archive
                    .logs
                    .insert(date, DayLog::new(date, self.catalog.default_tasks()));
                true
            }
        };

        if changed {
            self.persist();
        }
        self.archive.logs[&date].clone()
    }

    pub fn set_task_completion(&mut self, date: NaiveDate, task_id: &str, completed: bool) -> Result<DayLog, LogError> {
        let updated = {
            let state = self.task_state_mut(date, task_id)?;
            state.completed = completed;
            self.archive.logs[&date].clone()
        };
        debug!(%date, task_id, completed, score = self.catalog.score(&updated), "task completion set");
        self.persist();
        Ok(updated)
    }

    pub fn set_task_proof(&mut self, date: NaiveDate, task_id: &str, proof: impl Into<String>) -> Result<DayLog, LogError> {
        let updated = {
            let state = self.task_state_mut(date, task_id)?;
            state.proof = proof.into();
            self.archive.logs[&date].clone()
        };
        debug!(%date, task_id, bytes = updated.tasks[task_id].proof.len(), "task proof set");
        self.persist();
        Ok(updated)
    }

    /// Resets every task of the day to its default state.
    pub fn clear_day(&mut self, date: NaiveDate) -> Result<DayLog, LogError> {
        let updated = {
            let log = self
                .archive
                .logs
                .get_mut(&date)
                .ok_or(LogError::NoSuchDay(date))?;
            log.tasks = self.catalog.default_tasks();
            log.clone()
        };
        info!(%date, "cleared day log");
        self.persist();
        Ok(updated)
    }

    pub fn score(&self, date: NaiveDate) -> u32 {
        stats::day_score(&self.catalog, &self.archive, date)
    }

    pub fn streak(&self, as_of: NaiveDate) -> u32 {
        stats::streak(&self.catalog, &self.archive, as_of)
    }

    pub fn history_range(&self) -> Vec<HistoryEntry> {
        stats::build_history(&self.catalog, &self.archive)
    }

    pub fn history_range_at(&self, today: NaiveDate) -> Vec<HistoryEntry> {
        stats::build_history_at(today, &self.catalog, &self.archive)
    }

    fn task_state_mut(&mut self, date: NaiveDate, task_id: &str) -> Result<&mut TaskState, LogError> {
        if !self.catalog.contains(task_id) {
            return Err(LogError::UnknownTask(task_id.to_string()));
        }
        let log = self
            .archive
            .logs
            .get_mut(&date)
            .ok_or(LogError::NoSuchDay(date))?;
        Ok(log.tasks.entry(task_id.to_string()).or_default())
    }

    fn persist(&mut self) {
        if self.persistence_warning.is_some() {
            debug!("storage unavailable; keeping changes in memory");
            return;
        }

        let result = serde_json::to_string(&self.archive)
            .map_err(|err| LogError::PersistenceUnavailable(err.to_string()))
            .and_then(|payload| {
                self.backend
                    .set(STORAGE_KEY, &payload)
                    .map_err(|err| LogError::PersistenceUnavailable(err.to_string()))
            });

        if let Err(err) = result {
            warn!("failed to save log archive: {err}; continuing in memory");
            self.persistence_warning = Some(unsaved_warning(&err));
        }
    }
}

fn load_archive(backend: &dyn StorageBackend) -> Result<LogArchive, LogError> {
    let raw = backend
        .get(STORAGE_KEY)
        .map_err(|err| LogError::PersistenceUnavailable(err.to_string()))?;
    let Some(raw) = raw else {
        return Ok(LogArchive::default());
    };

    let mut archive: LogArchive =
        serde_json::from_str(&raw).map_err(|err| LogError::MalformedPersistedState(err.to_string()))?;
    for (date, log) in archive.logs.iter_mut() {
        log.date_key = *date;
    }
    Ok(archive)
}

fn backfill(catalog: &Catalog, log: &mut DayLog) -> bool {
    let mut changed = false;
    for task in catalog.tasks() {
        if !log.tasks.contains_key(&task.id) {
            log.tasks.insert(task.id.clone(), TaskState::default());
            changed = true;
        }
    }
    changed
}

fn unsaved_warning(err: &LogError) -> String {
    format!("{err}. Changes will not survive a restart.")
}
