use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    #[serde(default)]
    pub completed: bool,
    /// Opaque evidence, usually an image data URL. Stored verbatim.
    #[serde(default)]
    pub proof: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLog {
    pub date_key: NaiveDate,
    pub tasks: BTreeMap<String, TaskState>,
}

impl DayLog {
    pub fn new(date_key: NaiveDate, tasks: BTreeMap<String, TaskState>) -> Self {
        Self { date_key, tasks }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogArchive {
    pub logs: BTreeMap<NaiveDate, DayLog>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Full,
    Partial,
    Missed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub score: u32,
    pub status: DayStatus,
}

#[derive(Debug, Deserialize)]
pub struct CompletionRequest {
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProofRequest {
    pub proof: String,
    /// Generation handed out by the proof-begin endpoint.
    pub ticket: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProofTicketResponse {
    pub ticket: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskView {
    pub id: String,
    pub title: String,
    pub points: u32,
    pub completed: bool,
    pub proof: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: NaiveDate,
    pub tasks: Vec<TaskView>,
    pub score: u32,
    pub max_score: u32,
    pub streak: u32,
    pub persistence_warning: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub max_score: u32,
    pub days: Vec<HistoryEntry>,
}
