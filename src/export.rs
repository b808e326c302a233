use crate::models::LogArchive;
use chrono::NaiveDate;

pub fn export_file_name(today: NaiveDate) -> String {
    format!("daily-log-backup-{}.json", today.format("%Y-%m-%d"))
}

/// Pretty-printed JSON of the whole archive.
pub fn export_archive(archive: &LogArchive) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(archive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayLog, TaskState};
    use std::collections::BTreeMap;

    #[test]
    fn file_name_uses_date_key() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(today), "daily-log-backup-2024-03-09.json");
    }

    #[test]
    fn export_is_pretty_and_reloadable() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let mut tasks = BTreeMap::new();
        tasks.insert(
            "steps".to_string(),
            TaskState {
                completed: true,
                proof: "data:image/png;base64,AA==".to_string(),
            },
        );
        let mut archive = LogArchive::default();
        archive.logs.insert(day, DayLog::new(day, tasks));

        let json = export_archive(&archive).unwrap();
        assert!(json.contains("\n  \"logs\""));
        assert!(json.contains("\"2024-03-09\""));
        assert!(json.contains("\"dateKey\": \"2024-03-09\""));
        let reloaded: LogArchive = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, archive);
    }
}
