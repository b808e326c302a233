use crate::catalog::Catalog;
use crate::models::{DayStatus, HistoryEntry, LogArchive};
use chrono::{Local, NaiveDate};

pub fn day_score(catalog: &Catalog, archive: &LogArchive, date: NaiveDate) -> u32 {
    archive
        .logs
        .get(&date)
        .map(|log| catalog.score(log))
        .unwrap_or(0)
}

pub fn classify(score: u32, max_score: u32) -> DayStatus {
    if score >= max_score {
        DayStatus::Full
    } else if score > 0 {
        DayStatus::Partial
    } else {
        DayStatus::Missed
    }
}

/// Consecutive full days ending at `as_of`, walking backward until the
/// first absent or partial day.
pub fn streak(catalog: &Catalog, archive: &LogArchive, as_of: NaiveDate) -> u32 {
    let max_score = catalog.max_score();
    let mut count = 0u32;
    let mut cursor = Some(as_of);

    while let Some(date) = cursor {
        let Some(log) = archive.logs.get(&date) else {
            break;
        };
        if catalog.score(log) != max_score {
            break;
        }
        count += 1;
        cursor = date.pred_opt();
    }

    count
}

pub fn build_history(catalog: &Catalog, archive: &LogArchive) -> Vec<HistoryEntry> {
    build_history_at(Local::now().date_naive(), catalog, archive)
}

/// One entry per calendar day from the earliest record through `today`,
/// ascending. Days without a record score zero.
pub fn build_history_at(today: NaiveDate, catalog: &Catalog, archive: &LogArchive) -> Vec<HistoryEntry> {
    let Some(first) = archive.logs.keys().next().copied() else {
        return Vec::new();
    };

    let max_score = catalog.max_score();
    first
        .iter_days()
        .take_while(|date| *date <= today)
        .map(|date| {
            let score = day_score(catalog, archive, date);
            HistoryEntry {
                date,
                score,
                status: classify(score, max_score),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TaskDefinition;
    use crate::models::DayLog;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            TaskDefinition::new("a", "A", 4),
            TaskDefinition::new("b", "B", 3),
            TaskDefinition::new("c", "C", 3),
        ])
        .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn insert(archive: &mut LogArchive, catalog: &Catalog, day: NaiveDate, completed: &[&str]) {
        let mut log = DayLog::new(day, catalog.default_tasks());
        for id in completed {
            log.tasks.get_mut(*id).unwrap().completed = true;
        }
        archive.logs.insert(day, log);
    }

    #[test]
    fn history_fills_gaps_through_today() {
        let catalog = catalog();
        let mut archive = LogArchive::default();
        insert(&mut archive, &catalog, date(2024, 1, 1), &["a", "b", "c"]);

        let history = build_history_at(date(2024, 1, 3), &catalog, &archive);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].date, date(2024, 1, 1));
        assert_eq!(history[0].score, 10);
        assert_eq!(history[0].status, DayStatus::Full);
        assert_eq!(history[1].date, date(2024, 1, 2));
        assert_eq!(history[1].score, 0);
        assert_eq!(history[1].status, DayStatus::Missed);
        assert_eq!(history[2].date, date(2024, 1, 3));
        assert_eq!(history[2].score, 0);
    }

    #[test]
    fn history_is_empty_without_records() {
        let history = build_history_at(date(2024, 1, 3), &catalog(), &LogArchive::default());
        assert!(history.is_empty());
    }

    #[test]
    fn history_crosses_month_and_dst_boundaries() {
        let catalog = catalog();
        let mut archive = LogArchive::default();
        insert(&mut archive, &catalog, date(2024, 3, 30), &["a"]);

        let history = build_history_at(date(2024, 4, 1), &catalog, &archive);
        let dates: Vec<NaiveDate> = history.iter().map(|entry| entry.date).collect();
        assert_eq!(dates, vec![date(2024, 3, 30), date(2024, 3, 31), date(2024, 4, 1)]);
        assert_eq!(history[0].status, DayStatus::Partial);
    }

    #[test]
    fn streak_counts_back_until_gap() {
        let catalog = catalog();
        let mut archive = LogArchive::default();
        insert(&mut archive, &catalog, date(2024, 2, 27), &["a", "b", "c"]);
        insert(&mut archive, &catalog, date(2024, 2, 28), &["a", "b"]);
        insert(&mut archive, &catalog, date(2024, 2, 29), &["a", "b", "c"]);
        insert(&mut archive, &catalog, date(2024, 3, 1), &["a", "b", "c"]);

        assert_eq!(streak(&catalog, &archive, date(2024, 3, 1)), 2);
        assert_eq!(streak(&catalog, &archive, date(2024, 2, 28)), 0);
        assert_eq!(streak(&catalog, &archive, date(2024, 2, 27)), 1);
        assert_eq!(streak(&catalog, &archive, date(2024, 3, 2)), 0);
    }
}
