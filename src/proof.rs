use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::Mutex;

type ProofKey = (NaiveDate, String);

/// Claim on the right to write one task's proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofTicket {
    date: NaiveDate,
    task_id: String,
    generation: u64,
}

impl ProofTicket {
    /// Rebuilds a ticket a client was handed by `begin` and sent back with
    /// its proof.
    pub fn new(date: NaiveDate, task_id: impl Into<String>, generation: u64) -> Self {
        Self {
            date,
            task_id: task_id.into(),
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }
}

/// Orders proof uploads per `(date, task)`. A ticket is taken when the user
/// picks a file, before it is read; a newer ticket supersedes any upload
/// still in flight, so only the file picked last is written.
#[derive(Debug, Default)]
pub struct ProofGate {
    inner: Mutex<GateState>,
}

#[derive(Debug, Default)]
struct GateState {
    next_generation: u64,
    latest: HashMap<ProofKey, u64>,
}

impl ProofGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin(&self, date: NaiveDate, task_id: &str) -> ProofTicket {
        let mut inner = self.inner.lock().await;
        inner.next_generation += 1;
        let generation = inner.next_generation;
        inner.latest.retain(|(day, _), _| *day >= date);
        inner.latest.insert((date, task_id.to_string()), generation);

        ProofTicket {
            date,
            task_id: task_id.to_string(),
            generation,
        }
    }

    /// True if `ticket` is still the newest for its key. A current ticket is
    /// retired, so each ticket finishes at most once.
    pub async fn finish(&self, ticket: &ProofTicket) -> bool {
        let mut inner = self.inner.lock().await;
        let key = (ticket.date, ticket.task_id.clone());
        if inner.latest.get(&key) == Some(&ticket.generation) {
            inner.latest.remove(&key);
            true
        } else {
            false
        }
    }

    pub async fn in_flight(&self) -> usize {
        self.inner.lock().await.latest.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn newer_upload_supersedes_in_flight_one() {
        let gate = ProofGate::new();
        let first = gate.begin(day(), "a").await;
        let second = gate.begin(day(), "a").await;

        assert!(!gate.finish(&first).await);
        assert!(gate.finish(&second).await);
        assert_eq!(gate.in_flight().await, 0);
    }

    #[tokio::test]
    async fn tasks_do_not_interfere() {
        let gate = ProofGate::new();
        let a = gate.begin(day(), "a").await;
        let b = gate.begin(day(), "b").await;

        assert!(gate.finish(&b).await);
        assert!(gate.finish(&a).await);
    }

    #[tokio::test]
    async fn later_pick_wins_even_if_it_finishes_first() {
        let gate = ProofGate::new();
        let picked_first = gate.begin(day(), "a").await;
        let picked_second = gate.begin(day(), "a").await;

        assert!(gate.finish(&picked_second).await);
        assert!(!gate.finish(&picked_first).await);
    }

    #[tokio::test]
    async fn begin_drops_tickets_from_earlier_days() {
        let gate = ProofGate::new();
        gate.begin(day(), "a").await;
        gate.begin(day().succ_opt().unwrap(), "b").await;
        assert_eq!(gate.in_flight().await, 1);
    }

    #[tokio::test]
    async fn rebuilt_ticket_matches_issued_one() {
        let gate = ProofGate::new();
        let issued = gate.begin(day(), "a").await;
        let returned = ProofTicket::new(day(), "a", issued.generation());
        assert_eq!(returned, issued);
        assert!(gate.finish(&returned).await);
    }

    #[tokio::test]
    async fn ticket_finishes_once() {
        let gate = ProofGate::new();
        let ticket = gate.begin(day(), "a").await;
        assert_eq!(ticket.task_id(), "a");
        assert_eq!(ticket.date(), day());
        assert!(gate.finish(&ticket).await);
        assert!(!gate.finish(&ticket).await);
    }
}
