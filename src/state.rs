use crate::log_store::LogStore;
use crate::proof::ProofGate;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<LogStore>>,
    pub proofs: Arc<ProofGate>,
}

impl AppState {
    pub fn new(store: LogStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            proofs: Arc::new(ProofGate::new()),
        }
    }
}
