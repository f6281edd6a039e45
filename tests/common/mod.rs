//! Shared test helpers: in-process persistence doubles.

use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use uuid::Uuid;
use voxdraft::{DraftPersistence, EngineError, EngineResult};

/// Persistence double that records every save it is asked to perform.
pub struct RecordingPersistence {
    saves: Arc<Mutex<Vec<(Uuid, String)>>>,
}

impl RecordingPersistence {
    /// Returns the double and a handle to its recorded saves.
    pub fn new() -> (Arc<Self>, Arc<Mutex<Vec<(Uuid, String)>>>) {
        let saves = Arc::new(Mutex::new(Vec::new()));
        (
            Arc::new(Self {
                saves: saves.clone(),
            }),
            saves,
        )
    }
}

impl DraftPersistence for RecordingPersistence {
    fn save(&self, session_id: Uuid, text: String) -> BoxFuture<'static, EngineResult<()>> {
        let saves = self.saves.clone();
        Box::pin(async move {
            saves.lock().unwrap().push((session_id, text));
            Ok(())
        })
    }
}

/// Persistence double that always fails.
pub struct FailingPersistence;

impl DraftPersistence for FailingPersistence {
    fn save(&self, _session_id: Uuid, _text: String) -> BoxFuture<'static, EngineResult<()>> {
        Box::pin(async { Err(EngineError::persistence("backend unavailable")) })
    }
}

/// Yield enough times for spawned autosave tasks to run to completion.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
