// =============================================================================
// Progress Bus — per-run best-effort progress broadcasting
// =============================================================================
//
// Each analysis run registers a tokio broadcast channel keyed by session id.
// The pipeline publishes fire-and-forget updates as it moves through its
// stages; WebSocket handlers subscribe and forward. Publishing never blocks
// and never fails the pipeline: with no subscriber the event is simply
// dropped. A slow subscriber may miss intermediate updates (broadcast lag),
// which is acceptable since every update carries the absolute percentage.
//
// The channel is removed after the terminal event so late subscribers fall
// back to the session-store snapshot.
// =============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

/// Buffered events per subscriber before lag kicks in.
const CHANNEL_CAPACITY: usize = 32;

// =============================================================================
// Events
// =============================================================================

/// One progress notification. Percent is monotonically non-decreasing within
/// a run; `Completed` and `Error` are terminal.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Update {
        progress: u8,
        status: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        step: Option<String>,
    },
    Completed {
        report_id: String,
    },
    Error {
        error: String,
    },
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProgressEvent::Update { .. })
    }
}

// =============================================================================
// ProgressBus
// =============================================================================

pub struct ProgressBus {
    channels: RwLock<HashMap<String, broadcast::Sender<ProgressEvent>>>,
}

impl ProgressBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            channels: RwLock::new(HashMap::new()),
        })
    }

    /// Create the channel for a new run. Idempotent per session id.
    pub fn register(&self, session_id: &str) {
        let mut channels = self.channels.write();
        channels
            .entry(session_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
    }

    /// Subscribe to a run's updates. `None` when the run is unknown or has
    /// already published its terminal event.
    pub fn subscribe(&self, session_id: &str) -> Option<broadcast::Receiver<ProgressEvent>> {
        self.channels.read().get(session_id).map(|tx| tx.subscribe())
    }

    /// Publish one event. Terminal events also tear the channel down.
    pub fn publish(&self, session_id: &str, event: ProgressEvent) {
        let terminal = event.is_terminal();
        {
            let channels = self.channels.read();
            if let Some(tx) = channels.get(session_id) {
                // Err just means no subscriber is listening right now.
                if tx.send(event).is_err() {
                    debug!(session_id, "progress event dropped, no subscribers");
                }
            }
        }
        if terminal {
            self.channels.write().remove(session_id);
        }
    }

    pub fn update(&self, session_id: &str, progress: u8, status: &str, step: Option<&str>) {
        self.publish(
            session_id,
            ProgressEvent::Update {
                progress,
                status: status.to_string(),
                step: step.map(str::to_string),
            },
        );
    }
}
