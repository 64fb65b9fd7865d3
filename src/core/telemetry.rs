use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::tool::ToolKind;

/// One settled run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunTrace {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub tool: ToolKind,
    /// Model the request was built for; absent if the run failed before building.
    pub model: Option<String>,
    /// Result label on success (`image`, `video`, `text`), error label otherwise.
    pub outcome: String,
    pub succeeded: bool,
    pub duration_ms: u64,
    pub polls: u32,
    pub metadata: HashMap<String, String>,
}

impl RunTrace {
    pub(crate) fn start(tool: ToolKind) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            tool,
            model: None,
            outcome: String::new(),
            succeeded: false,
            duration_ms: 0,
            polls: 0,
            metadata: HashMap::new(),
        }
    }
}

/// Sink for run traces.
pub trait Telemetry: Send + Sync {
    fn record(&self, entry: RunTrace);
    fn flush(&self);
}

/// Simple in-memory collector for traces.
#[derive(Default)]
pub struct MemoryTelemetry {
    traces: std::sync::Mutex<Vec<RunTrace>>,
}

impl MemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_traces(&self) -> Vec<RunTrace> {
        self.traces
            .lock()
            .map(|traces| traces.clone())
            .unwrap_or_default()
    }
}

impl Telemetry for MemoryTelemetry {
    fn record(&self, entry: RunTrace) {
        if let Ok(mut traces) = self.traces.lock() {
            traces.push(entry);
        }
    }

    fn flush(&self) {
        // No-op for memory collector
    }
}
