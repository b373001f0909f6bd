use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::hooks::{Continuation, HookEvent};

// ============================================================================
// Records - Collection Entities as Seen by Hook Handlers
// ============================================================================
//
// The record schema is owned by the storage layer; handlers in this crate
// mostly read the id. Payload fields travel as an opaque JSON object.
//
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub id: String,
    pub collection: String,
    pub created: DateTime<Utc>,
    #[serde(flatten)]
    pub data: Value,
}

impl Record {
    /// Build a candidate record with a freshly assigned id. `data` is
    /// expected to be a JSON object.
    pub fn new(collection: &str, data: Value) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            collection: collection.to_string(),
            created: Utc::now(),
            data,
        }
    }
}

/// Event fired before a record create is committed.
///
/// Handlers see the candidate record (id already assigned) and must call
/// [`RecordEvent::next`] to let the persistence pipeline proceed.
pub struct RecordEvent {
    pub record: Record,
    cont: Continuation,
}

impl RecordEvent {
    pub fn new(record: Record) -> Self {
        Self {
            record,
            cont: Continuation::default(),
        }
    }

    /// Let the default persistence pipeline proceed.
    pub fn next(&mut self) {
        self.cont.call();
    }
}

impl HookEvent for RecordEvent {
    fn continuation(&self) -> &Continuation {
        &self.cont
    }

    fn continuation_mut(&mut self) -> &mut Continuation {
        &mut self.cont
    }
}
