use std::collections::HashSet;
use std::sync::Mutex;

/// Per-entity-id exclusion preventing two operations from racing on the
/// same listing or user (double-click approve, approve racing delete).
///
/// `begin` is a single atomic check-and-mark under one lock, so two
/// concurrent callers can never both observe "not busy" for the same id.
/// There is no queue: a rejected caller drops the duplicate request.
#[derive(Default)]
pub struct OperationGuard {
    busy: Mutex<HashSet<String>>,
}

impl OperationGuard {
    /// Mark `id` busy for one in-flight operation. The returned ticket
    /// clears the mark when dropped, covering every exit path.
    pub fn begin(&self, id: &str) -> Result<OperationTicket<'_>, OperationInProgress> {
        let mut busy = self.busy.lock().expect("guard mutex poisoned");
        if !busy.insert(id.to_string()) {
            return Err(OperationInProgress { id: id.to_string() });
        }
        Ok(OperationTicket {
            guard: self,
            id: id.to_string(),
        })
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.busy.lock().expect("guard mutex poisoned").contains(id)
    }

    fn end(&self, id: &str) {
        self.busy.lock().expect("guard mutex poisoned").remove(id);
    }
}

/// Ephemeral admission for one in-flight operation; exists only between
/// request start and completion and is never persisted.
pub struct OperationTicket<'a> {
    guard: &'a OperationGuard,
    id: String,
}

impl Drop for OperationTicket<'_> {
    fn drop(&mut self) {
        self.guard.end(&self.id);
    }
}

/// Rejection handed to duplicate submissions; expected under normal
/// double-click traffic and surfaced as a no-op, never escalated.
#[derive(Debug, thiserror::Error)]
#[error("an operation is already in progress for {id}")]
pub struct OperationInProgress {
    pub id: String,
}
