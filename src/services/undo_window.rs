use std::time::Duration;
use tokio::time::Instant;

use crate::models::ConversationStatus;

/// Matches the lifetime of the "conversation archived" toast.
pub const DEFAULT_UNDO_WINDOW: Duration = Duration::from_secs(5);

/// What an undo needs: the conversation and the status it had before archiving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveUndo {
    pub conversation_id: String,
    pub previous_status: ConversationStatus,
}

/// Opens fixed-length undo windows. The store never sees wall-clock time.
#[derive(Debug, Clone, Copy)]
pub struct UndoWindow {
    duration: Duration,
}

impl UndoWindow {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn open(&self, ticket: ArchiveUndo) -> UndoHandle {
        UndoHandle {
            ticket,
            deadline: Instant::now() + self.duration,
        }
    }
}

impl Default for UndoWindow {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_WINDOW)
    }
}

/// An armed undo timer. Dropping or claiming it cancels the timer.
#[derive(Debug)]
pub struct UndoHandle {
    ticket: ArchiveUndo,
    deadline: Instant,
}

impl UndoHandle {
    pub fn ticket(&self) -> &ArchiveUndo {
        &self.ticket
    }

    pub fn is_open(&self) -> bool {
        Instant::now() < self.deadline
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Resolves once the window has closed.
    pub async fn expired(&self) {
        tokio::time::sleep_until(self.deadline).await;
    }

    /// Takes the ticket if the window is still open.
    pub fn claim(self) -> Option<ArchiveUndo> {
        if self.is_open() {
            Some(self.ticket)
        } else {
            None
        }
    }
}
