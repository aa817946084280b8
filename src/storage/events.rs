use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::ConversationStatus;

pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// What happened to a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    StatusChanged {
        from: ConversationStatus,
        to: ConversationStatus,
    },
    /// Preview text or activity timestamp changed.
    Updated,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationChange {
    pub conversation_id: String,
    #[serde(flatten)]
    pub kind: ChangeKind,
}

/// Fan-out of store changes to any number of observers.
#[derive(Debug)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ConversationChange>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConversationChange> {
        self.sender.subscribe()
    }

    pub(crate) fn publish(&self, conversation_id: &str, kind: ChangeKind) {
        let change = ConversationChange {
            conversation_id: conversation_id.to_string(),
            kind,
        };

        // No subscribers is fine
        if self.sender.send(change).is_err() {
            tracing::trace!("No observers for change on {}", conversation_id);
        }
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
