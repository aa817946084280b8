use crate::services::undo_window::{ArchiveUndo, UndoHandle, UndoWindow};
use crate::storage::{SharedConversationStore, StoreError};

/// Archive with an undo affordance: the store mutation happens now, the
/// undo stays available until the caller's window closes.
#[derive(Clone)]
pub struct ArchiveUndoService {
    store: SharedConversationStore,
    window: UndoWindow,
}

impl ArchiveUndoService {
    pub fn new(store: SharedConversationStore, window: UndoWindow) -> Self {
        Self { store, window }
    }

    pub fn store(&self) -> &SharedConversationStore {
        &self.store
    }

    pub async fn archive(&self, id: &str) -> Result<UndoHandle, StoreError> {
        let previous_status = self.store.write().await.archive(id)?;

        tracing::info!("Conversation {} archived (undo open {:?})", id, self.window.duration());
        Ok(self.window.open(ArchiveUndo {
            conversation_id: id.to_string(),
            previous_status,
        }))
    }

    /// Restores the captured status if the window is still open and the
    /// conversation is still archived.
    pub async fn undo(&self, handle: UndoHandle) -> bool {
        let Some(ticket) = handle.claim() else {
            tracing::debug!("Undo window already closed");
            return false;
        };

        self.store
            .write()
            .await
            .undo_archive(&ticket.conversation_id, ticket.previous_status)
    }
}
