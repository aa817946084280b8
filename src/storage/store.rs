use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::slice;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::{
    Conversation, ConversationQuery, ConversationStatus, NewConversation, StatusCounts,
    StatusFilter,
};
use crate::storage::events::{ChangeFeed, ChangeKind, ConversationChange, DEFAULT_EVENT_CAPACITY};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Conversation not found: {0}")]
    NotFound(String),
    #[error("Delete token is no longer pending: {0}")]
    StaleToken(DeleteToken),
    #[error("Duplicate conversation id: {0}")]
    DuplicateId(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conversation is archived and read-only: {0}")]
    ReadOnly(String),
}

impl StoreError {
    /// Errors a UI treats as "already resolved": log, never surface.
    pub fn is_benign(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::StaleToken(_))
    }
}

/// Handle returned by [`ConversationListStore::mark_delete_pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeleteToken(Uuid);

impl DeleteToken {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DeleteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Authoritative in-memory list of the session's conversations.
///
/// Order is insertion order, except that a status change moves the
/// conversation to the back. Every successful mutation publishes one
/// [`ConversationChange`].
#[derive(Debug)]
pub struct ConversationListStore {
    conversations: Vec<Conversation>,
    pending_deletes: HashMap<String, DeleteToken>,
    feed: ChangeFeed,
}

impl ConversationListStore {
    pub fn new(seed: Vec<NewConversation>) -> Result<Self, StoreError> {
        Self::with_event_capacity(seed, DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_event_capacity(
        seed: Vec<NewConversation>,
        capacity: usize,
    ) -> Result<Self, StoreError> {
        let mut store = Self {
            conversations: Vec::with_capacity(seed.len()),
            pending_deletes: HashMap::new(),
            feed: ChangeFeed::new(capacity),
        };

        for conv in seed {
            store.insert(conv)?;
        }

        tracing::debug!("Seeded store with {} conversations", store.len());
        Ok(store)
    }

    pub fn empty() -> Self {
        Self {
            conversations: Vec::new(),
            pending_deletes: HashMap::new(),
            feed: ChangeFeed::default(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConversationChange> {
        self.feed.subscribe()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&Conversation, StoreError> {
        let idx = self.position(id)?;
        Ok(&self.conversations[idx])
    }

    /// All live conversations in collection order.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Filtered view; see [`ConversationQuery::matches`] for the rules.
    pub fn list(&self, filter_text: &str, status_filter: StatusFilter) -> ConversationView<'_> {
        self.query(ConversationQuery::new(filter_text, status_filter))
    }

    pub fn query(&self, query: ConversationQuery) -> ConversationView<'_> {
        ConversationView {
            items: &self.conversations,
            query,
        }
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for conv in &self.conversations {
            counts.bump(conv.status);
        }
        counts
    }

    /// Appends a conversation created by the new-conversation flow.
    pub fn insert(&mut self, new_conv: NewConversation) -> Result<Conversation, StoreError> {
        if new_conv.id.trim().is_empty() {
            return Err(StoreError::InvalidInput("id must not be empty".to_string()));
        }
        if new_conv.title.trim().is_empty() {
            return Err(StoreError::InvalidInput(format!(
                "title must not be empty (id {})",
                new_conv.id
            )));
        }
        if self.position(&new_conv.id).is_ok() {
            return Err(StoreError::DuplicateId(new_conv.id));
        }

        let conv = new_conv.into_conversation(Utc::now());
        self.conversations.push(conv.clone());
        self.feed.publish(&conv.id, ChangeKind::Added);

        tracing::debug!("Added conversation {}", conv.id);
        Ok(conv)
    }

    /// Archives the conversation and returns its prior status for undo.
    pub fn archive(&mut self, id: &str) -> Result<ConversationStatus, StoreError> {
        self.transition(id, ConversationStatus::Archived)
    }

    /// Restores `previous` only if the conversation still exists and is
    /// still archived. Returns `false` when that guard fails.
    pub fn undo_archive(&mut self, id: &str, previous: ConversationStatus) -> bool {
        let Ok(idx) = self.position(id) else {
            tracing::debug!("Undo archive skipped, {} no longer exists", id);
            return false;
        };

        let current = self.conversations[idx].status;
        if current != ConversationStatus::Archived {
            tracing::debug!("Undo archive skipped, {} is now {}", id, current);
            return false;
        }

        if previous != current {
            self.conversations[idx].status = previous;
            self.move_to_back(idx);
            self.feed.publish(
                id,
                ChangeKind::StatusChanged {
                    from: current,
                    to: previous,
                },
            );
        }

        tracing::debug!("Restored conversation {} to {}", id, previous);
        true
    }

    pub fn complete(&mut self, id: &str) -> Result<ConversationStatus, StoreError> {
        self.transition(id, ConversationStatus::Completed)
    }

    pub fn resume(&mut self, id: &str) -> Result<ConversationStatus, StoreError> {
        self.transition(id, ConversationStatus::Active)
    }

    /// Status menu entry point. Returns the prior status.
    pub fn set_status(
        &mut self,
        id: &str,
        status: ConversationStatus,
    ) -> Result<ConversationStatus, StoreError> {
        match status {
            ConversationStatus::Archived => self.archive(id),
            ConversationStatus::Completed => self.complete(id),
            ConversationStatus::Active => self.resume(id),
        }
    }

    /// Records the latest chat turn. Position in the list is unchanged.
    pub fn record_message(
        &mut self,
        id: &str,
        preview: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let idx = self.position(id)?;
        let conv = &mut self.conversations[idx];
        if conv.is_read_only() {
            return Err(StoreError::ReadOnly(id.to_string()));
        }

        conv.last_message = preview.into();
        conv.timestamp = at;
        self.feed.publish(id, ChangeKind::Updated);
        Ok(())
    }

    /// First phase of a delete. A newer request for the same id
    /// supersedes this token.
    pub fn mark_delete_pending(&mut self, id: &str) -> Result<DeleteToken, StoreError> {
        self.position(id)?;

        let token = DeleteToken::new();
        if let Some(previous) = self.pending_deletes.insert(id.to_string(), token) {
            tracing::debug!("Delete token {} for {} superseded", previous, id);
        }
        Ok(token)
    }

    pub fn is_delete_pending(&self, id: &str) -> bool {
        self.pending_deletes.contains_key(id)
    }

    /// Permanently removes the conversation the token was issued for.
    pub fn confirm_delete(&mut self, token: DeleteToken) -> Result<Conversation, StoreError> {
        let id = self
            .pending_id(token)
            .ok_or(StoreError::StaleToken(token))?;
        self.pending_deletes.remove(&id);

        let idx = self.position(&id)?;
        let removed = self.conversations.remove(idx);
        self.feed.publish(&id, ChangeKind::Removed);

        tracing::info!("Deleted conversation {}", id);
        Ok(removed)
    }

    /// Clears a pending delete. Returns `false` if the token was not pending.
    pub fn cancel_delete(&mut self, token: DeleteToken) -> bool {
        match self.pending_id(token) {
            Some(id) => {
                self.pending_deletes.remove(&id);
                tracing::debug!("Delete of {} cancelled", id);
                true
            }
            None => false,
        }
    }

    fn pending_id(&self, token: DeleteToken) -> Option<String> {
        self.pending_deletes
            .iter()
            .find(|(_, pending)| **pending == token)
            .map(|(id, _)| id.clone())
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.conversations
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn move_to_back(&mut self, idx: usize) {
        self.conversations[idx..].rotate_left(1);
    }

    fn transition(
        &mut self,
        id: &str,
        to: ConversationStatus,
    ) -> Result<ConversationStatus, StoreError> {
        let idx = self.position(id)?;
        let from = self.conversations[idx].status;

        if from != to {
            self.conversations[idx].status = to;
            self.move_to_back(idx);
            self.feed
                .publish(id, ChangeKind::StatusChanged { from, to });
            tracing::debug!("Conversation {} moved {} -> {}", id, from, to);
        }

        Ok(from)
    }
}

impl Default for ConversationListStore {
    fn default() -> Self {
        Self::empty()
    }
}

/// Lazy, restartable filtered view over the store.
#[derive(Debug, Clone)]
pub struct ConversationView<'a> {
    items: &'a [Conversation],
    query: ConversationQuery,
}

impl<'a> ConversationView<'a> {
    pub fn iter(&self) -> ViewIter<'_, 'a> {
        ViewIter {
            inner: self.items.iter(),
            query: &self.query,
        }
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn ids(&self) -> Vec<&'a str> {
        self.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn to_vec(&self) -> Vec<Conversation> {
        self.iter().cloned().collect()
    }
}

impl<'v, 'a> IntoIterator for &'v ConversationView<'a> {
    type Item = &'a Conversation;
    type IntoIter = ViewIter<'v, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct ViewIter<'v, 'a> {
    inner: slice::Iter<'a, Conversation>,
    query: &'v ConversationQuery,
}

impl<'v, 'a> Iterator for ViewIter<'v, 'a> {
    type Item = &'a Conversation;

    fn next(&mut self) -> Option<Self::Item> {
        let query = self.query;
        self.inner.by_ref().find(|c| query.matches(c))
    }
}
