//! LinguaFlow - conversation list core

pub mod cli;
pub mod config;
pub mod models;
pub mod services;
pub mod storage;

// Re-export main types for convenience
pub use crate::config::Config;
pub use crate::models::{
    Conversation, ConversationQuery, ConversationStatus, NewConversation, StatusCounts,
    StatusFilter,
};
pub use crate::services::{ArchiveUndoService, UndoHandle, UndoWindow};
pub use crate::storage::{
    ChangeKind, ConversationChange, ConversationListStore, DeleteToken, SharedConversationStore,
    StoreError,
};
