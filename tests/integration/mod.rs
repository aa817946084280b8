// tests/integration/mod.rs

// ============================================
// Re-export commonly used types
// ============================================
pub use std::sync::Arc;
pub use std::time::Duration;

use linguaflow::storage::{share, DemoSeed, SharedConversationStore};
use linguaflow::{ConversationListStore, ConversationStatus, NewConversation};


// ============================================
// Shared Test Helpers
// ============================================

pub fn create_test_conversations() -> Vec<NewConversation> {
    vec![
        NewConversation::new("1", "Conversation au restaurant", "Français")
            .with_flag("🇫🇷")
            .with_status(ConversationStatus::Active),
        NewConversation::new("2", "Job interview practice", "Anglais")
            .with_flag("🇬🇧")
            .with_status(ConversationStatus::Completed),
        NewConversation::new("3", "Réservation d'hôtel", "Français")
            .with_flag("🇫🇷")
            .with_status(ConversationStatus::Archived),
    ]
}

pub fn create_test_store() -> SharedConversationStore {
    share(ConversationListStore::new(create_test_conversations()).unwrap())
}

pub fn create_demo_store() -> SharedConversationStore {
    share(ConversationListStore::new(DemoSeed.conversations()).unwrap())
}
