use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storage::store::ConversationListStore;

/// The store behind a lock, for handlers running on a multi-threaded runtime.
/// Every mutation takes the write lock, so mutations never interleave.
pub type SharedConversationStore = Arc<RwLock<ConversationListStore>>;

pub fn share(store: ConversationListStore) -> SharedConversationStore {
    Arc::new(RwLock::new(store))
}
