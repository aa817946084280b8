pub mod events;
pub mod seed;
pub mod shared;
pub mod store;


pub use events::{ChangeFeed, ChangeKind, ConversationChange};
pub use seed::{load_store, DemoSeed, JsonSeedFile, SeedError, SeedSource};
pub use shared::{share, SharedConversationStore};
pub use store::{ConversationListStore, ConversationView, DeleteToken, StoreError};
