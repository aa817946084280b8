pub mod conversation;
pub mod relative_time;

pub use conversation::{
    Conversation, ConversationQuery, ConversationStatus, NewConversation, ParseStatusError,
    StatusCounts, StatusFilter,
};
pub use relative_time::format_relative;
