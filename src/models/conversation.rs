use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a conversation. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Completed,
    Archived,
}

impl ConversationStatus {
    pub const ALL: [ConversationStatus; 3] = [
        ConversationStatus::Active,
        ConversationStatus::Completed,
        ConversationStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStatus::Active => "active",
            ConversationStatus::Completed => "completed",
            ConversationStatus::Archived => "archived",
        }
    }

    /// Label shown in the status menu and list badges.
    pub fn label(&self) -> &'static str {
        match self {
            ConversationStatus::Active => "En cours",
            ConversationStatus::Completed => "Terminée",
            ConversationStatus::Archived => "Archivée",
        }
    }
}

impl fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown conversation status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for ConversationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ConversationStatus::Active),
            "completed" => Ok(ConversationStatus::Completed),
            "archived" => Ok(ConversationStatus::Archived),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Status side of a list query: everything, or a single status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ConversationStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: ConversationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl From<ConversationStatus> for StatusFilter {
    fn from(status: ConversationStatus) -> Self {
        StatusFilter::Only(status)
    }
}

impl FromStr for StatusFilter {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => status.fmt(f),
        }
    }
}

/// One chat session as shown in the sidebar, dashboard and history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub language: String,
    pub language_flag: String,
    #[serde(default)]
    pub last_message: String,
    pub timestamp: DateTime<Utc>,
    pub status: ConversationStatus,
}

impl Conversation {
    /// Archived conversations no longer accept new messages.
    pub fn is_read_only(&self) -> bool {
        self.status == ConversationStatus::Archived
    }
}

/// Input for appending a conversation to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConversation {
    pub id: String,
    pub title: String,
    pub language: String,
    #[serde(default)]
    pub language_flag: String,
    #[serde(default)]
    pub last_message: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub status: Option<ConversationStatus>,
}

impl NewConversation {
    pub fn new(id: impl Into<String>, title: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            language: language.into(),
            language_flag: String::new(),
            last_message: String::new(),
            timestamp: None,
            status: None,
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.language_flag = flag.into();
        self
    }

    pub fn with_last_message(mut self, message: impl Into<String>) -> Self {
        self.last_message = message.into();
        self
    }

    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at);
        self
    }

    pub fn with_status(mut self, status: ConversationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub(crate) fn into_conversation(self, now: DateTime<Utc>) -> Conversation {
        Conversation {
            id: self.id,
            title: self.title,
            language: self.language,
            language_flag: self.language_flag,
            last_message: self.last_message,
            timestamp: self.timestamp.unwrap_or(now),
            status: self.status.unwrap_or(ConversationStatus::Active),
        }
    }
}

impl From<Conversation> for NewConversation {
    fn from(conv: Conversation) -> Self {
        Self {
            id: conv.id,
            title: conv.title,
            language: conv.language,
            language_flag: conv.language_flag,
            last_message: conv.last_message,
            timestamp: Some(conv.timestamp),
            status: Some(conv.status),
        }
    }
}

/// Full query used by the history page. `list` is this with no language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationQuery {
    pub text: String,
    pub status: StatusFilter,
    pub language: Option<String>,
}

impl ConversationQuery {
    pub fn new(text: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            text: text.into(),
            status,
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn matches(&self, conv: &Conversation) -> bool {
        if !self.status.matches(conv.status) {
            return false;
        }

        if let Some(ref language) = self.language {
            if conv.language.to_lowercase() != language.to_lowercase() {
                return false;
            }
        }

        if self.text.is_empty() {
            return true;
        }

        let needle = self.text.to_lowercase();
        conv.title.to_lowercase().contains(&needle) || conv.language.to_lowercase().contains(&needle)
    }
}

/// Per-status totals for the dashboard header and collapsed sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub active: usize,
    pub completed: usize,
    pub archived: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.active + self.completed + self.archived
    }

    pub fn get(&self, status: ConversationStatus) -> usize {
        match status {
            ConversationStatus::Active => self.active,
            ConversationStatus::Completed => self.completed,
            ConversationStatus::Archived => self.archived,
        }
    }

    pub(crate) fn bump(&mut self, status: ConversationStatus) {
        match status {
            ConversationStatus::Active => self.active += 1,
            ConversationStatus::Completed => self.completed += 1,
            ConversationStatus::Archived => self.archived += 1,
        }
    }
}
