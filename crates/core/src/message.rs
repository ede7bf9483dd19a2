//! Chat messages and the per-session message log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::menu::MenuItem;

/// Ordinal message identifier, unique within one log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message; immutable once appended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    /// Recommended menu items; never `Some` with an empty list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_items: Option<Vec<MenuItem>>,
    /// Mentor feedback attached to a training reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn new(id: MessageId, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            menu_items: None,
            feedback: None,
            created_at: Utc::now(),
        }
    }

    pub fn history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// A message reduced to what the stateless backend replays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// Ordered message log that always starts with the welcome message
#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: Vec<Message>,
    next_id: u64,
}

impl MessageLog {
    /// Create a log holding only the synthetic welcome message
    pub fn new(welcome: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::new(MessageId(0), Role::Assistant, welcome)],
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &Message {
        let id = self.next_id();
        self.messages.push(Message::new(id, Role::User, content));
        &self.messages[self.messages.len() - 1]
    }

    /// Append an assistant reply. An empty item list is stored as `None`.
    pub fn push_assistant(
        &mut self,
        content: impl Into<String>,
        menu_items: Vec<MenuItem>,
    ) -> &Message {
        let id = self.next_id();
        let mut message = Message::new(id, Role::Assistant, content);
        message.menu_items = (!menu_items.is_empty()).then_some(menu_items);
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Append an assistant reply carrying optional mentor feedback
    pub fn push_assistant_with_feedback(
        &mut self,
        content: impl Into<String>,
        feedback: Option<String>,
    ) -> &Message {
        let id = self.next_id();
        let mut message = Message::new(id, Role::Assistant, content);
        message.feedback = feedback.filter(|f| !f.trim().is_empty());
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Everything after the welcome message, reduced to role/content pairs
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.messages
            .iter()
            .skip(1)
            .map(Message::history_entry)
            .collect()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn welcome(&self) -> &Message {
        &self.messages[0]
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// A log is never empty; it always holds the welcome message
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn user_message_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == Role::User)
            .count()
    }

    /// True until the first exchange is appended
    pub fn only_welcome(&self) -> bool {
        self.messages.len() == 1
    }

    /// Discard the log and start over from a new welcome message
    pub fn reset(&mut self, welcome: impl Into<String>) {
        *self = Self::new(welcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_log_holds_welcome() {
        let log = MessageLog::new("いらっしゃいませ");
        assert_eq!(log.len(), 1);
        assert!(log.only_welcome());
        assert_eq!(log.welcome().role, Role::Assistant);
        assert!(log.history().is_empty());
    }

    #[test]
    fn test_history_excludes_welcome_and_menu_items() {
        let mut log = MessageLog::new("welcome");
        log.push_user("What is good today?");
        log.push_assistant("Try the karaage.", vec![MenuItem::new("Karaage", 8.0)]);

        let history = log.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].content, "Try the karaage.");

        let json = serde_json::to_value(&history).unwrap();
        assert!(json[1].get("menu_items").is_none());
        assert!(json[1].get("id").is_none());
        assert_eq!(json[0]["role"], "user");
    }

    #[test]
    fn test_empty_menu_items_stored_as_none() {
        let mut log = MessageLog::new("welcome");
        let message = log.push_assistant("Hello", Vec::new());
        assert!(message.menu_items.is_none());
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut log = MessageLog::new("welcome");
        let a = log.push_user("a").id;
        let b = log.push_assistant("b", Vec::new()).id;
        assert!(a < b);
        assert_ne!(a, log.welcome().id);
    }

    #[test]
    fn test_feedback_blank_is_dropped() {
        let mut log = MessageLog::new("welcome");
        let message = log.push_assistant_with_feedback("Sure!", Some("  ".to_string()));
        assert!(message.feedback.is_none());
        let message =
            log.push_assistant_with_feedback("Thanks", Some("もっと笑顔で".to_string()));
        assert_eq!(message.feedback.as_deref(), Some("もっと笑顔で"));
    }

    #[test]
    fn test_reset_and_user_count() {
        let mut log = MessageLog::new("welcome");
        log.push_user("one");
        log.push_assistant("reply", Vec::new());
        log.push_user("two");
        assert_eq!(log.user_message_count(), 2);

        log.reset("welcome again");
        assert!(log.only_welcome());
        assert_eq!(log.welcome().content, "welcome again");
        assert_eq!(log.user_message_count(), 0);
    }
}
