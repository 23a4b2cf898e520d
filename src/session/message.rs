use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::GREETING_MESSAGE_ID;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => f.write_str("user"),
            Sender::Bot => f.write_str("bot"),
        }
    }
}

/// One entry of the conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// The synthetic greeting shown when there is no stored history
    pub fn greeting(content: impl Into<String>) -> Self {
        Self {
            id: GREETING_MESSAGE_ID.to_string(),
            content: content.into(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
        }
    }

    pub fn is_greeting(&self) -> bool {
        self.id == GREETING_MESSAGE_ID
    }
}

/// Issues timestamp-derived ids that never repeat within a session
///
/// Ids are millisecond Unix timestamps. When the clock has not moved past
/// the last issued id, the next id is `last + 1`, so two messages created
/// in the same tick still sort in insertion order.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: i64,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue after the highest numeric id found in a hydrated log
    pub fn seeded_from(messages: &[Message]) -> Self {
        let last = messages
            .iter()
            .filter_map(|m| m.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        Self { last }
    }

    pub fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let candidate = now.timestamp_millis();
        self.last = candidate.max(self.last + 1);
        self.last.to_string()
    }

    /// Build a message stamped with the current time
    pub fn message(&mut self, sender: Sender, content: impl Into<String>) -> Message {
        let timestamp = Utc::now();
        Message {
            id: self.next_id(timestamp),
            content: content.into(),
            sender,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ids_increase_within_one_tick() {
        let mut ids = MessageIdGenerator::new();
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        let first = ids.next_id(now);
        let second = ids.next_id(now);
        let third = ids.next_id(now);

        assert_eq!(first, "1700000000000");
        assert_eq!(second, "1700000000001");
        assert_eq!(third, "1700000000002");
    }

    #[test]
    fn test_ids_follow_clock_when_it_advances() {
        let mut ids = MessageIdGenerator::new();
        ids.next_id(Utc.timestamp_millis_opt(1_000).unwrap());
        let later = ids.next_id(Utc.timestamp_millis_opt(5_000).unwrap());
        assert_eq!(later, "5000");
    }

    #[test]
    fn test_seeded_generator_skips_past_hydrated_ids() {
        let now = Utc::now();
        let future_id = (now.timestamp_millis() + 60_000).to_string();
        let stored = vec![
            Message::greeting("Hi"),
            Message {
                id: future_id.clone(),
                content: "from another clock".to_string(),
                sender: Sender::User,
                timestamp: now,
            },
        ];

        let mut ids = MessageIdGenerator::seeded_from(&stored);
        let next: i64 = ids.next_id(now).parse().unwrap();
        assert!(next > future_id.parse::<i64>().unwrap());
    }

    #[test]
    fn test_sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn test_greeting_message_shape() {
        let greeting = Message::greeting("Hi!");
        assert!(greeting.is_greeting());
        assert_eq!(greeting.sender, Sender::Bot);
        assert_eq!(greeting.content, "Hi!");
    }
}
