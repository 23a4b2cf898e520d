use tracing::warn;

use crate::session::Message;
use crate::utils::WidgetError;

/// Serialize a log into the stored JSON layout
pub fn encode_log(messages: &[Message]) -> Result<String, WidgetError> {
    Ok(serde_json::to_string(messages)?)
}

/// Parse a stored log, discarding anything that is not a usable history
pub fn decode_log(raw: &str) -> Option<Vec<Message>> {
    let messages: Vec<Message> = match serde_json::from_str(raw) {
        Ok(messages) => messages,
        Err(e) => {
            warn!(error = %e, "discarding unparseable stored messages");
            return None;
        }
    };

    if messages.is_empty() {
        return None;
    }

    if messages.iter().any(|m| m.content.trim().is_empty()) {
        warn!("discarding stored messages with empty content");
        return None;
    }

    Some(messages)
}

/// The most recent `max` entries, oldest first
pub fn retained_tail(messages: &[Message], max: usize) -> &[Message] {
    let start = messages.len().saturating_sub(max);
    &messages[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MessageIdGenerator, Sender};
    use pretty_assertions::assert_eq;

    fn log_of(n: usize) -> Vec<Message> {
        let mut ids = MessageIdGenerator::new();
        (0..n)
            .map(|i| ids.message(Sender::User, format!("message {}", i)))
            .collect()
    }

    #[test]
    fn test_round_trip_preserves_fields_and_order() {
        let mut ids = MessageIdGenerator::new();
        let log = vec![
            Message::greeting("Hi!"),
            ids.message(Sender::User, "Hello"),
            ids.message(Sender::Bot, "Hey, what can I do?"),
        ];

        let raw = encode_log(&log).unwrap();
        let decoded = decode_log(&raw).unwrap();

        assert_eq!(decoded, log);
    }

    #[test]
    fn test_stored_layout_uses_plain_fields() {
        let raw = r#"[{"id":"greeting","content":"Hi","sender":"bot","timestamp":"2024-05-01T12:00:00.000Z","isTyping":false}]"#;
        let decoded = decode_log(raw).unwrap();
        assert_eq!(decoded.len(), 1);
        assert!(decoded[0].is_greeting());
        assert_eq!(decoded[0].sender, Sender::Bot);
        assert_eq!(decoded[0].timestamp.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn test_corrupt_data_is_discarded() {
        assert!(decode_log("{not json").is_none());
        assert!(decode_log(r#"{"id":"1"}"#).is_none());
        assert!(decode_log(r#"[{"id":"1","content":"x","sender":"robot","timestamp":"2024-05-01T12:00:00Z"}]"#).is_none());
        assert!(decode_log(r#"[{"id":"1","content":"x","sender":"bot","timestamp":"yesterday"}]"#).is_none());
    }

    #[test]
    fn test_empty_log_and_empty_content_count_as_absent() {
        assert!(decode_log("[]").is_none());
        assert!(decode_log(r#"[{"id":"1","content":"  ","sender":"user","timestamp":"2024-05-01T12:00:00Z"}]"#).is_none());
    }

    #[test]
    fn test_retained_tail_keeps_most_recent() {
        let log = log_of(8);
        let tail = retained_tail(&log, 5);

        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0].content, "message 3");
        assert_eq!(tail[4].content, "message 7");
    }

    #[test]
    fn test_retained_tail_shorter_than_bound() {
        let log = log_of(3);
        assert_eq!(retained_tail(&log, 5).len(), 3);
    }
}
