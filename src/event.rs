//! Domain records consumed by the notification pipeline.
//!
//! Events and subjects are supplied by external collaborators (the
//! event source and subscriber store) and are read-only here. The wire
//! forms match the payloads those collaborators produce and the raw
//! JSON delivered to webhook subscribers.

use serde::{Deserialize, Serialize};

/// Wire form of the entry-creation event kind.
pub const SUBJECT_START: &str = "subject/start";

/// Kind of an externally-observed event.
///
/// Only [`EventKind::SubjectStart`] triggers push notification; every
/// other kind passes through the pipeline as a no-op. Unknown kinds
/// round-trip unchanged so webhook subscribers still receive them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    /// A new entry was created.
    SubjectStart,
    /// Any other event kind, preserved verbatim.
    Other(String),
}

impl EventKind {
    /// Returns true for the entry-creation kind.
    #[must_use]
    pub const fn is_subject_start(&self) -> bool {
        matches!(self, Self::SubjectStart)
    }

    /// Returns the wire form of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SubjectStart => SUBJECT_START,
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for EventKind {
    fn from(kind: String) -> Self {
        if kind == SUBJECT_START {
            Self::SubjectStart
        } else {
            Self::Other(kind)
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::SubjectStart => SUBJECT_START.to_string(),
            EventKind::Other(kind) => kind,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An externally-observed event, immutable once received.
///
/// Serializes to the raw JSON payload delivered to webhook subscribers:
/// `{"id", "event", "subject", "expire"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Opaque event identifier.
    pub id: String,

    /// Event kind; only `subject/start` triggers push notification.
    #[serde(rename = "event")]
    pub kind: EventKind,

    /// Identifier of the subject the event concerns.
    #[serde(rename = "subject")]
    pub subject_id: String,

    /// Unix timestamp after which the event is stale.
    pub expire: i64,
}

/// The domain entity whose creation triggered the event.
///
/// Supplied by the caller together with the event; read-only to the
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Subject identifier.
    pub id: String,

    /// Identifier of the group that owns the subject. Empty means the
    /// subject has no owning group and nothing is notified.
    pub owner_group_id: String,

    /// Human-readable name, used as the notification title.
    pub display_name: String,

    /// Link to the subject, used as the notification target URL.
    pub link: String,

    /// Icon URL, used as the notification icon.
    pub icon_url: String,
}

impl Subject {
    /// Returns the owning group identifier, or `None` when the subject
    /// carries no owning group identity.
    #[must_use]
    pub fn owning_group(&self) -> Option<&str> {
        if self.owner_group_id.is_empty() {
            None
        } else {
            Some(&self.owner_group_id)
        }
    }
}

/// One full dispatch input as consumed from collaborators: the event,
/// its subject, and the internally-known subscriber list for the
/// subject's owning group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    /// The triggering event.
    pub event: Event,

    /// The subject the event concerns.
    pub subject: Subject,

    /// Internal-form recipient identifiers.
    #[serde(default)]
    pub recipients: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> Event {
        Event {
            id: "subject/0x38c654c0f81b63ea1839ec3b221fad6e".to_string(),
            kind: EventKind::SubjectStart,
            subject_id: "demo.group".to_string(),
            expire: 1_647_343_155,
        }
    }

    #[test]
    fn kind_parses_subject_start() {
        let kind: EventKind = "subject/start".to_string().into();
        assert_eq!(kind, EventKind::SubjectStart);
        assert!(kind.is_subject_start());
    }

    #[test]
    fn kind_round_trips_unknown_values() {
        let kind: EventKind = "subject/end".to_string().into();
        assert_eq!(kind, EventKind::Other("subject/end".to_string()));
        assert!(!kind.is_subject_start());
        assert_eq!(String::from(kind), "subject/end");
    }

    #[test]
    fn event_serializes_with_wire_keys() {
        let json = serde_json::to_value(sample_event()).unwrap();

        assert_eq!(json["event"], "subject/start");
        assert_eq!(json["subject"], "demo.group");
        assert_eq!(json["expire"], 1_647_343_155);
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn event_deserializes_from_wire_form() {
        let event: Event = serde_json::from_str(
            r#"{"id":"e1","event":"subject/delete","subject":"g1","expire":0}"#,
        )
        .unwrap();

        assert_eq!(event.kind, EventKind::Other("subject/delete".to_string()));
        assert_eq!(event.subject_id, "g1");
    }

    #[test]
    fn owning_group_empty_is_none() {
        let subject = Subject {
            id: "s1".to_string(),
            owner_group_id: String::new(),
            display_name: "First entry".to_string(),
            link: "https://example.com/s1".to_string(),
            icon_url: "https://example.com/icon.png".to_string(),
        };

        assert!(subject.owning_group().is_none());
    }

    #[test]
    fn dispatch_request_recipients_default_to_empty() {
        let request: DispatchRequest = serde_json::from_value(serde_json::json!({
            "event": serde_json::to_value(sample_event()).unwrap(),
            "subject": {
                "id": "s1",
                "owner_group_id": "g1",
                "display_name": "First entry",
                "link": "https://example.com/s1",
                "icon_url": "https://example.com/icon.png"
            }
        }))
        .unwrap();

        assert!(request.recipients.is_empty());
    }
}
