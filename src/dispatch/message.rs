//! Notification message formatting.

use handlebars::Handlebars;
use serde::{Deserialize, Serialize};

use crate::event::Subject;

/// Default Handlebars template for the notification body.
///
/// Available variables: `{{group}}` (owning group id), `{{title}}`
/// (subject display name).
pub const DEFAULT_BODY_TEMPLATE: &str = "🟢 New entry from @{{group}}\n\n";

/// Fixed query annotation appended to the subject link.
const LINK_QUERY: &str = "app=inbox";

/// Payload shape delivered to the push gateway.
///
/// Serializes with the exact JSON keys the gateway expects, including
/// `type` for the notification-type label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Target URL opened from the notification.
    pub url: String,
    /// Icon URL.
    pub icon: String,
    /// Notification-type label.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Template data for rendering the notification body.
#[derive(Serialize)]
struct BodyData<'a> {
    group: &'a str,
    title: &'a str,
}

/// Deterministic formatter from a subject to its notification message.
///
/// The body template is Handlebars and validated by the configuration
/// layer; everything else is a direct field mapping, so formatting the
/// same subject always yields the same message.
#[derive(Debug, Clone)]
pub struct MessageFormat {
    notification_type: String,
    body_template: String,
}

impl MessageFormat {
    /// Creates a formatter with the default body template.
    #[must_use]
    pub fn new(notification_type: impl Into<String>) -> Self {
        Self {
            notification_type: notification_type.into(),
            body_template: DEFAULT_BODY_TEMPLATE.to_string(),
        }
    }

    /// Overrides the body template (Handlebars syntax).
    #[must_use]
    pub fn with_body_template(mut self, template: impl Into<String>) -> Self {
        self.body_template = template.into();
        self
    }

    /// Builds the notification message for a subject.
    #[must_use]
    pub fn format(&self, subject: &Subject) -> NotificationMessage {
        NotificationMessage {
            title: subject.display_name.clone(),
            body: self.render_body(subject),
            url: annotated_link(&subject.link),
            icon: subject.icon_url.clone(),
            kind: self.notification_type.clone(),
        }
    }

    /// Renders the body template for a subject.
    fn render_body(&self, subject: &Subject) -> String {
        let data = BodyData {
            group: &subject.owner_group_id,
            title: &subject.display_name,
        };

        match Handlebars::new().render_template(&self.body_template, &data) {
            Ok(body) => body,
            Err(e) => {
                // The template was validated at startup, so this only
                // triggers on helpers failing at render time.
                tracing::warn!("Body template render failed: {e}");
                format!("New entry from @{}\n\n", subject.owner_group_id)
            }
        }
    }
}

/// Appends the fixed query annotation to the subject link.
fn annotated_link(link: &str) -> String {
    let separator = if link.contains('?') { '&' } else { '?' };
    format!("{link}{separator}{LINK_QUERY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_subject() -> Subject {
        Subject {
            id: "s1".to_string(),
            owner_group_id: "demo.group".to_string(),
            display_name: "First entry".to_string(),
            link: "https://example.com/s1".to_string(),
            icon_url: "https://example.com/icon.png".to_string(),
        }
    }

    #[test]
    fn format_maps_subject_fields() {
        let message = MessageFormat::new("entry_created").format(&test_subject());

        assert_eq!(message.title, "First entry");
        assert_eq!(message.body, "🟢 New entry from @demo.group\n\n");
        assert_eq!(message.url, "https://example.com/s1?app=inbox");
        assert_eq!(message.icon, "https://example.com/icon.png");
        assert_eq!(message.kind, "entry_created");
    }

    #[test]
    fn format_is_deterministic() {
        let format = MessageFormat::new("entry_created");
        let subject = test_subject();

        assert_eq!(format.format(&subject), format.format(&subject));
    }

    #[test]
    fn link_with_existing_query_appends_with_ampersand() {
        let mut subject = test_subject();
        subject.link = "https://example.com/s1?tab=details".to_string();

        let message = MessageFormat::new("entry_created").format(&subject);

        assert_eq!(message.url, "https://example.com/s1?tab=details&app=inbox");
    }

    #[test]
    fn custom_body_template_renders_variables() {
        let message = MessageFormat::new("entry_created")
            .with_body_template("{{title}} was created in {{group}}")
            .format(&test_subject());

        assert_eq!(message.body, "First entry was created in demo.group");
    }

    #[test]
    fn message_serializes_type_key() {
        let message = MessageFormat::new("entry_created").format(&test_subject());
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["type"], "entry_created");
        assert!(json.get("kind").is_none());
    }
}
