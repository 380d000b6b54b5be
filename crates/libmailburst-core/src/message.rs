//! Static test-fixture messages

use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::Message;

use crate::config::TestConfig;
use crate::error::Result;

/// One test email. Content is fixture data, numbered per message so runs
/// are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl TestMessage {
    /// Render into an RFC 5322 message (multipart/alternative with plain
    /// and HTML parts) for the given sender.
    pub fn to_email(&self, from: &Mailbox) -> Result<Message> {
        let body = MultiPart::alternative()
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_PLAIN)
                    .body(self.text_body.clone()),
            )
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_HTML)
                    .body(self.html_body.clone()),
            );

        let email = Message::builder()
            .from(from.clone())
            .to(self.to.parse()?)
            .subject(self.subject.clone())
            .multipart(body)?;

        Ok(email)
    }
}

/// Generate the numbered fixture set for a run, one message per attempt,
/// all addressed to the configured recipient.
pub fn fixture_messages(config: &TestConfig) -> Vec<TestMessage> {
    (1..=config.total_messages)
        .map(|i| TestMessage {
            to: config.recipient_address.clone(),
            subject: format!("Test Email {i}"),
            text_body: format!("This is test email {i} plain text content"),
            html_body: format!(
                "<html><body><h1>Test Email {i}</h1><p>This is the HTML content.</p></body></html>"
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BurstError;

    fn sender() -> Mailbox {
        "Mailburst <mailburst@example.com>".parse().unwrap()
    }

    #[test]
    fn fixtures_are_numbered_from_one() {
        let config = TestConfig {
            total_messages: 3,
            ..TestConfig::default()
        };
        let messages = fixture_messages(&config);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].subject, "Test Email 1");
        assert_eq!(messages[2].subject, "Test Email 3");
        assert!(messages
            .iter()
            .all(|m| m.to == config.recipient_address));
    }

    #[test]
    fn zero_messages_yields_empty_fixture_set() {
        let config = TestConfig {
            total_messages: 0,
            ..TestConfig::default()
        };
        assert!(fixture_messages(&config).is_empty());
    }

    #[test]
    fn fixture_renders_to_email() {
        let config = TestConfig {
            total_messages: 1,
            ..TestConfig::default()
        };
        let messages = fixture_messages(&config);
        let email = messages[0].to_email(&sender()).unwrap();
        let rendered = String::from_utf8(email.formatted()).unwrap();
        assert!(rendered.contains("Subject: Test Email 1"));
        assert!(rendered.contains("multipart/alternative"));
    }

    #[test]
    fn invalid_recipient_is_an_address_error() {
        let message = TestMessage {
            to: "not an address".into(),
            subject: "Test Email 1".into(),
            text_body: String::new(),
            html_body: String::new(),
        };
        assert!(matches!(
            message.to_email(&sender()),
            Err(BurstError::Address(_))
        ));
    }
}
