//! SMTP delivery seam

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::PoolConfig;
use lettre::{SmtpTransport, Transport};
use tracing::debug;

use crate::config::SmtpSettings;
use crate::error::{BurstError, Result};
use crate::message::TestMessage;

/// Seam between the dispatcher and the network. Workers share one mailer
/// across threads, so implementors must be `Send + Sync`.
pub trait Mailer: Send + Sync {
    fn send(&self, message: &TestMessage) -> Result<()>;
}

impl<M: Mailer> Mailer for &M {
    fn send(&self, message: &TestMessage) -> Result<()> {
        (**self).send(message)
    }
}

/// Mailer backed by a pooled STARTTLS connection to the SparkPost gateway.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the transport and probe the gateway once, so an unreachable
    /// host or rejected credentials fail before any batch starts.
    pub fn connect(settings: &SmtpSettings, sender_address: &str) -> Result<Self> {
        let from: Mailbox = sender_address.parse()?;
        let credentials = Credentials::new(settings.username.clone(), settings.api_key.clone());

        let transport = SmtpTransport::starttls_relay(&settings.host)?
            .port(settings.port)
            .credentials(credentials)
            .timeout(Some(settings.timeout))
            .pool_config(PoolConfig::new().max_size(settings.pool_max_size))
            .build();

        if !transport.test_connection()? {
            return Err(BurstError::Setup(format!(
                "SMTP gateway {}:{} rejected the connection probe",
                settings.host, settings.port
            )));
        }
        debug!(host = %settings.host, port = settings.port, "SMTP transport ready");

        Ok(Self { transport, from })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, message: &TestMessage) -> Result<()> {
        let email = message.to_email(&self.from)?;
        self.transport.send(&email)?;
        Ok(())
    }
}
