//! Run configuration
//!
//! All configuration is resolved once at startup into plain structs and
//! passed by reference from there on; nothing reads the environment after
//! [`RunConfig::from_env`] returns.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{BurstError, Result};

/// SparkPost SMTP gateway host.
pub const SPARKPOST_HOST: &str = "smtp.sparkpostmail.com";
/// STARTTLS submission port.
pub const SPARKPOST_SUBMISSION_PORT: u16 = 587;
/// SparkPost uses a fixed SMTP username; the API key is the password.
pub const SPARKPOST_SMTP_USER: &str = "SMTP_Injection";

/// Test parameters are compiled in, not passed as flags.
pub const DEFAULT_TOTAL_MESSAGES: usize = 100;
pub const DEFAULT_BATCH_SIZE: usize = 25;
pub const DEFAULT_CONCURRENCY: usize = 10;

const DEFAULT_SENDER: &str = "mailburst@example.com";
// SparkPost sink domain: accepted and discarded, never delivered.
const DEFAULT_RECIPIENT: &str = "recipient@example.com.sink.sparkpostmail.com";

/// Connection settings for the SMTP gateway.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub api_key: String,
    /// I/O timeout applied to each SMTP connection.
    pub timeout: Duration,
    /// Upper bound on pooled connections; session reuse across messages is
    /// handled entirely by the transport's pool.
    pub pool_max_size: u32,
}

impl SmtpSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            host: SPARKPOST_HOST.to_string(),
            port: SPARKPOST_SUBMISSION_PORT,
            username: SPARKPOST_SMTP_USER.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(60),
            pool_max_size: DEFAULT_CONCURRENCY as u32,
        }
    }
}

/// Parameters for one benchmark run. Immutable for its duration.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub total_messages: usize,
    /// Messages dispatched together before the next group starts.
    pub batch_size: usize,
    /// Maximum simultaneous sends within a batch.
    pub concurrency: usize,
    pub sender_address: String,
    pub recipient_address: String,
    /// When set, the finished summary is also written here as JSON.
    pub json_report_path: Option<PathBuf>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            total_messages: DEFAULT_TOTAL_MESSAGES,
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            sender_address: DEFAULT_SENDER.to_string(),
            recipient_address: DEFAULT_RECIPIENT.to_string(),
            json_report_path: None,
        }
    }
}

impl TestConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(BurstError::Config("batch_size must be at least 1".into()));
        }
        if self.concurrency == 0 {
            return Err(BurstError::Config("concurrency must be at least 1".into()));
        }
        if self.sender_address.is_empty() {
            return Err(BurstError::Config("sender address must not be empty".into()));
        }
        if self.recipient_address.is_empty() {
            return Err(BurstError::Config("recipient address must not be empty".into()));
        }
        Ok(())
    }

    /// Number of batches this run will dispatch.
    pub fn batch_count(&self) -> usize {
        self.total_messages.div_ceil(self.batch_size)
    }
}

/// Everything the binary needs for one run, resolved from the environment.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub smtp: SmtpSettings,
    pub test: TestConfig,
}

impl RunConfig {
    /// Resolve from the process environment.
    ///
    /// `SPARKPOST_API_KEY` is required; `MAILBURST_FROM`, `MAILBURST_TO` and
    /// `MAILBURST_JSON_REPORT` are optional overrides.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve from an arbitrary variable lookup. Split out from
    /// [`Self::from_env`] so tests can drive it without touching
    /// process-global state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("SPARKPOST_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                BurstError::Config("SPARKPOST_API_KEY environment variable not set".into())
            })?;

        let mut test = TestConfig::default();
        if let Some(from) = lookup("MAILBURST_FROM") {
            test.sender_address = from;
        }
        if let Some(to) = lookup("MAILBURST_TO") {
            test.recipient_address = to;
        }
        test.json_report_path = lookup("MAILBURST_JSON_REPORT").map(PathBuf::from);
        test.validate()?;

        let mut smtp = SmtpSettings::new(api_key);
        smtp.pool_max_size = test.concurrency as u32;

        Ok(Self { smtp, test })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn default_config_is_valid() {
        assert!(TestConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let config = TestConfig {
            batch_size: 0,
            ..TestConfig::default()
        };
        assert!(matches!(config.validate(), Err(BurstError::Config(_))));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let config = TestConfig {
            concurrency: 0,
            ..TestConfig::default()
        };
        assert!(matches!(config.validate(), Err(BurstError::Config(_))));
    }

    #[test]
    fn batch_count_rounds_up() {
        let config = TestConfig {
            total_messages: 10,
            batch_size: 3,
            ..TestConfig::default()
        };
        assert_eq!(config.batch_count(), 4);

        let empty = TestConfig {
            total_messages: 0,
            ..TestConfig::default()
        };
        assert_eq!(empty.batch_count(), 0);
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let result = RunConfig::from_lookup(lookup_from(&[]));
        match result {
            Err(BurstError::Config(msg)) => assert!(msg.contains("SPARKPOST_API_KEY")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn empty_api_key_is_a_config_error() {
        let result = RunConfig::from_lookup(lookup_from(&[("SPARKPOST_API_KEY", "")]));
        assert!(matches!(result, Err(BurstError::Config(_))));
    }

    #[test]
    fn env_overrides_are_applied() {
        let config = RunConfig::from_lookup(lookup_from(&[
            ("SPARKPOST_API_KEY", "key-123"),
            ("MAILBURST_FROM", "sender@verified.example"),
            ("MAILBURST_TO", "sink@example.test"),
            ("MAILBURST_JSON_REPORT", "/tmp/report.json"),
        ]))
        .unwrap();

        assert_eq!(config.smtp.api_key, "key-123");
        assert_eq!(config.smtp.host, SPARKPOST_HOST);
        assert_eq!(config.smtp.username, SPARKPOST_SMTP_USER);
        assert_eq!(config.test.sender_address, "sender@verified.example");
        assert_eq!(config.test.recipient_address, "sink@example.test");
        assert_eq!(
            config.test.json_report_path.as_deref(),
            Some(std::path::Path::new("/tmp/report.json"))
        );
    }

    #[test]
    fn pool_is_sized_to_concurrency() {
        let config = RunConfig::from_lookup(lookup_from(&[("SPARKPOST_API_KEY", "k")])).unwrap();
        assert_eq!(config.smtp.pool_max_size, config.test.concurrency as u32);
    }
}
