//! Core library for mailburst: configuration, test-fixture messages, the
//! SMTP mailer, the concurrent batch dispatcher, and run statistics.
//!
//! The binary crate (`mailburst`) wires these together: it resolves a
//! [`config::RunConfig`] from the environment, connects a
//! [`mailer::SmtpMailer`], and hands both to a
//! [`dispatcher::BatchDispatcher`] which produces a
//! [`summary::RunSummary`] for reporting.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod mailer;
pub mod message;
pub mod summary;

pub use config::{RunConfig, SmtpSettings, TestConfig};
pub use dispatcher::BatchDispatcher;
pub use error::{BurstError, Result};
pub use mailer::{Mailer, SmtpMailer};
pub use message::TestMessage;
pub use summary::{LatencyStats, RunSummary, SendResult};
