//! mailburst - SMTP throughput benchmark against the SparkPost gateway
//!
//! One invocation, no arguments. Test parameters are compiled in;
//! credentials and addresses come from the environment (or a `.env`
//! file). The run completes with exit code 0 even when individual sends
//! fail; only fatal configuration or setup errors are non-zero.

mod report;

use libmailburst_core::message::fixture_messages;
use libmailburst_core::{BatchDispatcher, Result, RunConfig, SmtpMailer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    // A .env file is optional; the real environment always wins.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let config = RunConfig::from_env()?;
    let messages = fixture_messages(&config.test);
    info!(
        gateway = %config.smtp.host,
        total = messages.len(),
        batch_size = config.test.batch_size,
        concurrency = config.test.concurrency,
        "mailburst starting"
    );

    let mailer = SmtpMailer::connect(&config.smtp, &config.test.sender_address)?;
    let summary = BatchDispatcher::new(mailer).run(&config.test, &messages);

    report::print_summary(&config.test, &summary);
    if let Some(path) = &config.test.json_report_path {
        report::write_json_report(path, &summary)?;
    }

    Ok(())
}
