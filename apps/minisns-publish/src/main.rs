//! minisns-publish - publish messages to an SNS topic from the command line.
//!
//! # Usage
//!
//! ```text
//! minisns-publish --topic arn:aws:sns:us-east-1:000000000000:orders "Hello World!"
//! seq 1 25 | minisns-publish --batch --topic arn:aws:sns:us-east-1:000000000000:orders
//! ```
//!
//! The result is printed to stdout as JSON.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AWS_REGION` / `AWS_DEFAULT_REGION` | `us-east-1` | Signing region |
//! | `SNS_ENDPOINT_URL` / `AWS_ENDPOINT_URL_SNS` | *(regional AWS endpoint)* | Endpoint override, e.g. LocalStack |
//! | `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN` | *(required)* | Credentials |
//! | `LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod args;

use anyhow::{Context, Result};
use minisns_core::{SnsClient, SnsClientConfig};
use minisns_model::PublishBatchRequest;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::{BatchTemplate, Command, USAGE, parse_args};

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `log_level`.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn log_level() -> String {
    std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_owned())
}

/// Read non-empty stdin lines into batch entries.
async fn read_batch(template: &BatchTemplate) -> Result<PublishBatchRequest> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut entries = Vec::new();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim_end();
        if !line.is_empty() {
            entries.push(template.entry(line));
        }
    }
    Ok(PublishBatchRequest::new(template.topic_arn.clone(), entries))
}

async fn run(client: &SnsClient, command: Command) -> Result<String> {
    match command {
        Command::Publish(request) => {
            let response = client.publish_message(&request).await?;
            info!(message_id = %response.message_id, "published message");
            Ok(serde_json::to_string_pretty(&response)?)
        }
        Command::Batch(template) => {
            let request = read_batch(&template).await?;
            info!(entries = request.entries.len(), topic = %request.topic_arn, "publishing batch");
            let response = client.publish_message_batch(request).await?;
            info!(
                successful = response.successful_count(),
                failed = response.failed_count(),
                "published batch"
            );
            Ok(serde_json::to_string_pretty(&response)?)
        }
        Command::Help => Ok(USAGE.to_owned()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(&log_level())?;

    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {err:#}\n\n{USAGE}");
            std::process::exit(2);
        }
    };
    if command == Command::Help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = SnsClientConfig::from_env();
    let client = SnsClient::new(config).context("failed to create SNS client")?;
    let result = run(&client, command).await;
    client.destroy(true).await;

    println!("{}", result?);
    Ok(())
}
