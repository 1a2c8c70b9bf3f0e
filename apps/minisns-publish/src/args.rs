//! Command-line argument parsing.

use anyhow::{Context, Result, bail};
use minisns_model::{
    MessageAttributeValue, MessageAttributes, PublishBatchRequestEntry, PublishRequest,
};

/// Usage text printed for `--help` and argument errors.
pub const USAGE: &str = "\
Usage:
  minisns-publish --topic <arn> [options] <message>
  minisns-publish --batch --topic <arn> [options] < messages.txt

Destination (exactly one for a single publish):
  --topic <arn>           Topic ARN
  --target <arn>          Platform endpoint ARN
  --phone <number>        E.164 phone number

Options:
  --batch                 Publish every non-empty stdin line, in chunks of ten
  --subject <text>        Message subject
  --structure <value>     Message structure, e.g. json
  --group-id <id>         FIFO message group
  --dedup-id <id>         FIFO deduplication id (single publish only)
  --attr <name=value>     String attribute, repeatable
  --number-attr <name=n>  Number attribute, repeatable
  -h, --help              Show this help";

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Publish one message.
    Publish(PublishRequest),
    /// Publish stdin lines as a batch.
    Batch(BatchTemplate),
    /// Print usage.
    Help,
}

/// Settings shared by every entry of a stdin batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchTemplate {
    pub topic_arn: String,
    pub subject: Option<String>,
    pub message_structure: Option<String>,
    pub message_group_id: Option<String>,
    pub message_attributes: Option<MessageAttributes>,
}

impl BatchTemplate {
    /// Build the entry for one input line. Ids are left to the client.
    pub fn entry(&self, message: &str) -> PublishBatchRequestEntry {
        PublishBatchRequestEntry {
            id: None,
            message: message.to_owned(),
            subject: self.subject.clone(),
            message_structure: self.message_structure.clone(),
            message_attributes: self.message_attributes.clone(),
            message_deduplication_id: None,
            message_group_id: self.message_group_id.clone(),
        }
    }
}

/// Parse arguments, excluding the program name.
pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command> {
    let mut args = args.into_iter();
    let mut batch = false;
    let mut request = PublishRequest::default();
    let mut attributes = MessageAttributes::new();
    let mut message: Option<String> = None;

    while let Some(arg) = args.next() {
        if !arg.starts_with('-') {
            if message.is_some() {
                bail!("unexpected argument {arg}");
            }
            message = Some(arg);
            continue;
        }
        let mut value = |flag: &str| {
            args.next()
                .with_context(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--batch" => batch = true,
            "--topic" => request.topic_arn = Some(value("--topic")?),
            "--target" => request.target_arn = Some(value("--target")?),
            "--phone" => request.phone_number = Some(value("--phone")?),
            "--subject" => request.subject = Some(value("--subject")?),
            "--structure" => request.message_structure = Some(value("--structure")?),
            "--group-id" => request.message_group_id = Some(value("--group-id")?),
            "--dedup-id" => request.message_deduplication_id = Some(value("--dedup-id")?),
            "--attr" => {
                let pair = value("--attr")?;
                let (name, v) = split_pair(&pair)?;
                attributes.insert(name, MessageAttributeValue::string(v));
            }
            "--number-attr" => {
                let pair = value("--number-attr")?;
                let (name, v) = split_pair(&pair)?;
                attributes.insert(name, MessageAttributeValue::number(v));
            }
            flag => bail!("unknown option {flag}"),
        }
    }

    let message_attributes = (!attributes.is_empty()).then_some(attributes);

    if batch {
        let Some(topic_arn) = request.topic_arn else {
            bail!("--batch requires --topic");
        };
        if message.is_some() {
            bail!("--batch reads messages from stdin, not arguments");
        }
        if request.message_deduplication_id.is_some() {
            bail!("--dedup-id is not supported with --batch");
        }
        return Ok(Command::Batch(BatchTemplate {
            topic_arn,
            subject: request.subject,
            message_structure: request.message_structure,
            message_group_id: request.message_group_id,
            message_attributes,
        }));
    }

    let destinations = [&request.topic_arn, &request.target_arn, &request.phone_number]
        .iter()
        .filter(|d| d.is_some())
        .count();
    if destinations != 1 {
        bail!("exactly one of --topic, --target or --phone is required");
    }
    request.message = message.context("missing message")?;
    request.message_attributes = message_attributes;
    Ok(Command::Publish(request))
}

fn split_pair(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name, value)),
        _ => bail!("expected name=value, got {pair}"),
    }
}
