//! File ingest
//!
//! Turns uploaded files into [`EmailRecord`]s:
//! - `.csv` - a header row naming the fields, then one record per row
//! - `.json` - one record object, or an array of them
//! - `.txt` - the whole file as one email body
//! - `.eml` - an RFC 5322 message, parsed with mail-parser

use anyhow::{bail, Context, Result};
use email_vectors::config::{MAX_FILE_SIZE, SUPPORTED_FORMATS};
use email_vectors::EmailRecord;
use mail_parser::{Addr, Message, MessageParser};
use serde_json::Value;
use std::path::Path;

/// Read every record from `path`
pub fn load_records(path: &Path) -> Result<Vec<EmailRecord>> {
    let size = std::fs::metadata(path)
        .with_context(|| format!("Cannot read {}", path.display()))?
        .len();
    if size > MAX_FILE_SIZE {
        bail!(
            "{} is {} bytes, larger than the {} byte limit",
            path.display(),
            size,
            MAX_FILE_SIZE
        );
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();

    let bytes = std::fs::read(path).with_context(|| format!("Cannot read {}", path.display()))?;
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let records = match extension.as_str() {
        ".csv" => parse_csv(&bytes)
            .with_context(|| format!("Invalid CSV in {}", path.display()))?,
        ".json" => parse_json(&bytes)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?,
        ".txt" => vec![EmailRecord::new()
            .with_text(String::from_utf8_lossy(&bytes).into_owned())
            .with_field("source", source)],
        ".eml" => vec![parse_eml(&bytes, &source)
            .with_context(|| format!("Invalid email message in {}", path.display()))?],
        _ => bail!(
            "Unsupported file format {:?} for {} (supported: {})",
            extension,
            path.display(),
            SUPPORTED_FORMATS.join(", ")
        ),
    };

    tracing::debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Empty cells are left out of the record
fn parse_csv(bytes: &[u8]) -> Result<Vec<EmailRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = EmailRecord::new();
        for (field, value) in headers.iter().zip(row.iter()) {
            if !value.is_empty() {
                record.insert(field, value);
            }
        }
        records.push(record);
    }
    Ok(records)
}

fn parse_json(bytes: &[u8]) -> Result<Vec<EmailRecord>> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(map) => Ok(vec![EmailRecord::from(map)]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(EmailRecord::from(map)),
                other => bail!("Element {} is not an object: {}", i, other),
            })
            .collect(),
        other => bail!("Expected an object or array of objects, got {}", other),
    }
}

fn parse_eml(bytes: &[u8], source: &str) -> Result<EmailRecord> {
    let message = MessageParser::default()
        .parse(bytes)
        .context("Not a parsable message")?;

    let mut record = EmailRecord::new().with_field("source", source);

    if let Some(body) = message.body_text(0) {
        record.insert(email_vectors::TEXT_FIELD, body.into_owned());
    }
    if let Some(subject) = message.subject() {
        record.insert("subject", subject);
    }
    if let Some(from) = first_address(&message) {
        record.insert("from", from);
    }
    let to = recipients(&message);
    if !to.is_empty() {
        record.insert("to", to.join(", "));
    }
    if let Some(date) = message.date() {
        record.insert("date", date.to_rfc3339());
    }
    if let Some(id) = message.message_id() {
        record.insert("message_id", id);
    }

    Ok(record)
}

fn format_address(addr: &Addr) -> Option<String> {
    let address = addr.address()?;
    Some(match addr.name() {
        Some(name) => format!("{} <{}>", name, address),
        None => address.to_string(),
    })
}

fn first_address(message: &Message) -> Option<String> {
    message
        .from()
        .and_then(|addr| addr.as_list())
        .and_then(|list| list.iter().find_map(format_address))
}

fn recipients(message: &Message) -> Vec<String> {
    message
        .to()
        .and_then(|addr| addr.as_list())
        .map(|list| list.iter().filter_map(format_address).collect())
        .unwrap_or_default()
}
