//! Record commands - thin wrappers over the gateway client

use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use sourdough_client::{Envelope, Filters, GatewayClient, Record};

use crate::output::OutputContext;

/// Parse a `key=value` filter argument
pub fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

/// Parse a record body given on the command line
pub fn parse_record(raw: &str) -> Result<Record> {
    match serde_json::from_str::<Value>(raw).context("Record must be valid JSON")? {
        Value::Object(record) => Ok(record),
        _ => bail!("Record must be a JSON object"),
    }
}

/// Print the error of a failure envelope; hand back the data of a success
fn settle<T>(envelope: Envelope<T>, ctx: &OutputContext) -> Result<Option<T>, ExitCode> {
    envelope.into_result().map_err(|error| {
        ctx.error(&format!("Error: {}", error));
        ExitCode::FAILURE
    })
}

pub async fn health(client: &GatewayClient, ctx: &OutputContext) -> Result<ExitCode> {
    let health = client.health().await?;
    ctx.print_kv(&[
        ("status", health.status.clone()),
        ("message", health.message.clone()),
        ("server", client.base_url().to_string()),
    ]);
    Ok(if health.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub async fn list(
    client: &GatewayClient,
    collection: &str,
    filters: &[(String, String)],
    ctx: &OutputContext,
) -> Result<ExitCode> {
    let filters: Filters = filters.iter().cloned().collect();
    let envelope = client.list::<Record>(collection, &filters).await;
    Ok(match settle(envelope, ctx) {
        Ok(records) => {
            ctx.print_records(&records.unwrap_or_default());
            ExitCode::SUCCESS
        }
        Err(code) => code,
    })
}

pub async fn get(
    client: &GatewayClient,
    collection: &str,
    id: &str,
    ctx: &OutputContext,
) -> Result<ExitCode> {
    let envelope = client.get_by_id::<Record>(collection, id).await;
    Ok(print_one(envelope, ctx))
}

pub async fn create(
    client: &GatewayClient,
    collection: &str,
    body: &str,
    ctx: &OutputContext,
) -> Result<ExitCode> {
    let record = parse_record(body)?;
    let envelope = client.create::<Record, _>(collection, &record).await;
    Ok(print_one(envelope, ctx))
}

pub async fn update(
    client: &GatewayClient,
    collection: &str,
    id: &str,
    body: &str,
    ctx: &OutputContext,
) -> Result<ExitCode> {
    let record = parse_record(body)?;
    let envelope = client.update::<Record, _>(collection, id, &record).await;
    Ok(print_one(envelope, ctx))
}

pub async fn delete(
    client: &GatewayClient,
    collection: &str,
    id: &str,
    ctx: &OutputContext,
) -> Result<ExitCode> {
    let envelope = client.delete(collection, id).await;
    let message = envelope.message.clone();
    Ok(match settle(envelope, ctx) {
        Ok(_) => {
            ctx.success(&message.unwrap_or_else(|| format!("Deleted {}/{}", collection, id)));
            ExitCode::SUCCESS
        }
        Err(code) => code,
    })
}

fn print_one(envelope: Envelope<Record>, ctx: &OutputContext) -> ExitCode {
    match settle(envelope, ctx) {
        Ok(record) => {
            if let Some(record) = record {
                ctx.print_record(&record);
            }
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}
