//! Output formatting for sourdough-cli (table, json)

use std::collections::BTreeSet;

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sourdough_client::{Record, ID_FIELD};
use tabled::builder::Builder;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.green());
        }
    }

    /// Print an info message (unless in quiet mode)
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print an error message
    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }

    /// Print records in the configured format
    pub fn print_records(&self, records: &[Record]) {
        match self.format {
            OutputFormat::Table => {
                if records.is_empty() {
                    self.info("No records");
                } else {
                    println!("{}", records_table(records));
                }
            }
            OutputFormat::Json => print_json(&records),
        }
    }

    /// Print a single record; tables show it as field/value rows
    pub fn print_record(&self, record: &Record) {
        match self.format {
            OutputFormat::Table => {
                for (key, value) in record {
                    println!("{}: {}", key.bold(), render_value(value));
                }
            }
            OutputFormat::Json => print_json(record),
        }
    }

    /// Print key-value pairs (for health)
    pub fn print_kv(&self, pairs: &[(&str, String)]) {
        match self.format {
            OutputFormat::Table => {
                for (key, value) in pairs {
                    println!("{}: {}", key.bold(), value);
                }
            }
            OutputFormat::Json => {
                let map: serde_json::Map<String, Value> = pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
                    .collect();
                print_json(&map);
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(data: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(data).unwrap_or_else(|_| "null".to_string())
    );
}

/// Strings unquoted, everything else as JSON
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Column set is the union of every record's fields, `id` first
fn records_table(records: &[Record]) -> String {
    let mut columns: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.keys().map(String::as_str))
        .collect();
    let has_id = columns.remove(ID_FIELD);

    let header: Vec<&str> = has_id
        .then_some(ID_FIELD)
        .into_iter()
        .chain(columns)
        .collect();

    let mut builder = Builder::default();
    builder.push_record(header.iter().map(|c| c.to_string()));
    for record in records {
        builder.push_record(
            header
                .iter()
                .map(|c| record.get(*c).map(render_value).unwrap_or_default()),
        );
    }
    builder.build().to_string()
}
