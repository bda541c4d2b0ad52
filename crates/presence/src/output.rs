use std::io::IsTerminal;
use std::path::PathBuf;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use presence_session::PublishOutcome;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct OutcomeOutput<'a> {
    status: &'static str,
    message: Option<&'a str>,
    response: &'a Value,
}

pub fn print_outcome(outcome: &PublishOutcome, format: OutputFormat) {
    let (status, message) = match outcome {
        PublishOutcome::Accepted(_) => ("accepted", None),
        PublishOutcome::Rejected { message, .. } => ("rejected", Some(message.as_str())),
    };

    match format {
        OutputFormat::Json => {
            let out = OutcomeOutput {
                status,
                message,
                response: outcome.response(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["STATUS", "MESSAGE", "RESPONSE"])
                .add_row(vec![
                    status.to_string(),
                    message.unwrap_or("-").to_string(),
                    outcome.response().to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => match message {
            Some(message) => println!("status={status} message={message}"),
            None => println!("status={status}"),
        },
    }
}

/// One row of `discover` output.
#[derive(Debug, Serialize)]
pub struct CandidateReport {
    pub slot: u8,
    pub path: PathBuf,
    pub exists: bool,
    pub connectable: bool,
    pub detail: Option<String>,
}

pub fn print_candidates(reports: &[CandidateReport], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(reports).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SLOT", "PATH", "EXISTS", "CONNECTABLE", "DETAIL"]);
            for report in reports {
                table.add_row(vec![
                    report.slot.to_string(),
                    report.path.display().to_string(),
                    yes_no(report.exists).to_string(),
                    yes_no(report.connectable).to_string(),
                    report.detail.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for report in reports {
                println!(
                    "slot={} path={} exists={} connectable={}",
                    report.slot,
                    report.path.display(),
                    report.exists,
                    report.connectable
                );
            }
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct WatchSummary {
    pub received: usize,
    pub published: usize,
    pub skipped: usize,
    pub rejected: usize,
    pub invalid: usize,
}

pub fn print_watch_summary(summary: &WatchSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(summary).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!(
                "received={} published={} skipped={} rejected={} invalid={}",
                summary.received,
                summary.published,
                summary.skipped,
                summary.rejected,
                summary.invalid
            );
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
