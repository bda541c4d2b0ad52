use std::io::{self, BufRead};
use std::time::{Duration, Instant};

use presence_session::{PublishOutcome, StatusSource};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cmd::WatchArgs;
use crate::exit::{io_error, session_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_watch_summary, OutputFormat, WatchSummary};

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let min_interval = parse_duration(&args.min_interval)?;
    let mut session = args.session.connect()?;
    let mut source = JsonLinesSource::new(io::stdin().lock());
    let mut gate = UpdateGate::new(min_interval);
    let mut summary = WatchSummary::default();

    loop {
        let activity = match source.next_activity() {
            Ok(Some(activity)) => activity,
            Ok(None) => break,
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                warn!(error = %err, "skipping malformed activity line");
                summary.invalid += 1;
                continue;
            }
            Err(err) => {
                if let Err(close_err) = session.close() {
                    warn!(error = %close_err, "close after stdin failure");
                }
                return Err(io_error("failed reading stdin", err));
            }
        };
        summary.received += 1;

        if !gate.admit(Instant::now(), &activity) {
            summary.skipped += 1;
            continue;
        }

        let outcome = session
            .publish(&activity)
            .map_err(|err| session_error("publish failed", err))?;
        summary.published += 1;
        if let PublishOutcome::Rejected { .. } = outcome {
            summary.rejected += 1;
        }
    }

    info!(
        received = summary.received,
        published = summary.published,
        "status source exhausted"
    );
    session
        .close()
        .map_err(|err| session_error("close failed", err))?;
    print_watch_summary(&summary, format);
    Ok(SUCCESS)
}

/// Reads one JSON activity per line; blank lines are ignored.
pub struct JsonLinesSource<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R: BufRead> StatusSource for JsonLinesSource<R> {
    type Error = io::Error;

    fn next_activity(&mut self) -> Result<Option<Value>, Self::Error> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return serde_json::from_str(trimmed)
                .map(Some)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err));
        }
    }
}

/// Decides which activities are worth sending.
///
/// Every update that gets past the interval check opens a new window of
/// `min_interval`, whether or not it is then sent. Updates inside the window
/// are dropped, and so is one identical to the last published activity.
#[derive(Debug)]
pub struct UpdateGate {
    min_interval: Duration,
    window_start: Option<Instant>,
    last: Option<Value>,
}

impl UpdateGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            window_start: None,
            last: None,
        }
    }

    pub fn admit(&mut self, now: Instant, activity: &Value) -> bool {
        if let Some(start) = self.window_start {
            if now.duration_since(start) < self.min_interval {
                debug!("update throttled");
                return false;
            }
        }
        self.window_start = Some(now);

        if self.last.as_ref() == Some(activity) {
            debug!("update unchanged");
            return false;
        }
        self.last = Some(activity.clone());
        true
    }
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
