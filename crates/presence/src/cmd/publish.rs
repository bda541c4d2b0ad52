use std::fs;

use presence_session::PublishOutcome;
use serde_json::Value;

use crate::cmd::PublishArgs;
use crate::exit::{io_error, session_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_outcome, OutputFormat};

pub fn run(args: PublishArgs, format: OutputFormat) -> CliResult<i32> {
    let activity = resolve_activity(&args)?;
    let mut session = args.session.connect()?;

    let outcome = session
        .publish(&activity)
        .map_err(|err| session_error("publish failed", err))?;
    print_outcome(&outcome, format);

    session
        .close()
        .map_err(|err| session_error("close failed", err))?;

    match outcome {
        PublishOutcome::Accepted(_) => Ok(SUCCESS),
        PublishOutcome::Rejected { .. } => Ok(DATA_INVALID),
    }
}

fn resolve_activity(args: &PublishArgs) -> CliResult<Value> {
    if let Some(json) = &args.json {
        return serde_json::from_str(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")));
    }
    if let Some(path) = &args.file {
        let text = fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        return serde_json::from_str(&text).map_err(|err| {
            CliError::new(
                DATA_INVALID,
                format!("{} is not valid JSON: {err}", path.display()),
            )
        });
    }
    Err(CliError::new(USAGE, "one of --json or --file is required"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::{EndpointArgs, SessionArgs};

    fn args(json: Option<&str>, file: Option<std::path::PathBuf>) -> PublishArgs {
        PublishArgs {
            session: SessionArgs {
                client_id: "1".to_string(),
                endpoint: EndpointArgs::default(),
            },
            json: json.map(str::to_string),
            file,
        }
    }

    #[test]
    fn inline_json_is_parsed() {
        let activity = resolve_activity(&args(Some(r#"{"details":"In menus"}"#), None)).unwrap();
        assert_eq!(activity["details"], "In menus");
    }

    #[test]
    fn invalid_inline_json_is_usage_error() {
        let err = resolve_activity(&args(Some("{nope"), None)).unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn activity_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.json");
        fs::write(&path, r#"{"state":"Artist - Title [Insane]"}"#).unwrap();

        let activity = resolve_activity(&args(None, Some(path))).unwrap();
        assert_eq!(activity["state"], "Artist - Title [Insane]");
    }
}
