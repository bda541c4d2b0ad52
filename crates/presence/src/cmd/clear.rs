use presence_session::PublishOutcome;

use crate::cmd::ClearArgs;
use crate::exit::{session_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_outcome, OutputFormat};

pub fn run(args: ClearArgs, format: OutputFormat) -> CliResult<i32> {
    let mut session = args.session.connect()?;

    let outcome = session
        .clear()
        .map_err(|err| session_error("clear failed", err))?;
    print_outcome(&outcome, format);

    session
        .close()
        .map_err(|err| session_error("close failed", err))?;

    match outcome {
        PublishOutcome::Accepted(_) => Ok(SUCCESS),
        PublishOutcome::Rejected { .. } => Ok(DATA_INVALID),
    }
}
