use presence_transport::{open_endpoint, LocalChannel, TransportError};

use crate::cmd::DiscoverArgs;
use crate::exit::{CliResult, FAILURE, SUCCESS};
use crate::output::{print_candidates, CandidateReport, OutputFormat};

pub fn run(args: DiscoverArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.endpoint.discovery_config();
    let reports: Vec<CandidateReport> = config
        .candidates()
        .into_iter()
        .map(|candidate| {
            let exists = candidate.path.exists();
            let (connectable, detail) = match open_endpoint(&candidate.path) {
                Ok(stream) => {
                    let _ = stream.release();
                    (true, None)
                }
                Err(TransportError::Connect { source, .. }) if !exists => {
                    (false, Some(source.kind().to_string()))
                }
                Err(err) => (false, Some(err.to_string())),
            };
            CandidateReport {
                slot: candidate.slot,
                path: candidate.path,
                exists,
                connectable,
                detail,
            }
        })
        .collect();

    print_candidates(&reports, format);

    if reports.iter().any(|r| r.connectable) {
        Ok(SUCCESS)
    } else {
        Ok(FAILURE)
    }
}
