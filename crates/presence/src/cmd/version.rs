use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("presence {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: presence");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("PRESENCE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "transport: {}",
        if cfg!(windows) {
            "named-pipe"
        } else {
            "unix-domain-socket"
        }
    );
    println!(
        "protocol_version: {}",
        presence_session::PROTOCOL_VERSION
    );

    Ok(SUCCESS)
}
