use std::process::ExitCode;

use dipkit::pipeline::{catalogue, parse_args, run, PipelineConfig, PipelineError};

fn try_main() -> Result<(), PipelineError> {
    let invocation = parse_args(std::env::args().skip(1))?;
    if invocation.help {
        print!("{}", catalogue::help_text());
        return Ok(());
    }

    let config = PipelineConfig::from_env()?;
    log::debug!("{config:?}");

    let report = run(&invocation, &config)?;
    print!("{report}");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
