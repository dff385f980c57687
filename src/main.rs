use log::debug;
use src2html::{cli::parse_args, run_src2html};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::from(2);
        }
    };

    init_logging(config.verbosity);

    match run_src2html(config).await {
        Ok(outcome) => {
            println!(
                "Successfully rendered {} to {}",
                outcome.kind.as_str(),
                outcome.output_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            debug!("{err:?}");
            let code = err.exit_code();
            eprintln!("Error rendering code: {:#}", anyhow::Error::from(err));
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
