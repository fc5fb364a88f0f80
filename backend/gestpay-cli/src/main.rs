use std::process::ExitCode;

use clap::Parser;
use gestpay_cli::{cli, configs, logger};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::Args::parse();

    let config = match configs::Config::new_with_config_path(args.config) {
        Ok(config) => config,
        Err(error) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Failed while parsing config: {error}");
            }
            return ExitCode::FAILURE;
        }
    };

    let _guard = match logger::setup(
        &config.log,
        gestpay_cli::service_name!(),
        [gestpay_cli::service_name!()],
    ) {
        Ok(guard) => Some(guard),
        Err(error) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("{error}");
            }
            None
        }
    };

    match cli::run(args.command, &config).await {
        Ok(output) => {
            #[allow(clippy::print_stdout)]
            {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(report) => {
            tracing::error!(error = ?report, "command failed");
            #[allow(clippy::print_stderr)]
            {
                eprintln!("{report:?}");
            }
            ExitCode::FAILURE
        }
    }
}
