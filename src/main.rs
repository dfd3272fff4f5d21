//! Storefront CLI

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

mod cli;

fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    if let Err(init_error) = storefront::logging::init(&cli.config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for logging errors"
        )]
        {
            eprintln!("{init_error}");
        }

        return ExitCode::FAILURE;
    }

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(run_error) => {
            error!("{run_error}");

            #[expect(clippy::print_stderr, reason = "user-facing command failure")]
            {
                eprintln!("{run_error}");
            }

            ExitCode::FAILURE
        }
    }
}
