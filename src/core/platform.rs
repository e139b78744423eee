//! Process-level error handling and argument parsing.

use crate::core::cli::CliArgs;

/// Print an application error to stderr and exit with code 1.
pub fn handle_error(error: anyhow::Error) -> ! {
    eprintln!();
    eprintln!("Error running glyphloop:");
    // `{:#}` includes the context chain
    eprintln!("{error:#}");
    eprintln!();
    eprintln!("Try running with --help for usage information.");
    std::process::exit(1);
}

/// Parse command line arguments, exiting with usage on error.
pub fn get_cli_args() -> CliArgs {
    use clap::Parser;
    CliArgs::parse()
}
