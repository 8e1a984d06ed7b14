use clap::Parser;

use sci_cli::{commands, logging, Cli};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.log_format);
    let code = commands::run(&cli);
    if code.is_error() {
        tracing::debug!(code = code.as_i32(), "exiting with error");
    }
    std::process::exit(code.as_i32());
}
