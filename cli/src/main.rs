use clap::Parser;

mod commands;
mod error;
mod http;
mod logging;

use alumni_core::api::{load_default, load_from};
use commands::cli;
use error::CliError;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let args = cli::Args::parse();

    let cfg = match &args.config {
        Some(path) => load_from(path)?,
        None => load_default()?,
    };

    let _guard = logging::init_logging(&cfg.logging);

    match args.command {
        Some(cli::Commands::Csp(csp_args)) => commands::policy::handle_csp(csp_args, &cfg),
        Some(cli::Commands::Serve(serve_args)) => {
            commands::http_server::handle_serve(serve_args, cfg).await
        }
        None => commands::http_server::handle_serve(cli::ServeArgs::default(), cfg).await,
    }
}
