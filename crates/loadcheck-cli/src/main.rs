//! CLI entry point - the composition root.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use loadcheck_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers, presentation};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Configs => handlers::configs::execute(),
        Commands::Run(args) => {
            let config = CliConfig::from_args(&args)?;
            let json = config.json;
            let ctx = bootstrap(config);

            let suite = handlers::run::execute(&ctx);
            if json {
                println!("{}", presentation::render_json(&suite.report).map_err(CliError::from)?);
            } else {
                print!("{}", presentation::render_text(&suite.report));
            }

            if let Some(err) = suite.error {
                return Err(CliError::from(err).into());
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    // Load environment variables before parsing so LOADCHECK_* fallbacks apply
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
