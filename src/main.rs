use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tradedigest::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stdout)
        .init();

    run(Cli::parse())
}
