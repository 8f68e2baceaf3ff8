use tabql::cli;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize the logging system using tracing subscriber; logs go to
    // stderr so command output stays clean on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting tabql...");

    let invocation = cli::parse_args(std::env::args().skip(1));
    match cli::run(invocation) {
        Ok(text) => print!("{}", text),
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
